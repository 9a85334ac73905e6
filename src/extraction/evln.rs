//! EVLN (Exit Visa Luar Negeri) layout.
//!
//! A letter rather than a form: the holder's name usually follows the
//! salutation line, the remaining fields are `Label : value` lines.

use lazy_static::lazy_static;
use regex::Regex;

use super::normalize::{format_date, normalize};
use super::{DocumentType, ExtractionRecord};

pub const FIELDS: &[&str] = &[
    "Name",
    "Place of Birth",
    "Date of Birth",
    "Passport No",
    "Passport Expiry",
    "Date Issue",
];

lazy_static! {
    static ref GREETING: Regex = Regex::new(r"(?i)Dear\s+(Mr\.|Ms\.|Sir|Madam)?").unwrap();
    static ref NAME_LABEL: Regex = Regex::new(r"(?i)\bName\b|\bNama\b").unwrap();
    static ref BIRTH_PLACE_LABEL: Regex =
        Regex::new(r"(?i)\bPlace of Birth\b|\bTempat Lahir\b").unwrap();
    static ref BIRTH_DATE_LABEL: Regex =
        Regex::new(r"(?i)\bDate of Birth\b|\bTanggal Lahir\b").unwrap();
    static ref PASSPORT_NO_LABEL: Regex = Regex::new(r"(?i)\bPassport No\b").unwrap();
    static ref PASSPORT_EXPIRY_LABEL: Regex = Regex::new(r"(?i)\bPassport Expiry\b").unwrap();
    static ref VISA_TYPE_TAIL: Regex = Regex::new(r"\s*Visa\s*Type\s*.*").unwrap();
    static ref DATE: Regex = Regex::new(r"(\d{2}/\d{2}/\d{4}|\d{2}-\d{2}-\d{4})").unwrap();
    static ref UPPER_TOKEN: Regex = Regex::new(r"\b([A-Z0-9]+)\b").unwrap();

    /// Issue-date label variants, tried in order.
    static ref ISSUE_DATE: [Regex; 2] = [
        Regex::new(
            r"(?i)(?:Date\s+of\s+Issue|Issue\s+Date|Issued\s+on|Tanggal\s+Penerbitan)\s*:?\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})"
        )
        .unwrap(),
        Regex::new(r"(?i)(?:Issued|Diterbitkan)\s*:?\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})").unwrap(),
    ];
}

/// Greeting-line names outside this length window are rejected.
const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 50;

pub fn extract(text: &str) -> ExtractionRecord {
    let mut record = ExtractionRecord::new(DocumentType::Evln);
    let lines: Vec<&str> = text.split('\n').collect();

    let mut name = name_after_greeting(&lines);

    for line in &lines {
        if name.is_none() && NAME_LABEL.is_match(line) {
            name = value_after_colon(line)
                .map(|v| normalize(v, true))
                .and_then(non_empty);
        } else if BIRTH_PLACE_LABEL.is_match(line) {
            if let Some(value) = value_after_colon(line) {
                let place = VISA_TYPE_TAIL.replace(value.trim(), "");
                record.set("Place of Birth", non_empty(normalize(&place, true)));
            }
        } else if BIRTH_DATE_LABEL.is_match(line) {
            if let Some(caps) = DATE.captures(line) {
                record.set("Date of Birth", Some(format_date(&caps[1])));
            }
        } else if PASSPORT_NO_LABEL.is_match(line) {
            let value = value_after_colon(line).unwrap_or(line);
            if let Some(caps) = UPPER_TOKEN.captures(value) {
                record.set("Passport No", Some(caps[1].to_string()));
            }
        } else if PASSPORT_EXPIRY_LABEL.is_match(line) {
            if let Some(caps) = DATE.captures(line) {
                record.set("Passport Expiry", Some(format_date(&caps[1])));
            }
        }
    }

    record.set("Name", name.and_then(non_empty));
    record.set(
        "Date Issue",
        ISSUE_DATE
            .iter()
            .find_map(|pattern| pattern.captures(text))
            .map(|caps| format_date(&caps[1])),
    );

    record
}

/// The line after the first salutation, when it has a plausible name length.
fn name_after_greeting(lines: &[&str]) -> Option<String> {
    let index = lines.iter().position(|line| GREETING.is_match(line))?;
    let candidate = lines.get(index + 1)?.trim();
    let len = candidate.chars().count();

    if len > MIN_NAME_LEN && len < MAX_NAME_LEN {
        non_empty(normalize(candidate, true))
    } else {
        None
    }
}

/// Text between the first and second colon of a `Label : value` line.
fn value_after_colon(line: &str) -> Option<&str> {
    line.split(':').nth(1)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
