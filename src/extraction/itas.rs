//! ITAS (Izin Tinggal Terbatas) layout, shared with ITK.

use lazy_static::lazy_static;
use regex::Regex;

use super::normalize::{format_date, month_number, padded_date};
use super::{capture, DocumentType, ExtractionRecord};

pub const FIELDS: &[&str] = &[
    "Name",
    "Permit Number",
    "Stay Permit Expiry",
    "Place & Date of Birth",
    "Passport Number",
    "Passport Expiry",
    "Nationality",
    "Gender",
    "Address",
    "Occupation",
    "Guarantor",
    "Date Issue",
];

const PERMIT_MARKER: &str = "PERMIT NUMBER";

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

lazy_static! {
    static ref HOLDER_NAME: Regex = Regex::new(r"^[A-Z\s]+$").unwrap();
    static ref PERMIT_NUMBER: Regex = Regex::new(r"PERMIT NUMBER\s*:\s*([A-Z0-9-]+)").unwrap();
    static ref STAY_EXPIRY: Regex = Regex::new(r"STAY PERMIT EXPIRY\s*:\s*([\d/]+)").unwrap();
    static ref BIRTH: Regex =
        Regex::new(r"Place / Date of Birth[^\n]*:[ \t]*([A-Za-z \t]+?)[ \t]*/[ \t]*([\d-]+)").unwrap();
    static ref PASSPORT_NUMBER: Regex = Regex::new(r"Passport Number\s*: ([A-Z0-9]+)").unwrap();
    static ref PASSPORT_EXPIRY: Regex = Regex::new(r"Passport Expiry\s*: ([\d-]+)").unwrap();
    static ref NATIONALITY: Regex = Regex::new(r"Nationality\s*: ([A-Z]+)").unwrap();
    static ref GENDER: Regex = Regex::new(r"Gender\s*: ([A-Z]+)").unwrap();
    static ref ADDRESS: Regex = Regex::new(r"Address[ \t]*:[ \t]*(.+)").unwrap();
    static ref OCCUPATION: Regex = Regex::new(r"Occupation[ \t]*:[ \t]*(.+)").unwrap();
    static ref GUARANTOR: Regex = Regex::new(r"Guarantor[ \t]*:[ \t]*(.+)").unwrap();
    static ref WEEKDAY_DATE: Regex =
        Regex::new(r"([A-Za-z]+),\s*(\d{1,2})\s+([A-Za-z]+)\s+(\d{4})").unwrap();
    static ref LOOSE_DATE: Regex = Regex::new(r"(\d{1,2})[/-](\d{1,2})[/-](\d{4})").unwrap();
}

pub fn extract(text: &str) -> ExtractionRecord {
    let mut record = ExtractionRecord::new(DocumentType::Itas);

    record.set("Name", holder_name(text));
    record.set("Permit Number", capture(&PERMIT_NUMBER, text));
    record.set("Stay Permit Expiry", capture(&STAY_EXPIRY, text).map(|v| format_date(&v)));
    record.set(
        "Place & Date of Birth",
        BIRTH.captures(text).map(|caps| {
            format!("{}, {}", caps[1].trim(), format_date(caps[2].trim()))
        }),
    );
    record.set("Passport Number", capture(&PASSPORT_NUMBER, text));
    record.set("Passport Expiry", capture(&PASSPORT_EXPIRY, text).map(|v| format_date(&v)));
    record.set("Nationality", capture(&NATIONALITY, text));
    record.set("Gender", capture(&GENDER, text));
    record.set("Address", capture(&ADDRESS, text));
    record.set("Occupation", capture(&OCCUPATION, text));
    record.set("Guarantor", capture(&GUARANTOR, text));
    record.set("Date Issue", issue_date(text));

    record
}

/// The holder's name is printed on the line right above the permit number.
fn holder_name(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let index = lines.iter().position(|line| line.contains(PERMIT_MARKER))?;
    let previous = lines.get(index.checked_sub(1)?)?.trim();

    if !previous.is_empty() && HOLDER_NAME.is_match(previous) {
        Some(previous.to_string())
    } else {
        None
    }
}

/// Prefer `"<Weekday>, <D> <Month> <YYYY>"` with an English month, else the
/// first numeric date anywhere in the text.
fn issue_date(text: &str) -> Option<String> {
    let spelled = WEEKDAY_DATE.captures_iter(text).find_map(|caps| {
        let month = month_number(&caps[3], &ENGLISH_MONTHS)?;
        Some(padded_date(&caps[2], &month, &caps[4]))
    });

    spelled.or_else(|| {
        LOOSE_DATE
            .captures(text)
            .map(|caps| padded_date(&caps[1], &caps[2], &caps[3]))
    })
}
