//! Notifikasi TKA layout.
//!
//! Unlike the other layouts, missing fields are reported as empty strings
//! rather than `null`.

use lazy_static::lazy_static;
use regex::Regex;

use super::normalize::{format_date, month_number, padded_date};
use super::{capture, DocumentType, ExtractionRecord};

pub const FIELDS: &[&str] = &[
    "Nomor Keputusan",
    "Nama TKA",
    "Tempat/Tanggal Lahir",
    "Kewarganegaraan",
    "Alamat Tempat Tinggal",
    "Nomor Paspor",
    "Jabatan",
    "Lokasi Kerja",
    "Berlaku",
    "Date Issue",
];

const INDONESIAN_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

lazy_static! {
    static ref DECISION_NUMBER: Regex = Regex::new(r"(?i)NOMOR\s+([A-Z0-9./-]+)").unwrap();

    /// `(field, pattern)` for the plain `Label : value` lines.
    static ref LABELED: Vec<(&'static str, Regex)> = [
        ("Nama TKA", r"(?i)Nama TKA[ \t]*:[ \t]*(.*)"),
        ("Tempat/Tanggal Lahir", r"(?i)Tempat/Tanggal Lahir[ \t]*:[ \t]*(.*)"),
        ("Kewarganegaraan", r"(?i)Kewarganegaraan[ \t]*:[ \t]*(.*)"),
        ("Alamat Tempat Tinggal", r"(?i)Alamat Tempat Tinggal[ \t]*:[ \t]*(.*)"),
        ("Nomor Paspor", r"(?i)Nomor Paspor[ \t]*:[ \t]*(.*)"),
        ("Jabatan", r"(?i)Jabatan[ \t]*:[ \t]*(.*)"),
        ("Lokasi Kerja", r"(?i)Lokasi Kerja[ \t]*:[ \t]*(.*)"),
    ]
    .into_iter()
    .map(|(field, pattern)| (field, Regex::new(pattern).unwrap()))
    .collect();

    /// Validity range label variants, tried in order.
    static ref VALIDITY: [Regex; 2] = [
        Regex::new(
            r"(?i)Berlaku\s*:?\s*(\d{2}[-/]\d{2}[-/]\d{4})\s*(?:s\.?d\.?|sampai dengan)?\s*(\d{2}[-/]\d{2}[-/]\d{4})"
        )
        .unwrap(),
        Regex::new(
            r"(?i)Tanggal Berlaku\s*:?\s*(\d{2}[-/]\d{2}[-/]\d{4})\s*s\.?d\.?\s*(\d{2}[-/]\d{2}[-/]\d{4})"
        )
        .unwrap(),
    ];

    static ref ISSUED_SPELLED: Regex = Regex::new(
        r"(?i)Pada tanggal\s*:\s*(\d{1,2})\s+(Januari|Februari|Maret|April|Mei|Juni|Juli|Agustus|September|Oktober|November|Desember)\s+(\d{4})"
    )
    .unwrap();
    static ref ISSUED_NUMERIC: Regex =
        Regex::new(r"(?i)Pada tanggal\s*:\s*(\d{1,2}[-/]\d{1,2}[-/]\d{4})").unwrap();
}

pub fn extract(text: &str) -> ExtractionRecord {
    let mut record = ExtractionRecord::new(DocumentType::Notifikasi);
    for field in FIELDS {
        record.set(field, Some(String::new()));
    }

    let mut put = |field: &str, value: Option<String>| {
        record.set(field, Some(value.unwrap_or_default()));
    };

    put("Nomor Keputusan", capture(&DECISION_NUMBER, text));
    for (field, pattern) in LABELED.iter() {
        put(*field, capture(pattern, text));
    }
    put("Berlaku", validity_range(text));
    put("Date Issue", issue_date(text));

    record
}

fn validity_range(text: &str) -> Option<String> {
    VALIDITY
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|caps| format!("{} - {}", format_date(&caps[1]), format_date(&caps[2])))
}

/// Issue date after "Pada tanggal", spelled with an Indonesian month or numeric.
fn issue_date(text: &str) -> Option<String> {
    if let Some(caps) = ISSUED_SPELLED.captures(text) {
        let month = month_number(&caps[2], &INDONESIAN_MONTHS)?;
        return Some(padded_date(&caps[1], &month, &caps[3]));
    }

    ISSUED_NUMERIC
        .captures(text)
        .map(|caps| format_date(&caps[1]))
}
