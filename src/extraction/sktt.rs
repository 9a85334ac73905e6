//! SKTT (Surat Keterangan Tinggal Terbatas) layout.
//!
//! Bilingual `Label/Label : value` lines. The issue date is not labeled: it
//! sits in a `<PLACE>, <DD-MM-YYYY>` line right above the signatory line
//! containing "KEPALA DINAS".

use lazy_static::lazy_static;
use regex::Regex;

use super::normalize::{format_date, normalize};
use super::{capture, DocumentType, ExtractionRecord};

pub const FIELDS: &[&str] = &[
    "NIK",
    "Name",
    "Jenis Kelamin",
    "Place of Birth",
    "Date of Birth",
    "Nationality",
    "Occupation",
    "Address",
    "KITAS/KITAP",
    "Passport Expiry",
    "Date Issue",
];

const SIGNATORY_MARKER: &str = "KEPALA DINAS";

lazy_static! {
    static ref NIK: Regex = Regex::new(r"NIK/Number of Population Identity\s*:\s*(\d+)").unwrap();
    static ref NAME: Regex = Regex::new(r"Nama/Name[ \t]*:[ \t]*([\w \t]+)").unwrap();
    static ref GENDER: Regex = Regex::new(r"Jenis Kelamin/Sex\s*:\s*(MALE|FEMALE)").unwrap();
    static ref BIRTH: Regex = Regex::new(r"Tempat/Tgl Lahir[ \t]*:[ \t]*([\w \t,-]+)").unwrap();
    static ref NATIONALITY: Regex =
        Regex::new(r"Kewarganegaraan/Nationality[ \t]*:[ \t]*([\w \t]+)").unwrap();
    static ref OCCUPATION: Regex =
        Regex::new(r"Pekerjaan/Occupation[ \t]*:[ \t]*([\w \t]+)").unwrap();
    static ref ADDRESS: Regex = Regex::new(r"Alamat/Address[ \t]*:[ \t]*([\w \t,./-]+)").unwrap();
    static ref PERMIT: Regex = Regex::new(r"Nomor KITAP/KITAS Number\s*:\s*([\w-]+)").unwrap();
    static ref EXPIRY: Regex =
        Regex::new(r"Berlaku Hingga s\.d/Expired date\s*:\s*([\d-]+)").unwrap();
    static ref PLACE_AND_DATE: Regex = Regex::new(r"([A-Z\s]+),\s*(\d{2}-\d{2}-\d{4})").unwrap();
}

pub fn extract(text: &str) -> ExtractionRecord {
    let mut record = ExtractionRecord::new(DocumentType::Sktt);

    let (birth_place, birth_date) = match capture(&BIRTH, text) {
        Some(joined) => split_birth_place_date(&joined),
        None => (None, None),
    };

    record.set("NIK", capture(&NIK, text));
    record.set("Name", capture(&NAME, text).map(|v| normalize(&v, true)));
    record.set("Jenis Kelamin", capture(&GENDER, text));
    record.set("Place of Birth", birth_place.map(|v| normalize(&v, true)));
    record.set("Date of Birth", birth_date);
    record.set("Nationality", capture(&NATIONALITY, text).map(|v| normalize(&v, false)));
    record.set("Occupation", capture(&OCCUPATION, text).map(|v| normalize(&v, false)));
    record.set("Address", capture(&ADDRESS, text).map(|v| normalize(&v, false)));
    record.set("KITAS/KITAP", capture(&PERMIT, text).map(|v| normalize(&v, false)));
    record.set("Passport Expiry", capture(&EXPIRY, text).map(|v| format_date(&v)));
    record.set("Date Issue", issue_date(text));

    record
}

/// Split `"<place>, <date>"`. Anything that does not split into exactly two
/// parts is kept whole as the place.
fn split_birth_place_date(joined: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = joined.split(", ").collect();
    match parts.as_slice() {
        [place, date] => (Some(place.trim().to_string()), Some(format_date(date.trim()))),
        _ => (Some(joined.to_string()), None),
    }
}

/// Read the date from the line preceding the first signatory line.
fn issue_date(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.trim().lines().collect();
    let index = lines
        .iter()
        .position(|line| line.to_uppercase().contains(SIGNATORY_MARKER))?;
    let previous = lines.get(index.checked_sub(1)?)?;

    PLACE_AND_DATE
        .captures(previous)
        .map(|caps| format_date(&caps[2]))
}
