//! DKPTKA (Dana Kompensasi Penggunaan TKA) payment notice layout.
//!
//! Every capture here is an `Option`: a pattern that does not match, or
//! matches only whitespace, is simply `None`. Values are cleaned of quotes
//! and control whitespace, and anything empty after cleaning stays `None`.

use lazy_static::lazy_static;
use regex::Regex;

use super::{DocumentType, ExtractionRecord};

pub const FIELDS: &[&str] = &[
    "Nama Pemberi Kerja",
    "Alamat",
    "No Telepon",
    "Email",
    "Nama TKA",
    "Tempat/Tanggal Lahir",
    "Nomor Paspor",
    "Kewarganegaraan",
    "Jabatan",
    "Kanim",
    "Lokasi Kerja",
    "Kode Billing Pembayaran",
    "DKPTKA",
];

const BILLING_MARKER: &str = "Kode Billing Pembayaran";
const BILLING_LOOKAHEAD_LINES: usize = 3;

lazy_static! {
    /// Employer name variants, tried in order.
    static ref EMPLOYER: [Regex; 2] = [
        Regex::new(r"(?i)Nama\s+Pemberi\s+Kerja\s*:\s*([^\n]+)").unwrap(),
        Regex::new(r"(?i)([A-Z][A-Z\s]*PT\.?[A-Z\s]*?)\s*\n[^\n]*Alamat").unwrap(),
    ];

    /// Address variants, tried in order. The address may wrap over lines and
    /// ends at the next numbered item.
    static ref ADDRESS: [Regex; 2] = [
        Regex::new(r"(?is)Alamat\s*:\s*(.*?)(?:\n\s*\d+\.\s*Nomor\s+Telepon|\n\s*3\.|\z)").unwrap(),
        Regex::new(r"(?is)Alamat\s*:\s*(.*?)(?:Nomor\s+Telepon|Email|\z)").unwrap(),
    ];

    static ref PHONE: Regex = Regex::new(r"(?i)Nomor\s+Telepon\s*:\s*([0-9+() \t-]+)").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"(?i)Email\s*:\s*([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})").unwrap();
    static ref WORKER_NAME: Regex = Regex::new(r"(?i)Nama\s+TKA\s*:\s*([^\n]+)").unwrap();
    static ref BIRTH: Regex = Regex::new(r"(?i)Tempat.*?Lahir\s*:\s*([^\n]+)").unwrap();
    static ref PASSPORT: Regex = Regex::new(r"(?i)Nomor\s+Paspor\s*:\s*([A-Z0-9]+)").unwrap();
    static ref NATIONALITY: Regex = Regex::new(r"(?i)Kewarganegaraan\s*:\s*([^\n]+)").unwrap();
    static ref POSITION: Regex = Regex::new(r"(?i)Jabatan\s*:\s*([^\n]+)").unwrap();
    static ref IMMIGRATION_OFFICE: Regex = Regex::new(r"(?i)Kanim.*?:\s*([^\n]+)").unwrap();
    static ref WORK_LOCATION: Regex = Regex::new(r"(?i)Lokasi\s+Kerja\s*:\s*([^\n]+)").unwrap();
    static ref FEE: Regex = Regex::new(r"(?i)DKPTKA.*?:\s*(US\$[^\n]+)").unwrap();
    static ref BILLING_CODE: Regex = Regex::new(r"(\d{12,})").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref QUOTES_AND_CONTROLS: Regex = Regex::new(r#"["'\n\r\t]+"#).unwrap();
}

pub fn extract(text: &str) -> ExtractionRecord {
    let mut record = ExtractionRecord::new(DocumentType::Dkptka);

    let employer = EMPLOYER.iter().find_map(|pattern| grab(pattern, text));
    let address = ADDRESS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|caps| caps[1].to_string());

    let values = [
        ("Nama Pemberi Kerja", employer.as_deref().and_then(clean)),
        ("Alamat", address.as_deref().and_then(clean)),
        ("No Telepon", grab(&PHONE, text)),
        ("Email", grab(&EMAIL, text)),
        ("Nama TKA", grab(&WORKER_NAME, text).as_deref().and_then(clean)),
        ("Tempat/Tanggal Lahir", grab(&BIRTH, text).as_deref().and_then(clean)),
        ("Nomor Paspor", grab(&PASSPORT, text)),
        ("Kewarganegaraan", grab(&NATIONALITY, text).as_deref().and_then(clean)),
        ("Jabatan", grab(&POSITION, text).as_deref().and_then(clean)),
        ("Kanim", grab(&IMMIGRATION_OFFICE, text).as_deref().and_then(clean)),
        ("Lokasi Kerja", grab(&WORK_LOCATION, text).as_deref().and_then(clean)),
        ("Kode Billing Pembayaran", billing_code(text)),
        ("DKPTKA", grab(&FEE, text).as_deref().and_then(clean)),
    ];

    for (field, value) in values {
        record.set(field, value.filter(|v| !v.trim().is_empty()));
    }

    record
}

/// First capture group with whitespace runs collapsed.
fn grab(pattern: &Regex, text: &str) -> Option<String> {
    let caps = pattern.captures(text)?;
    let value = WHITESPACE.replace_all(caps.get(1)?.as_str().trim(), " ");
    if value.is_empty() {
        None
    } else {
        Some(value.into_owned())
    }
}

/// Turn quotes and control whitespace into spaces, then collapse whitespace.
fn clean(value: &str) -> Option<String> {
    let unquoted = QUOTES_AND_CONTROLS.replace_all(value, " ");
    let cleaned = WHITESPACE.replace_all(&unquoted, " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// A run of at least twelve digits within the three lines after the first
/// billing marker line that has one.
fn billing_code(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(BILLING_MARKER))
        .find_map(|(index, _)| {
            let end = (index + 1 + BILLING_LOOKAHEAD_LINES).min(lines.len());
            let window = lines[index + 1..end].join(" ");
            BILLING_CODE
                .captures(&window)
                .map(|caps| caps[1].to_string())
        })
}
