//! Text and date normalization shared by the field extractors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Label fragments that leak into captured values when a layout puts two
    /// fields on one line. Internal spaces match any whitespace run.
    static ref LEAKED_LABELS: Regex = Regex::new(
        r"Reference\s+No|Payment\s+Receipt\s+No|Jenis\s+Kelamin|Kewarganegaraan|Pekerjaan|Alamat"
    )
    .unwrap();
    static ref DISALLOWED_CHARS: Regex = Regex::new(r"[^A-Za-z0-9\s,./-]").unwrap();
    static ref NUMERIC_DATE: Regex = Regex::new(r"(\d{2})[-/](\d{2})[-/](\d{4})").unwrap();
}

/// Clean a captured field value.
///
/// Drops characters outside letters, digits, whitespace and `, . / -`,
/// strips leaked labels, and collapses whitespace. Identity fields (names,
/// places of birth) also lose their periods so abbreviations collapse.
/// The result is a fixpoint: normalizing it again changes nothing.
pub fn normalize(text: &str, is_identity_field: bool) -> String {
    let mut cleaned = DISALLOWED_CHARS.replace_all(text, "").into_owned();
    if is_identity_field {
        cleaned.retain(|c| c != '.');
    }

    // removing one label can splice together another
    while LEAKED_LABELS.is_match(&cleaned) {
        cleaned = LEAKED_LABELS.replace_all(&cleaned, "").into_owned();
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rewrite the first `DD-MM-YYYY` or `DD/MM/YYYY` date in `text` as
/// `DD/MM/YYYY`. Text without such a date is returned unchanged.
pub fn format_date(text: &str) -> String {
    match NUMERIC_DATE.captures(text) {
        Some(caps) => format!("{}/{}/{}", &caps[1], &caps[2], &caps[3]),
        None => text.to_string(),
    }
}

/// Build a `DD/MM/YYYY` date from loose parts, zero-padding day and month.
pub(crate) fn padded_date(day: &str, month: &str, year: &str) -> String {
    format!("{:0>2}/{:0>2}/{}", day, month, year)
}

/// Look a month name up in a twelve-entry table, ignoring case.
/// Returns the two-digit month number.
pub(crate) fn month_number(name: &str, table: &[&str; 12]) -> Option<String> {
    table
        .iter()
        .position(|month| month.eq_ignore_ascii_case(name))
        .map(|index| format!("{:02}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permitted(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == ' ' || ",./-".contains(c)
    }

    #[test]
    fn test_normalize_strips_labels_and_symbols() {
        assert_eq!(normalize("JOHN DOE Jenis Kelamin", true), "JOHN DOE");
        assert_eq!(normalize("  Jl. Sudirman   No. 5 (Blok A) ", false), "Jl. Sudirman No. 5 Blok A");
        assert_eq!(normalize("MOH. ALI", true), "MOH ALI");
        assert_eq!(normalize("Payment Receipt No 123", false), "123");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "AlamAlamatat JAKARTA",
            "Ala#mat BANDUNG",
            "Ala.mat SURABAYA",
            "Jenis\n\nKelamin MALE",
            "  ÉMILE  d'Arc\t\tPARIS ",
            "Reference No: 99/AB-1",
            "",
        ];
        for sample in samples {
            for identity in [true, false] {
                let once = normalize(sample, identity);
                assert_eq!(normalize(&once, identity), once, "input {:?}", sample);
                assert!(once.chars().all(permitted), "output {:?}", once);
                assert_eq!(once.trim(), once);
                assert!(!once.contains("  "));
            }
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("01-02-2030"), "01/02/2030");
        assert_eq!(format_date("expires 31/12/2029 end"), "31/12/2029");
        assert_eq!(format_date("no date here"), "no date here");
        assert_eq!(format_date("1-2-2030"), "1-2-2030");
    }

    #[test]
    fn test_month_number() {
        let table = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        assert_eq!(month_number("march", &table).as_deref(), Some("03"));
        assert_eq!(month_number("DECEMBER", &table).as_deref(), Some("12"));
        assert_eq!(month_number("Maret", &table), None);
        assert_eq!(padded_date("5", "1", "2024"), "05/01/2024");
    }
}
