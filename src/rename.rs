//! Output filenames derived from extracted identity fields.

use std::collections::HashSet;

use crate::extraction::ExtractionRecord;

/// Record keys that may hold the holder's name, by priority.
pub const NAME_FIELDS: &[&str] = &["Name", "Nama TKA"];

/// Record keys that may hold a passport or permit number, by priority.
pub const PASSPORT_FIELDS: &[&str] = &["Passport Number", "Nomor Paspor", "Passport No", "KITAS/KITAP"];

pub const FALLBACK_BASENAME: &str = "RENAMED";

const MAX_PART_CHARS: usize = 30;

/// Which identity parts go into a generated filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameOptions {
    pub use_name: bool,
    pub use_passport: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            use_name: true,
            use_passport: true,
        }
    }
}

/// `"<name> <passport>.pdf"` from the enabled, non-empty parts, or
/// `"RENAMED.pdf"` when nothing usable is left.
pub fn generate_filename(record: &ExtractionRecord, use_name: bool, use_passport: bool) -> String {
    let name = if use_name {
        first_present(record, NAME_FIELDS).map(sanitize_part).unwrap_or_default()
    } else {
        String::new()
    };
    let passport = if use_passport {
        first_present(record, PASSPORT_FIELDS).map(sanitize_part).unwrap_or_default()
    } else {
        String::new()
    };

    let parts: Vec<&str> = [name.as_str(), passport.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        format!("{}.pdf", FALLBACK_BASENAME)
    } else {
        format!("{}.pdf", parts.join(" "))
    }
}

fn first_present<'a>(record: &'a ExtractionRecord, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .find(|value| !value.is_empty())
}

/// Keep word characters, whitespace and hyphens; at most 30 characters.
pub fn sanitize_part(raw: &str) -> String {
    let mut result = String::new();

    for ch in raw.chars() {
        if ch == '\n' || ch == '\r' {
            result.push(' ');
        } else if ch.is_alphanumeric() || ch == '_' || ch == '-' || ch.is_whitespace() {
            result.push(ch);
        }
    }

    let trimmed = result.trim();
    if trimmed.chars().count() > MAX_PART_CHARS {
        trimmed.chars().take(MAX_PART_CHARS).collect::<String>().trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Hands out filenames that are unique within one batch by appending
/// ` (2)`, ` (3)`, ... before the extension of repeated names.
#[derive(Debug, Default)]
pub struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, filename: &str) -> String {
        if self.taken.insert(filename.to_lowercase()) {
            return filename.to_string();
        }

        let (stem, extension) = match filename.rfind('.') {
            Some(dot) => filename.split_at(dot),
            None => (filename, ""),
        };
        let mut counter = 2;
        loop {
            let candidate = format!("{} ({}){}", stem, counter, extension);
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            counter += 1;
        }
    }
}
