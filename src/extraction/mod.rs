//! Field extraction for the six permit layouts.
//!
//! Each layout has its own pure strategy mapping full document text to an
//! [`ExtractionRecord`]. [`DocumentType::extract`] is the dispatch table:
//! an exhaustive match, so adding a layout without a strategy does not
//! compile.
//! - `sktt` - Surat Keterangan Tinggal Terbatas
//! - `evln` - Exit Visa Luar Negeri
//! - `itas` - Izin Tinggal Terbatas
//! - `itk` - Izin Tinggal Kunjungan (same layout as ITAS)
//! - `notifikasi` - Notifikasi TKA
//! - `dkptka` - Dana Kompensasi Penggunaan TKA

pub mod dkptka;
pub mod evln;
pub mod itas;
pub mod itk;
pub mod normalize;
pub mod notifikasi;
pub mod record;
pub mod sktt;

pub use normalize::{format_date, normalize};
pub use record::{ExtractionRecord, DOCUMENT_TYPE_FIELD};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported document type '{0}'")]
pub struct UnsupportedDocumentType(pub String);

/// Closed set of layouts this engine understands. Always supplied by the
/// caller, never inferred from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum DocumentType {
    #[serde(rename = "SKTT")]
    Sktt,
    #[serde(rename = "EVLN")]
    Evln,
    #[serde(rename = "ITAS")]
    Itas,
    #[serde(rename = "ITK")]
    Itk,
    #[serde(rename = "Notifikasi")]
    Notifikasi,
    #[serde(rename = "DKPTKA")]
    Dkptka,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Sktt,
        DocumentType::Evln,
        DocumentType::Itas,
        DocumentType::Itk,
        DocumentType::Notifikasi,
        DocumentType::Dkptka,
    ];

    /// Wire code, also the value of the `Jenis Dokumen` tag.
    pub fn code(self) -> &'static str {
        match self {
            DocumentType::Sktt => "SKTT",
            DocumentType::Evln => "EVLN",
            DocumentType::Itas => "ITAS",
            DocumentType::Itk => "ITK",
            DocumentType::Notifikasi => "Notifikasi",
            DocumentType::Dkptka => "DKPTKA",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DocumentType::Sktt => "Surat Keterangan Tinggal Terbatas",
            DocumentType::Evln => "Exit Visa Luar Negeri",
            DocumentType::Itas => "Izin Tinggal Terbatas",
            DocumentType::Itk => "Izin Tinggal Kunjungan",
            DocumentType::Notifikasi => "Notifikasi TKA",
            DocumentType::Dkptka => "Dana Kompensasi Penggunaan TKA",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DocumentType::Sktt => "Indonesian temporary residence permit",
            DocumentType::Evln => "Exit visa for foreign nationals",
            DocumentType::Itas => "Limited stay permit",
            DocumentType::Itk => "Visit stay permit",
            DocumentType::Notifikasi => "Foreign worker notification",
            DocumentType::Dkptka => "Foreign worker compensation fund",
        }
    }

    /// Declared fields in export column order, without the trailing tag.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            DocumentType::Sktt => sktt::FIELDS,
            DocumentType::Evln => evln::FIELDS,
            DocumentType::Itas | DocumentType::Itk => itas::FIELDS,
            DocumentType::Notifikasi => notifikasi::FIELDS,
            DocumentType::Dkptka => dkptka::FIELDS,
        }
    }

    /// Export columns: declared fields followed by the tag.
    pub fn columns(self) -> Vec<&'static str> {
        let mut columns = self.field_names().to_vec();
        columns.push(DOCUMENT_TYPE_FIELD);
        columns
    }

    /// Run the strategy registered for this layout.
    pub fn extract(self, text: &str) -> ExtractionRecord {
        match self {
            DocumentType::Sktt => sktt::extract(text),
            DocumentType::Evln => evln::extract(text),
            DocumentType::Itas => itas::extract(text),
            DocumentType::Itk => itk::extract(text),
            DocumentType::Notifikasi => notifikasi::extract(text),
            DocumentType::Dkptka => dkptka::extract(text),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DocumentType {
    type Err = UnsupportedDocumentType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        DocumentType::ALL
            .into_iter()
            .find(|doc_type| doc_type.code() == trimmed)
            .ok_or_else(|| UnsupportedDocumentType(trimmed.to_string()))
    }
}

/// Value of the first capture group of `pattern` in `text`, trimmed.
/// Empty captures count as a miss.
pub(crate) fn capture(pattern: &regex::Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_type() {
        assert_eq!("SKTT".parse::<DocumentType>(), Ok(DocumentType::Sktt));
        assert_eq!(" Notifikasi ".parse::<DocumentType>(), Ok(DocumentType::Notifikasi));
        assert_eq!(
            "sktt".parse::<DocumentType>(),
            Err(UnsupportedDocumentType("sktt".to_string()))
        );
    }

    #[test]
    fn test_codes_round_trip_through_serde() {
        for doc_type in DocumentType::ALL {
            let json = serde_json::to_string(&doc_type).unwrap();
            assert_eq!(json, format!("\"{}\"", doc_type.code()));
            assert_eq!(doc_type.to_string().parse::<DocumentType>(), Ok(doc_type));
        }
    }

    #[test]
    fn test_empty_text_yields_full_key_set() {
        for doc_type in DocumentType::ALL {
            let record = doc_type.extract("");
            assert_eq!(record.keys().collect::<Vec<_>>(), doc_type.columns());
            assert_eq!(record.get(DOCUMENT_TYPE_FIELD), Some(doc_type.code()));
        }
    }
}
