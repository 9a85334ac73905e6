//! ITK (Izin Tinggal Kunjungan) layout.
//!
//! ITK documents are printed on the ITAS template, so extraction delegates to
//! [`itas::extract`] and only the document-type tag differs.

use super::{itas, DocumentType, ExtractionRecord};

pub fn extract(text: &str) -> ExtractionRecord {
    let mut record = itas::extract(text);
    record.retag(DocumentType::Itk);
    record
}
