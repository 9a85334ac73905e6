//! Ordered field-name → value mapping produced by every extractor.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::DocumentType;

/// Name of the trailing document-type tag column.
pub const DOCUMENT_TYPE_FIELD: &str = "Jenis Dokumen";

/// Structured result of one document's text.
///
/// The key set is fixed by the document type at construction: every declared
/// field is present, absent values are `None` and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    document_type: DocumentType,
    fields: Vec<(&'static str, Option<String>)>,
}

impl ExtractionRecord {
    /// A record with every field of `document_type` unset and the tag filled.
    pub fn new(document_type: DocumentType) -> Self {
        let mut fields: Vec<(&'static str, Option<String>)> = document_type
            .field_names()
            .iter()
            .map(|name| (*name, None))
            .collect();
        fields.push((DOCUMENT_TYPE_FIELD, Some(document_type.code().to_string())));

        Self {
            document_type,
            fields,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// Replace the document-type tag, keeping the field layout.
    pub(crate) fn retag(&mut self, document_type: DocumentType) {
        self.document_type = document_type;
        self.set(DOCUMENT_TYPE_FIELD, Some(document_type.code().to_string()));
    }

    /// Set a declared field. Unknown names are ignored so the key set never
    /// drifts from the declared layout.
    pub fn set(&mut self, name: &str, value: Option<String>) {
        if let Some(slot) = self.fields.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        }
    }

    /// Value of a field, `None` when unset or undeclared.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.iter().any(|(key, _)| *key == name)
    }

    /// Field names in column order, tag last.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        self.fields
            .iter()
            .map(|(key, value)| (*key, value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ExtractionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_declares_every_field() {
        let record = ExtractionRecord::new(DocumentType::Evln);
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(
            keys,
            vec![
                "Name",
                "Place of Birth",
                "Date of Birth",
                "Passport No",
                "Passport Expiry",
                "Date Issue",
                "Jenis Dokumen"
            ]
        );
        assert_eq!(record.get("Jenis Dokumen"), Some("EVLN"));
        assert_eq!(record.get("Name"), None);
    }

    #[test]
    fn test_serialization_keeps_order_and_nulls() {
        let mut record = ExtractionRecord::new(DocumentType::Evln);
        record.set("Passport No", Some("A1234567".to_string()));

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with(r#"{"Name":null,"Place of Birth":null"#));
        assert!(json.contains(r#""Passport No":"A1234567""#));
        assert!(json.ends_with(r#""Jenis Dokumen":"EVLN"}"#));
    }

    #[test]
    fn test_undeclared_field_is_ignored() {
        let mut record = ExtractionRecord::new(DocumentType::Sktt);
        record.set("Nomor Paspor", Some("Z7654321".to_string()));
        assert_eq!(record.get("Nomor Paspor"), None);
        assert!(record.keys().all(|key| key != "Nomor Paspor"));
        assert_eq!(record.len(), DocumentType::Sktt.field_names().len() + 1);
    }

    #[test]
    fn test_retag_keeps_layout() {
        let mut record = ExtractionRecord::new(DocumentType::Itas);
        record.retag(DocumentType::Itk);
        assert_eq!(record.document_type(), DocumentType::Itk);
        assert_eq!(record.get("Jenis Dokumen"), Some("ITK"));
        assert_eq!(record.len(), DocumentType::Itk.field_names().len() + 1);
    }
}
