mod common;

#[cfg(test)]
mod extractor_tests {
    use permit_extract_server::extraction::{
        format_date, normalize, DocumentType, DOCUMENT_TYPE_FIELD,
    };

    use crate::common::{sktt_text, EVLN_TEXT};

    const SAMPLE_INPUTS: &[&str] = &[
        "",
        "   ",
        "\n\n\n",
        "random words without labels",
        "Name : Nama : Passport No : PERMIT NUMBER :",
        "KEPALA DINAS",
        "Kode Billing Pembayaran",
        "Dear Sir",
        "Pada tanggal : 31 Desember 2024",
        "Monday, 1 Smarch 2024",
        "ÄÖÜ ßø 🚀 \u{0} \r\n\t",
    ];

    #[test]
    fn test_every_type_yields_exact_key_set() {
        for document_type in DocumentType::ALL {
            for input in SAMPLE_INPUTS {
                let record = document_type.extract(input);
                let keys: Vec<&str> = record.keys().collect();
                assert_eq!(keys, document_type.columns(), "{} on {:?}", document_type, input);
                assert_eq!(record.get(DOCUMENT_TYPE_FIELD), Some(document_type.code()));
            }
        }
    }

    #[test]
    fn test_missing_values_serialize_as_null_except_notifikasi() {
        for document_type in DocumentType::ALL {
            let json = serde_json::to_value(document_type.extract("")).unwrap();
            let object = json.as_object().unwrap();
            assert_eq!(object.len(), document_type.columns().len());
            for field in document_type.field_names() {
                if document_type == DocumentType::Notifikasi {
                    assert_eq!(object[*field], "", "{} {}", document_type, field);
                } else {
                    assert!(object[*field].is_null(), "{} {}", document_type, field);
                }
            }
        }
    }

    #[test]
    fn test_serialized_keys_keep_column_order() {
        let record = DocumentType::Dkptka.extract("");
        let json = serde_json::to_string(&record).unwrap();
        let employer = json.find("Nama Pemberi Kerja").unwrap();
        let fee = json.find("\"DKPTKA\":").unwrap();
        let tag = json.find(DOCUMENT_TYPE_FIELD).unwrap();
        assert!(employer < fee && fee < tag);
    }

    #[test]
    fn test_sktt_scenario() {
        let record = DocumentType::Sktt.extract("Nama/Name : JOHN DOE\nJenis Kelamin/Sex : MALE");
        assert_eq!(record.get("Name"), Some("JOHN DOE"));
        assert_eq!(record.get("Jenis Kelamin"), Some("MALE"));
        assert_eq!(record.get("Jenis Dokumen"), Some("SKTT"));
    }

    #[test]
    fn test_sktt_issue_date_across_pages() {
        let text = sktt_text("ALICE SMITH", "2C11AA0001").replace('\x0C', "\n");
        let record = DocumentType::Sktt.extract(&text);
        assert_eq!(record.get("Date Issue"), Some("10/05/2024"));
        assert_eq!(record.get("KITAS/KITAP"), Some("2C11AA0001"));
        assert_eq!(record.get("Place of Birth"), Some("SYDNEY"));
        assert_eq!(record.get("Date of Birth"), Some("14/02/1980"));
    }

    #[test]
    fn test_evln_letter() {
        let record = DocumentType::Evln.extract(EVLN_TEXT);
        assert_eq!(record.get("Name"), Some("MARIA GARCIA"));
        assert_eq!(record.get("Place of Birth"), Some("MADRID"));
        assert_eq!(record.get("Passport No"), Some("PA1234567"));
    }

    #[test]
    fn test_notifikasi_scenario() {
        let record = DocumentType::Notifikasi.extract("Pada tanggal : 5 Januari 2024");
        assert_eq!(record.get("Date Issue"), Some("05/01/2024"));
    }

    #[test]
    fn test_itk_matches_itas_apart_from_tag() {
        let text = "SATU DUA\nPERMIT NUMBER : 1D11AB0001\nGender : FEMALE\nTuesday, 2 January 2024";
        let itas = DocumentType::Itas.extract(text);
        let itk = DocumentType::Itk.extract(text);
        for field in DocumentType::Itas.field_names() {
            assert_eq!(itas.get(field), itk.get(field));
        }
        assert_eq!(itk.get("Date Issue"), Some("02/01/2024"));
        assert_eq!(itk.get(DOCUMENT_TYPE_FIELD), Some("ITK"));
    }

    #[test]
    fn test_normalize_properties() {
        let permitted =
            |c: char| c.is_ascii_alphanumeric() || c.is_whitespace() || ",./-".contains(c);

        for input in SAMPLE_INPUTS {
            for identity in [true, false] {
                let once = normalize(input, identity);
                assert!(once.chars().all(permitted), "{:?}", once);
                assert_eq!(once, once.trim());
                assert!(!once.contains("  "));
                assert_eq!(normalize(&once, identity), once);
            }
        }
    }

    #[test]
    fn test_format_date_properties() {
        assert_eq!(format_date("01-02-2024"), "01/02/2024");
        assert_eq!(format_date("valid until 31/12/2025 only"), "31/12/2025");
        assert_eq!(format_date("no date here"), "no date here");
        assert_eq!(format_date("1-2-2024"), "1-2-2024");
    }
}
