#[cfg(test)]
mod filename_tests {
    use permit_extract_server::extraction::{DocumentType, ExtractionRecord};
    use permit_extract_server::rename::generate_filename;

    fn itas_record(name: Option<&str>, passport: Option<&str>) -> ExtractionRecord {
        let mut record = ExtractionRecord::new(DocumentType::Itas);
        record.set("Name", name.map(str::to_string));
        record.set("Passport Number", passport.map(str::to_string));
        record
    }

    #[test]
    fn test_name_and_passport() {
        let record = itas_record(Some("Budi Santoso"), Some("A1234567"));
        assert_eq!(generate_filename(&record, true, true), "Budi Santoso A1234567.pdf");
    }

    #[test]
    fn test_flags_select_parts() {
        let record = itas_record(Some("Budi Santoso"), Some("A1234567"));
        assert_eq!(generate_filename(&record, true, false), "Budi Santoso.pdf");
        assert_eq!(generate_filename(&record, false, true), "A1234567.pdf");
        assert_eq!(generate_filename(&record, false, false), "RENAMED.pdf");
    }

    #[test]
    fn test_empty_sources_fall_back() {
        assert_eq!(generate_filename(&itas_record(None, None), true, true), "RENAMED.pdf");
        assert_eq!(
            generate_filename(&itas_record(Some("  "), Some("")), true, true),
            "RENAMED.pdf"
        );
        assert_eq!(
            generate_filename(&itas_record(Some("../.."), Some("///")), true, true),
            "RENAMED.pdf"
        );
    }

    #[test]
    fn test_dkptka_uses_indonesian_keys() {
        let mut record = ExtractionRecord::new(DocumentType::Dkptka);
        record.set("Nama TKA", Some("RAVI KUMAR".to_string()));
        record.set("Nomor Paspor", Some("Z7654321".to_string()));
        assert_eq!(generate_filename(&record, true, true), "RAVI KUMAR Z7654321.pdf");
    }

    #[test]
    fn test_evln_passport_no_key() {
        let mut record = ExtractionRecord::new(DocumentType::Evln);
        record.set("Name", Some("MARIA GARCIA".to_string()));
        record.set("Passport No", Some("PA1234567".to_string()));
        assert_eq!(generate_filename(&record, true, true), "MARIA GARCIA PA1234567.pdf");
    }

    #[test]
    fn test_parts_are_sanitized_and_truncated() {
        let record = itas_record(
            Some("Dr. Jean-Luc O'Neil\nPicard of the Starship Enterprise"),
            Some("X/123:456"),
        );
        let filename = generate_filename(&record, true, true);
        assert_eq!(filename, "Dr Jean-Luc ONeil Picard of th X123456.pdf");
    }
}
