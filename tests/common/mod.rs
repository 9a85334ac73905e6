#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use permit_extract_server::pdf_text::{PdfTextError, PdfTextExtractor};
use permit_extract_server::{AppConfig, AppState};

pub const BOUNDARY: &str = "----permit-extract-test-boundary";

/// Treats the upload bytes as UTF-8 text, one page per form-feed section.
pub struct StubPdfText;

impl PdfTextExtractor for StubPdfText {
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>, PdfTextError> {
        let text = std::str::from_utf8(data).map_err(|e| PdfTextError::Parse(e.to_string()))?;
        Ok(text.split('\x0C').map(str::to_string).collect())
    }
}

pub fn test_config(artifacts_dir: &Path) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        artifacts_dir: artifacts_dir.to_path_buf(),
        artifact_ttl: Some(Duration::from_secs(3600)),
        sweep_interval: Duration::from_secs(300),
        allowed_origins: Vec::new(),
    }
}

pub fn test_state(artifacts_dir: &Path) -> AppState {
    AppState::with_pdf_text(test_config(artifacts_dir), Arc::new(StubPdfText))
}

pub fn sktt_text(name: &str, permit: &str) -> String {
    format!(
        "PEMERINTAH PROVINSI DAERAH KHUSUS IBUKOTA JAKARTA
SURAT KETERANGAN TEMPAT TINGGAL
NIK/Number of Population Identity : 3171234567890001
Nama/Name : {name}
Jenis Kelamin/Sex : MALE
Tempat/Tgl Lahir : SYDNEY, 14-02-1980
Kewarganegaraan/Nationality : AUSTRALIA
Pekerjaan/Occupation : ENGINEER
Alamat/Address : JL. SUDIRMAN NO. 1, JAKARTA
Nomor KITAP/KITAS Number : {permit}
Berlaku Hingga s.d/Expired date : 01-01-2030
\x0CJAKARTA, 10-05-2024
KEPALA DINAS KEPENDUDUKAN
"
    )
}

pub const EVLN_TEXT: &str = "Dear Mr./Ms.
MARIA GARCIA
Place of Birth : MADRID Visa Type : B211A
Date of Birth : 12/03/1985
Passport No : PA1234567
Passport Expiry : 30-11-2031
Date of Issue : 05/06/2024";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

/// Hand-built `multipart/form-data` body using [`BOUNDARY`].
pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
