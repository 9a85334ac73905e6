//! Batch orchestration: extract every upload, write renamed copies, build
//! the spreadsheet and archive, then publish both to the artifact registry.
//!
//! Per-file problems (not a PDF, unreadable, extractor panic) become a
//! [`FileOutcome::Failure`] and the batch carries on. Only artifact faults
//! abort the batch, and then nothing is published.

pub mod bundle;
pub mod export;
pub mod workspace;

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use chrono::Local;
use log::{debug, error, info, warn};
use rust_xlsxwriter::XlsxError;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use zip::result::ZipError;

use crate::artifact::{ArtifactKind, ArtifactRegistry};
use crate::extraction::{DocumentType, ExtractionRecord};
use crate::pdf_text::{panic_message, PdfTextExtractor};
use crate::rename::{generate_filename, RenameOptions, UniqueNames};
use workspace::BatchWorkspace;

pub const NOT_PDF_REASON: &str = "File is not a PDF";

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Failed to prepare batch working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
    #[error("Failed to write renamed copy '{name}': {source}")]
    RenamedCopy {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create Excel file: {0}")]
    Export(#[from] XlsxError),
    #[error("Failed to create ZIP file: {0}")]
    Bundle(#[from] ZipError),
    #[error("ZIP file verification failed: {0}")]
    Verify(String),
    #[error("No files were extracted successfully, the ZIP file would be empty")]
    EmptyBundle,
    #[error("Failed to publish '{name}': {source}")]
    Publish {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// One uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.filename.to_lowercase().ends_with(".pdf")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Success {
        filename: String,
        document_type: DocumentType,
        data: ExtractionRecord,
    },
    #[serde(rename = "error")]
    Failure {
        filename: String,
        error: String,
    },
}

impl FileOutcome {
    pub fn filename(&self) -> &str {
        match self {
            FileOutcome::Success { filename, .. } | FileOutcome::Failure { filename, .. } => filename,
        }
    }

    pub fn record(&self) -> Option<&ExtractionRecord> {
        match self {
            FileOutcome::Success { data, .. } => Some(data),
            FileOutcome::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Success { .. })
    }
}

/// Extract a single upload. Never fails; problems become a `Failure`.
pub fn extract_file(
    pdf_text: &dyn PdfTextExtractor,
    file: &UploadedFile,
    document_type: DocumentType,
) -> FileOutcome {
    if !file.is_pdf() {
        warn!("Skipping '{}': not a PDF", file.filename);
        return FileOutcome::Failure {
            filename: file.filename.clone(),
            error: NOT_PDF_REASON.to_string(),
        };
    }

    let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_text
            .full_text(&file.bytes)
            .map(|text| document_type.extract(&text))
    }));

    match attempt {
        Ok(Ok(record)) => {
            debug!("Extracted '{}' as {}", file.filename, document_type);
            FileOutcome::Success {
                filename: file.filename.clone(),
                document_type,
                data: record,
            }
        }
        Ok(Err(e)) => {
            warn!("Failed to read '{}': {}", file.filename, e);
            FileOutcome::Failure {
                filename: file.filename.clone(),
                error: e.to_string(),
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!("Extraction of '{}' crashed: {}", file.filename, message);
            FileOutcome::Failure {
                filename: file.filename.clone(),
                error: format!("Extraction failed: {}", message),
            }
        }
    }
}

/// Extract every upload, keeping input order.
pub fn extract_documents(
    pdf_text: &dyn PdfTextExtractor,
    files: &[UploadedFile],
    document_type: DocumentType,
) -> Vec<FileOutcome> {
    files
        .iter()
        .map(|file| extract_file(pdf_text, file, document_type))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub document_type: DocumentType,
    pub rename: RenameOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RenamedFile {
    pub original_filename: String,
    pub new_filename: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DownloadLinks {
    pub excel: String,
    pub zip: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileInfo {
    pub zip_filename: String,
    pub zip_size: u64,
    pub excel_filename: String,
    pub total_renamed_files: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchReport {
    pub success: bool,
    pub timestamp: String,
    pub document_type: DocumentType,
    pub total_files: usize,
    pub processed_files: usize,
    pub failed_files: usize,
    /// Every upload's outcome, in upload order.
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<FileOutcome>,
    /// Records of the successful uploads, in upload order.
    #[schema(value_type = Vec<Object>)]
    pub extraction_data: Vec<ExtractionRecord>,
    pub renamed_files: Vec<RenamedFile>,
    pub download_links: DownloadLinks,
    pub file_info: FileInfo,
}

/// Run one extract-with-rename batch end to end.
pub fn run_batch(
    pdf_text: &dyn PdfTextExtractor,
    registry: &ArtifactRegistry,
    files: &[UploadedFile],
    options: BatchOptions,
) -> Result<BatchReport, BatchError> {
    let document_type = options.document_type;
    info!("Starting {} batch of {} file(s)", document_type, files.len());

    let workspace = BatchWorkspace::create(registry.root())?;
    let outcomes = extract_documents(pdf_text, files, document_type);

    let mut names = UniqueNames::new();
    let mut renamed_files = Vec::new();
    let mut bundle_entries = Vec::new();
    for (file, outcome) in files.iter().zip(&outcomes) {
        let Some(record) = outcome.record() else {
            continue;
        };
        let generated =
            generate_filename(record, options.rename.use_name, options.rename.use_passport);
        let new_filename = names.claim(&generated);
        let path = workspace.write_renamed(&new_filename, &file.bytes)?;
        debug!("Renamed '{}' -> '{}'", file.filename, new_filename);

        bundle_entries.push((new_filename.clone(), path));
        renamed_files.push(RenamedFile {
            original_filename: file.filename.clone(),
            new_filename,
        });
    }

    let records: Vec<&ExtractionRecord> = outcomes.iter().filter_map(FileOutcome::record).collect();
    let (excel_filename, zip_filename) = artifact_names(document_type);

    export::write_spreadsheet(&workspace.path().join(&excel_filename), document_type, &records)?;

    if bundle_entries.is_empty() {
        error!("{} batch produced no renamed files", document_type);
        return Err(BatchError::EmptyBundle);
    }
    let zip_path = workspace.path().join(&zip_filename);
    bundle::write_bundle(&zip_path, &bundle_entries)?;
    let zip_size = bundle::verify_bundle(&zip_path, bundle_entries.len()).map_err(|reason| {
        error!("Archive '{}' failed verification: {}", zip_filename, reason);
        BatchError::Verify(reason)
    })?;

    let (excel_path, zip_path) = publish_pair(&workspace, registry, &excel_filename, &zip_filename)?;
    registry.put(&excel_filename, excel_path, ArtifactKind::Spreadsheet);
    registry.put(&zip_filename, zip_path, ArtifactKind::Bundle);

    let processed_files = records.len();
    let report = BatchReport {
        success: true,
        timestamp: Local::now().to_rfc3339(),
        document_type,
        total_files: files.len(),
        processed_files,
        failed_files: files.len() - processed_files,
        extraction_data: records.into_iter().cloned().collect(),
        results: outcomes,
        download_links: DownloadLinks {
            excel: format!("/download-excel/{}", excel_filename),
            zip: format!("/download-zip/{}", zip_filename),
        },
        file_info: FileInfo {
            zip_filename,
            zip_size,
            excel_filename,
            total_renamed_files: renamed_files.len(),
        },
        renamed_files,
    };

    info!(
        "Finished {} batch: {} processed, {} failed",
        document_type, report.processed_files, report.failed_files
    );
    Ok(report)
}

/// Timestamped, collision-resistant names for one batch's artifacts.
fn artifact_names(document_type: DocumentType) -> (String, String) {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let id = Uuid::new_v4().simple().to_string();
    let id = &id[..8];
    (
        format!("Hasil_Ekstraksi_{}_{}_{}.xlsx", document_type, stamp, id),
        format!("Renamed_Files_{}_{}_{}.zip", document_type, stamp, id),
    )
}

/// Move both artifacts out of the workspace, or neither.
fn publish_pair(
    workspace: &BatchWorkspace,
    registry: &ArtifactRegistry,
    excel_filename: &str,
    zip_filename: &str,
) -> Result<(PathBuf, PathBuf), BatchError> {
    let excel_path = workspace.publish(excel_filename, registry.root())?;
    match workspace.publish(zip_filename, registry.root()) {
        Ok(zip_path) => Ok((excel_path, zip_path)),
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&excel_path) {
                warn!(
                    "Failed to roll back published spreadsheet '{}': {}",
                    excel_path.display(),
                    cleanup
                );
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf_text::PdfTextError;

    struct Utf8Text;

    impl PdfTextExtractor for Utf8Text {
        fn page_texts(&self, data: &[u8]) -> Result<Vec<String>, PdfTextError> {
            String::from_utf8(data.to_vec())
                .map(|text| vec![text])
                .map_err(|e| PdfTextError::Parse(e.to_string()))
        }
    }

    struct Exploding;

    impl PdfTextExtractor for Exploding {
        fn page_texts(&self, _data: &[u8]) -> Result<Vec<String>, PdfTextError> {
            panic!("font table corrupted")
        }
    }

    #[test]
    fn test_is_pdf_by_name() {
        assert!(UploadedFile::new("a.PDF", vec![]).is_pdf());
        assert!(!UploadedFile::new("a.pdf.txt", vec![]).is_pdf());
    }

    #[test]
    fn test_non_pdf_is_a_failure() {
        let outcome = extract_file(&Utf8Text, &UploadedFile::new("notes.txt", "x"), DocumentType::Sktt);
        match outcome {
            FileOutcome::Failure { filename, error } => {
                assert_eq!(filename, "notes.txt");
                assert_eq!(error, NOT_PDF_REASON);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_backend_panic_is_isolated() {
        let outcome = extract_file(&Exploding, &UploadedFile::new("a.pdf", "x"), DocumentType::Evln);
        assert!(!outcome.is_success());
        assert_eq!(outcome.filename(), "a.pdf");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = extract_file(&Utf8Text, &UploadedFile::new("a.pdf", ""), DocumentType::Evln);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["document_type"], "EVLN");
        assert_eq!(json["data"]["Jenis Dokumen"], "EVLN");
        assert!(json["data"]["Name"].is_null());

        let outcome = extract_file(&Utf8Text, &UploadedFile::new("a.doc", ""), DocumentType::Evln);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], NOT_PDF_REASON);
    }

    #[test]
    fn test_artifact_names() {
        let (excel, zip) = artifact_names(DocumentType::Itas);
        assert!(excel.starts_with("Hasil_Ekstraksi_ITAS_"));
        assert!(excel.ends_with(".xlsx"));
        assert!(zip.starts_with("Renamed_Files_ITAS_"));
        assert!(zip.ends_with(".zip"));
        assert_eq!(excel.len(), "Hasil_Ekstraksi_ITAS_20240101_120000_abcdef12.xlsx".len());
    }

    #[test]
    fn test_publish_pair_rolls_back_spreadsheet() {
        let root = tempfile::tempdir().unwrap();
        let registry = ArtifactRegistry::new(root.path(), None);
        let workspace = BatchWorkspace::create(root.path()).unwrap();
        fs::write(workspace.path().join("report.xlsx"), b"xlsx").unwrap();

        let result = publish_pair(&workspace, &registry, "report.xlsx", "missing.zip");

        assert!(matches!(result, Err(BatchError::Publish { ref name, .. }) if name == "missing.zip"));
        assert!(!root.path().join("report.xlsx").exists());
        assert!(!root.path().join("missing.zip").exists());
    }
}
