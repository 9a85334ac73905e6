use actix_multipart::{Field, Multipart};
use actix_web::HttpResponse;
use futures_util::StreamExt;
use log::debug;
use sanitize_filename::sanitize;

use crate::batch::UploadedFile;
use crate::ErrorResponse;

/// Form fields shared by `/extract` and `/extract-with-rename`.
#[derive(Debug, Default)]
pub struct ParsedExtractForm {
    pub files: Vec<UploadedFile>,
    pub document_type: Option<String>,
    pub use_name_for_rename: Option<bool>,
    pub use_passport_for_rename: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("Invalid form value: {0}")]
    MetadataError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid UTF-8 data: {0}")]
    Utf8Error(String),
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::IoError(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
            _ => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string())),
        }
    }
}

pub struct MultipartParser;

impl MultipartParser {
    pub async fn parse_extract_form(
        mut multipart: Multipart,
    ) -> Result<ParsedExtractForm, MultipartParseError> {
        let mut form = ParsedExtractForm::default();

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;
            let content_disposition = field
                .content_disposition()
                .ok_or_else(|| MultipartParseError::FieldError("Content disposition not found".to_string()))?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?
                .to_string();
            let maybe_filename = content_disposition.get_filename().map(|s| s.to_string());

            match name.as_str() {
                "files" | "file" => {
                    let bytes = read_bytes(&mut field).await?;
                    let filename = match maybe_filename {
                        Some(fname) => sanitize(&fname),
                        None => format!("file_{}.dat", form.files.len()),
                    };
                    debug!("Received upload '{}' ({} bytes)", filename, bytes.len());
                    form.files.push(UploadedFile::new(filename, bytes));
                }
                "document_type" => {
                    form.document_type = Some(read_text(&mut field).await?);
                }
                "use_name_for_rename" => {
                    let value = read_text(&mut field).await?;
                    form.use_name_for_rename = Some(parse_flag(&name, &value)?);
                }
                "use_passport_for_rename" => {
                    let value = read_text(&mut field).await?;
                    form.use_passport_for_rename = Some(parse_flag(&name, &value)?);
                }
                _ => {
                    continue;
                }
            }
        }

        Ok(form)
    }
}

async fn read_bytes(field: &mut Field) -> Result<Vec<u8>, MultipartParseError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.next().await {
        let data_chunk = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
        buffer.extend_from_slice(&data_chunk);
    }
    Ok(buffer)
}

async fn read_text(field: &mut Field) -> Result<String, MultipartParseError> {
    let bytes = read_bytes(field).await?;
    String::from_utf8(bytes)
        .map(|value| value.trim().to_string())
        .map_err(|e| MultipartParseError::Utf8Error(e.to_string()))
}

/// Form checkbox style booleans.
pub fn parse_flag(name: &str, value: &str) -> Result<bool, MultipartParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(MultipartParseError::MetadataError(format!(
            "{} must be true or false, got '{}'",
            name, value
        ))),
    }
}
