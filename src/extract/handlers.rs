use std::collections::BTreeMap;
use std::str::FromStr;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use chrono::{Local, Timelike};
use log::{error, info};

use super::models::{
    DocumentTypeInfo, DocumentTypesResponse, ExtractResponse, HealthResponse, RootResponse,
};
use super::multipart_parser::MultipartParser;
use crate::batch::{self, BatchOptions, BatchReport};
use crate::extraction::DocumentType;
use crate::rename::RenameOptions;
use crate::state::AppState;
use crate::ErrorResponse;

pub const SERVICE_NAME: &str = "PDF Document Extractor API";

/// Multipart form accepted by `/extract`.
#[derive(Debug, utoipa::ToSchema)]
pub struct ExtractRequest {
    /// One or more PDF files.
    #[allow(unused)]
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<Vec<u8>>,
    /// Defaults to `SKTT`.
    #[allow(unused)]
    pub document_type: Option<String>,
}

/// Multipart form accepted by `/extract-with-rename`.
#[derive(Debug, utoipa::ToSchema)]
pub struct ExtractWithRenameRequest {
    #[allow(unused)]
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<Vec<u8>>,
    #[allow(unused)]
    pub document_type: String,
    /// Defaults to true.
    #[allow(unused)]
    pub use_name_for_rename: Option<bool>,
    /// Defaults to true.
    #[allow(unused)]
    pub use_passport_for_rename: Option<bool>,
}

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    }
}

#[utoipa::path(
    tag = "Service",
    get,
    path = "/",
    responses(
        (status = 200, description = "Service greeting and endpoint overview", body = RootResponse)
    )
)]
pub async fn root() -> impl Responder {
    let now = Local::now();
    let endpoints: BTreeMap<String, String> = [
        ("extract", "/extract - POST multiple PDF files with document type"),
        ("extract_with_rename", "/extract-with-rename - POST with file renaming, Excel and ZIP export"),
        ("download_excel", "/download-excel/{filename} - GET exported spreadsheet"),
        ("download_zip", "/download-zip/{filename} - GET archive of renamed files"),
        ("document_types", "/document-types - GET supported document types"),
        ("docs", "/swagger-ui/ - API documentation"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    HttpResponse::Ok().json(RootResponse {
        message: format!("{}, {} is running", greeting(now.hour()), SERVICE_NAME),
        timestamp: now.to_rfc3339(),
        supported_documents: DocumentType::ALL.to_vec(),
        endpoints,
    })
}

#[utoipa::path(
    tag = "Service",
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Local::now().to_rfc3339(),
        service: SERVICE_NAME.to_string(),
    })
}

#[utoipa::path(
    tag = "Service",
    get,
    path = "/document-types",
    responses(
        (status = 200, description = "Supported document layouts", body = DocumentTypesResponse)
    )
)]
pub async fn document_types() -> impl Responder {
    HttpResponse::Ok().json(DocumentTypesResponse {
        supported_types: DocumentType::ALL.into_iter().map(DocumentTypeInfo::from).collect(),
    })
}

#[utoipa::path(
    tag = "Extraction",
    post,
    path = "/extract",
    request_body(content = inline(ExtractRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per-file extraction results", body = ExtractResponse),
        (status = 400, description = "No files or unsupported document type", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn extract(payload: Multipart, data: web::Data<AppState>) -> impl Responder {
    info!("Executing extract handler");

    let form = match MultipartParser::parse_extract_form(payload).await {
        Ok(form) => form,
        Err(e) => {
            error!("Failed to parse extract form: {}", e);
            return HttpResponse::from(e);
        }
    };

    if form.files.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request("No files provided"));
    }
    let document_type = match form.document_type.as_deref() {
        None | Some("") => DocumentType::Sktt,
        Some(code) => match DocumentType::from_str(code) {
            Ok(document_type) => document_type,
            Err(e) => {
                error!("{}", e);
                return HttpResponse::BadRequest()
                    .json(ErrorResponse::bad_request("Invalid document type"));
            }
        },
    };

    let pdf_text = data.pdf_text.clone();
    let files = form.files;
    info!("Extracting {} file(s) as {}", files.len(), document_type);
    let results = match web::block(move || {
        batch::extract_documents(pdf_text.as_ref(), &files, document_type)
    })
    .await
    {
        Ok(results) => results,
        Err(e) => {
            error!("Extraction worker failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Error processing files"));
        }
    };

    let response = ExtractResponse::new(document_type, results);
    info!(
        "Extracted {} of {} file(s)",
        response.processed_files, response.total_files
    );
    HttpResponse::Ok().json(response)
}

#[utoipa::path(
    tag = "Extraction",
    post,
    path = "/extract-with-rename",
    request_body(content = inline(ExtractWithRenameRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extraction data, rename mapping and download links", body = BatchReport),
        (status = 400, description = "No files or unsupported document type", body = ErrorResponse),
        (status = 500, description = "Spreadsheet or archive could not be built", body = ErrorResponse)
    )
)]
pub async fn extract_with_rename(payload: Multipart, data: web::Data<AppState>) -> impl Responder {
    info!("Executing extract_with_rename handler");

    let form = match MultipartParser::parse_extract_form(payload).await {
        Ok(form) => form,
        Err(e) => {
            error!("Failed to parse extract-with-rename form: {}", e);
            return HttpResponse::from(e);
        }
    };

    if form.files.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request("No files provided"));
    }
    let Some(document_type) = form
        .document_type
        .as_deref()
        .and_then(|code| DocumentType::from_str(code).ok())
    else {
        error!("Invalid document type: {:?}", form.document_type);
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request("Invalid document type"));
    };

    let options = BatchOptions {
        document_type,
        rename: RenameOptions {
            use_name: form.use_name_for_rename.unwrap_or(true),
            use_passport: form.use_passport_for_rename.unwrap_or(true),
        },
    };
    let pdf_text = data.pdf_text.clone();
    let registry = data.registry.clone();
    let files = form.files;

    match web::block(move || batch::run_batch(pdf_text.as_ref(), &registry, &files, options)).await {
        Ok(Ok(report)) => HttpResponse::Ok().json(report),
        Ok(Err(e)) => {
            error!("Batch failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Error processing files: {}",
                e
            )))
        }
        Err(e) => {
            error!("Batch worker failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Error processing files"))
        }
    }
}
