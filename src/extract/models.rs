use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::batch::FileOutcome;
use crate::extraction::DocumentType;

#[derive(Serialize, ToSchema)]
pub struct ExtractResponse {
    pub success: bool,
    pub timestamp: String,
    pub document_type: DocumentType,
    pub total_files: usize,
    pub processed_files: usize,
    pub failed_files: usize,
    /// One entry per upload, in upload order.
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<FileOutcome>,
}

impl ExtractResponse {
    pub fn new(document_type: DocumentType, results: Vec<FileOutcome>) -> Self {
        let processed_files = results.iter().filter(|r| r.is_success()).count();
        Self {
            success: true,
            timestamp: chrono::Local::now().to_rfc3339(),
            document_type,
            total_files: results.len(),
            processed_files,
            failed_files: results.len() - processed_files,
            results,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DocumentTypeInfo {
    pub code: DocumentType,
    pub name: String,
    pub description: String,
    /// Export column order, ending with the document-type tag.
    pub fields: Vec<String>,
}

impl From<DocumentType> for DocumentTypeInfo {
    fn from(document_type: DocumentType) -> Self {
        Self {
            code: document_type,
            name: document_type.display_name().to_string(),
            description: document_type.description().to_string(),
            fields: document_type.columns().into_iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DocumentTypesResponse {
    pub supported_types: Vec<DocumentTypeInfo>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub timestamp: String,
    pub supported_documents: Vec<DocumentType>,
    pub endpoints: BTreeMap<String, String>,
}
