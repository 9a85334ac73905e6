use std::sync::Arc;

use crate::artifact::ArtifactRegistry;
use crate::config::AppConfig;
use crate::pdf_text::{PdfExtractBackend, PdfTextExtractor};

/// Shared handler state, cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub registry: Arc<ArtifactRegistry>,
    pub pdf_text: Arc<dyn PdfTextExtractor>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_pdf_text(config, Arc::new(PdfExtractBackend::new()))
    }

    /// Same as [`AppState::new`] with a custom PDF text backend.
    pub fn with_pdf_text(config: AppConfig, pdf_text: Arc<dyn PdfTextExtractor>) -> Self {
        let registry = Arc::new(ArtifactRegistry::new(
            config.artifacts_dir.clone(),
            config.artifact_ttl,
        ));
        Self {
            config,
            registry,
            pdf_text,
        }
    }
}
