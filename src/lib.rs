use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod artifact;
pub mod batch;
pub mod config;
pub mod extract;
pub mod extraction;
pub mod pdf_text;
pub mod rename;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::extract::handlers::root,
        crate::extract::handlers::health,
        crate::extract::handlers::document_types,
        crate::extract::handlers::extract,
        crate::extract::handlers::extract_with_rename,
        crate::artifact::handlers::download_excel,
        crate::artifact::handlers::download_zip
    ),
    components(
        schemas(
            extraction::DocumentType,
            extract::handlers::ExtractRequest,
            extract::handlers::ExtractWithRenameRequest,
            extract::models::ExtractResponse,
            extract::models::DocumentTypeInfo,
            extract::models::DocumentTypesResponse,
            extract::models::HealthResponse,
            extract::models::RootResponse,
            batch::BatchReport,
            batch::RenamedFile,
            batch::DownloadLinks,
            batch::FileInfo,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Service", description = "Health and catalogue endpoints."),
        (name = "Extraction", description = "Permit PDF field extraction."),
        (name = "Downloads", description = "Spreadsheet and archive downloads.")
    )
)]
pub struct ApiDoc;

/// Register every route on an `App`. Shared by `run` and the API tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(extract::handlers::root)))
        .service(web::resource("/health").route(web::get().to(extract::handlers::health)))
        .service(
            web::resource("/document-types").route(web::get().to(extract::handlers::document_types)),
        )
        .service(web::resource("/extract").route(web::post().to(extract::handlers::extract)))
        .service(
            web::resource("/extract-with-rename")
                .route(web::post().to(extract::handlers::extract_with_rename)),
        )
        .service(
            web::resource("/download-excel/{filename}")
                .route(web::get().to(artifact::handlers::download_excel)),
        )
        .service(
            web::resource("/download-zip/{filename}")
                .route(web::get().to(artifact::handlers::download_zip)),
        );
}

fn cors(config: &AppConfig) -> Cors {
    let cors = if config.allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600)
}

fn spawn_artifact_sweeper(state: &AppState) {
    let registry = Arc::clone(&state.registry);
    let period = state.config.sweep_interval;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            registry.sweep_expired();
        }
    });
}

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    std::fs::create_dir_all(&config.artifacts_dir)?;
    log::info!("Artifacts directory: {}", config.artifacts_dir.display());

    let state = AppState::new(config.clone());
    if config.artifact_ttl.is_some() {
        spawn_artifact_sweeper(&state);
    }
    let app_state = web::Data::new(state);

    let prometheus = PrometheusMetricsBuilder::new("permit_extract_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let bind = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors(&config))
            .app_data(app_state.clone())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await
}
