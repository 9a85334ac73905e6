use actix_files::NamedFile;
use actix_web::http::header::{
    self, ContentDisposition, DispositionParam, DispositionType, HeaderValue,
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info, warn};

use super::{Artifact, ArtifactError, ArtifactKind};
use crate::state::AppState;
use crate::ErrorResponse;

#[utoipa::path(
    tag = "Downloads",
    get,
    path = "/download-excel/{filename}",
    params(
        ("filename" = String, Path, description = "Spreadsheet name returned by /extract-with-rename")
    ),
    responses(
        (status = 200, description = "Spreadsheet file", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 404, description = "Unknown or expired file", body = ErrorResponse)
    )
)]
pub async fn download_excel(
    req: HttpRequest,
    filename: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    serve(&req, &filename.into_inner(), ArtifactKind::Spreadsheet, &data)
}

#[utoipa::path(
    tag = "Downloads",
    get,
    path = "/download-zip/{filename}",
    params(
        ("filename" = String, Path, description = "Archive name, or any part of it")
    ),
    responses(
        (status = 200, description = "Archive of renamed PDFs", content_type = "application/zip"),
        (status = 404, description = "Unknown or expired file", body = ErrorResponse)
    )
)]
pub async fn download_zip(
    req: HttpRequest,
    filename: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    serve(&req, &filename.into_inner(), ArtifactKind::Bundle, &data)
}

fn serve(req: &HttpRequest, requested: &str, kind: ArtifactKind, data: &AppState) -> HttpResponse {
    info!("Download requested for {} '{}'", kind, requested);

    let artifact = match data.registry.get(requested, kind) {
        Ok(artifact) => artifact,
        Err(e) => {
            match &e {
                ArtifactError::NotFound { .. } => warn!("{}", e),
                ArtifactError::Stale { .. } => error!("{}", e),
            }
            return HttpResponse::NotFound().json(ErrorResponse::not_found(&e.to_string()));
        }
    };

    match open_attachment(&artifact) {
        Ok(file) => {
            info!("Serving {} '{}' ({} bytes)", kind, artifact.name, artifact.size);
            let mut response = file.into_response(req);
            let headers = response.headers_mut();
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            );
            headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
            headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
            response
        }
        Err(e) => {
            error!("Failed to open {} '{}': {}", kind, artifact.name, e);
            HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
                "{} not found: {}",
                kind, artifact.name
            )))
        }
    }
}

fn open_attachment(artifact: &Artifact) -> std::io::Result<NamedFile> {
    let content_type = mime_guess::from_path(&artifact.path).first_or_octet_stream();
    Ok(NamedFile::open(&artifact.path)?
        .set_content_type(content_type)
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(artifact.name.clone())],
        }))
}
