use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Extension, Json,
};
use bytes::BytesMut;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::dto::document_dto::UploadedFile;
use crate::handler::parse_object_id;
use crate::service::document_service::{DocumentService, DocumentServiceImpl};
use crate::service::Actor;
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

// Upload one or more files for a client (multipart/form-data, fields named "file*")
pub async fn upload_documents_handler(
    State(service): State<Arc<DocumentServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(client_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let client_id = parse_object_id(&client_id)?;

    let mut files: Vec<UploadedFile> = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart field: {}", e);
        HandlerError::bad_request(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if !name.starts_with("file") {
            debug!("Skipping unexpected multipart field: {}", name);
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
        if filename.is_empty() {
            return Err(HandlerError::bad_request("File field is missing a filename"));
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut buf = BytesMut::new();
        let mut stream = field;
        while let Some(chunk) = stream.chunk().await.map_err(|e| {
            error!("Failed to read file chunk: {}", e);
            HandlerError::bad_request(format!("Failed to read file chunk: {}", e))
        })? {
            buf.extend_from_slice(&chunk);
        }

        info!("Received file: {} ({} bytes)", filename, buf.len());
        let size = buf.len();
        files.push(UploadedFile {
            filename,
            content_type,
            content: buf.to_vec(),
            size,
        });
    }

    let res = service.upload_documents(&actor, client_id, files).await?;
    Ok(Json(res))
}

pub async fn get_document_handler(
    State(service): State<Arc<DocumentServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    let res = service.get_document(&actor, id).await?;
    Ok(Json(res))
}

pub async fn list_documents_handler(
    State(service): State<Arc<DocumentServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let client_id = parse_object_id(&client_id)?;
    let res = service.list_documents(&actor, client_id).await?;
    Ok(Json(res))
}

pub async fn delete_document_handler(
    State(service): State<Arc<DocumentServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    service.delete_document(&actor, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
