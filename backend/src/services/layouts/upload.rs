//! # Layout Upload Service
//!
//! Handles `POST /api/layouts/upload` as a multipart request with two
//! fields:
//! - `meta`: JSON with `name`, optional `description` and `creator_id`;
//! - `file`: the DOCX binary, MIME-checked against the DOCX type and
//!   bounded by the configured upload ceiling.
//!
//! The MIME type and the metadata are validated while the body streams in,
//! before any byte reaches durable storage; extraction then runs inside the
//! store so binary persistence and the field schema stay atomic.

use crate::config::Settings;
use crate::docx::DOCX_MIME;
use crate::error::ApiError;
use crate::store;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use common::requests::UploadLayoutMeta;
use futures_util::StreamExt;

pub(crate) async fn process(
    settings: web::Data<Settings>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut meta: Option<UploadLayoutMeta> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| ApiError::Validation(format!("invalid multipart payload: {}", e)))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some("meta") => {
                let bytes = read_field(&mut field, settings.max_upload_bytes).await?;
                let parsed: UploadLayoutMeta = serde_json::from_slice(&bytes)
                    .map_err(|e| ApiError::Validation(format!("invalid meta JSON: {}", e)))?;
                meta = Some(parsed);
            }
            Some("file") => {
                let is_docx = field
                    .content_type()
                    .map(|m| m.essence_str() == DOCX_MIME)
                    .unwrap_or(false);
                if !is_docx {
                    return Err(ApiError::Validation(format!(
                        "unsupported file type, expected {}",
                        DOCX_MIME
                    )));
                }
                file_bytes = Some(read_field(&mut field, settings.max_upload_bytes).await?);
            }
            _ => {}
        }
    }

    let meta = meta.ok_or_else(|| ApiError::Validation("missing meta field".to_string()))?;
    let bytes = file_bytes.ok_or_else(|| ApiError::Validation("missing file field".to_string()))?;

    let settings = settings.get_ref().clone();
    let layout = tokio::task::spawn_blocking(move || {
        store::insert_layout(
            &settings,
            &meta.name,
            meta.description.as_deref(),
            &meta.creator_id,
            &bytes,
        )
    })
    .await
    .map_err(ApiError::internal)??;

    Ok(HttpResponse::Created().json(layout))
}

/// Collects one multipart field into memory, enforcing the size ceiling as
/// the chunks arrive.
async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk =
            chunk.map_err(|e| ApiError::Validation(format!("upload interrupted: {}", e)))?;
        if bytes.len() + chunk.len() > limit {
            return Err(ApiError::Validation(format!(
                "upload exceeds the {} byte limit",
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
