use crate::config::Settings;
use crate::error::ApiError;
use crate::store;
use actix_web::{web, HttpResponse};
use log::info;

/// `DELETE /api/drafts/{draft_id}`.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    draft_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = draft_id.into_inner();
    store::delete_draft(&settings, id)?;
    info!("draft {} deleted", id);
    Ok(HttpResponse::NoContent().finish())
}
