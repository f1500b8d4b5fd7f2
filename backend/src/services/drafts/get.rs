use crate::config::Settings;
use crate::error::ApiError;
use crate::store;
use actix_web::{web, HttpResponse};

/// `GET /api/drafts/{draft_id}`: one draft with its stored fields and
/// layout metadata.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    draft_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let draft = store::get_draft(&settings, draft_id.into_inner())?;
    Ok(HttpResponse::Ok().json(draft))
}
