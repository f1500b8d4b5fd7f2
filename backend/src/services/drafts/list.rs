use crate::config::Settings;
use crate::error::ApiError;
use crate::store;
use actix_web::{web, HttpResponse};
use common::model::draft::Audience;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    audience: Option<String>,
}

/// `GET /api/drafts`: drafts newest first. With `?audience=professor` (or
/// `colaborador`) only drafts visible to that role are returned; drafts
/// tagged `all` are always included.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let visible_to = match &query.audience {
        Some(raw) => Some(Audience::parse(raw).ok_or_else(|| {
            ApiError::Validation(format!(
                "unknown audience '{}', expected professor, colaborador or all",
                raw
            ))
        })?),
        None => None,
    };
    let drafts = store::list_drafts(&settings, visible_to)?;
    Ok(HttpResponse::Ok().json(drafts))
}
