use crate::config::Settings;
use crate::error::ApiError;
use crate::store;
use actix_web::{web, HttpResponse};

/// `GET /api/layouts/{layout_id}`: one layout with its field schema.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    layout_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let layout = store::get_layout(&settings, layout_id.into_inner())?;
    Ok(HttpResponse::Ok().json(layout))
}
