use crate::config::Settings;
use crate::error::ApiError;
use crate::store;
use actix_web::{web, HttpResponse};
use log::info;

/// `DELETE /api/layouts/{layout_id}`: removes the row and the stored DOCX.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    layout_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = layout_id.into_inner();
    store::delete_layout(&settings, id)?;
    info!("layout {} deleted", id);
    Ok(HttpResponse::NoContent().finish())
}
