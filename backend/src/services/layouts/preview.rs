use crate::config::Settings;
use crate::error::ApiError;
use crate::services::output;
use crate::store;
use actix_web::{web, HttpResponse};
use common::requests::PreviewRequest;

/// `POST /api/layouts/{layout_id}/preview`: renders the supplied values and
/// returns `{ html, warnings }`. Missing fields become empty text so the
/// preview works while the form is still being filled.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    layout_id: web::Path<i64>,
    payload: web::Json<PreviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let layout = store::get_layout(&settings, layout_id.into_inner())?;
    let bytes = store::read_layout_file(&layout)?;
    let response = output::preview(bytes, payload.into_inner().field_values).await?;
    Ok(HttpResponse::Ok().json(response))
}
