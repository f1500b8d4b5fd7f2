use crate::config::Settings;
use crate::error::ApiError;
use crate::services::output;
use crate::store;
use actix_web::{web, HttpResponse};
use common::requests::GenerateRequest;

/// `POST /api/layouts/{layout_id}/generate`: renders the layout with the
/// supplied values and returns the DOCX or PDF as an attachment. Every
/// required field of the layout's schema must be present.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    layout_id: web::Path<i64>,
    payload: web::Json<GenerateRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    let layout = store::get_layout(&settings, layout_id.into_inner())?;
    output::generate(
        &settings,
        &layout,
        request.field_values,
        request.format,
        &layout.name,
    )
    .await
}
