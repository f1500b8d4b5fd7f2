use crate::config::Settings;
use crate::error::ApiError;
use crate::store;
use actix_web::{web, HttpResponse};

/// `GET /api/layouts`: all layouts, newest first.
pub(crate) async fn process(settings: web::Data<Settings>) -> Result<HttpResponse, ApiError> {
    let layouts = store::list_layouts(&settings)?;
    Ok(HttpResponse::Ok().json(layouts))
}
