//! HTTP services.
//!
//! Each sub-module owns one API surface and exposes a `configure_routes()`
//! returning its Actix scope; `main.rs` mounts them side by side.
//! - `layouts`: upload, listing, deletion and direct fill/preview/generate
//!   of DOCX layouts.
//! - `drafts`: partial templates saved by an admin and completed later by a
//!   professor or collaborator.

pub mod drafts;
pub mod layouts;
pub(crate) mod output;

use actix_web::{HttpResponse, Responder};

/// `GET /api/health`.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
