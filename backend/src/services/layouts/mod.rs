//! # Layout Service Module
//!
//! Aggregates the API endpoints for DOCX layouts under `/api/layouts`.
//!
//! ## Registered routes:
//!
//! *   **`POST /upload`** (`upload::process`): multipart upload of a new
//!     layout. Expects a `meta` JSON field (name, description, creator) and
//!     a `file` field holding the DOCX. Placeholders are extracted before
//!     anything is persisted; a rejected upload leaves no state behind.
//!
//! *   **`GET /`** (`list::process`): all layouts, newest first, with their
//!     field schemas so clients can build fill-in forms directly.
//!
//! *   **`GET /{layout_id}`** (`get::process`): one layout with its schema.
//!
//! *   **`DELETE /{layout_id}`** (`remove::process`): removes the row and
//!     the stored binary.
//!
//! *   **`POST /{layout_id}/preview`** (`preview::process`): renders the
//!     supplied field values and returns `{ html, warnings }`. Missing
//!     fields are tolerated and become empty text.
//!
//! *   **`POST /{layout_id}/generate`** (`generate::process`): renders and
//!     returns the final DOCX or PDF as an attachment. Required fields are
//!     validated strictly.

mod generate;
mod get;
mod list;
mod preview;
mod remove;
mod upload;

use actix_web::web::{self, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/layouts";

/// Configures and returns the Actix `Scope` for all layout routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("", get().to(list::process))
        .route("/{layout_id}", get().to(get::process))
        .route("/{layout_id}", web::delete().to(remove::process))
        .route("/{layout_id}/preview", post().to(preview::process))
        .route("/{layout_id}/generate", post().to(generate::process))
}
