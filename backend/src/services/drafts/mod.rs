//! # Partial Template Service Module
//!
//! Aggregates the API endpoints for partial templates ("drafts") under
//! `/api/drafts`. A draft is a layout pre-filled by an administrator and
//! tagged with the audience allowed to complete it; completing a draft
//! never consumes it, so the same draft serves as a reusable fill-in form.
//!
//! ## Registered routes:
//!
//! *   **`POST /`** (`save::process`): saves a partially filled layout with
//!     a title and an audience tag.
//! *   **`GET /`** (`list::process`): drafts, newest first; `?audience=`
//!     restricts to drafts visible to that role.
//! *   **`GET /{draft_id}`** (`get::process`): one draft with its content.
//! *   **`POST /{draft_id}/preview`** (`preview::process`): merges extra
//!     data over the stored fields and returns the HTML preview.
//! *   **`POST /{draft_id}/complete`** (`complete::process`): same merge,
//!     strict validation, and the final DOCX or PDF as an attachment.
//! *   **`DELETE /{draft_id}`** (`remove::process`).

mod complete;
mod get;
mod list;
mod preview;
mod remove;
mod save;

use crate::config::Settings;
use crate::error::ApiError;
use crate::store;
use actix_web::web::{self, get, post, scope};
use actix_web::Scope;
use common::model::draft::Draft;
use common::model::layout::Layout;

const API_PATH: &str = "/api/drafts";

/// Configures and returns the Actix `Scope` for all draft routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(save::process))
        .route("", get().to(list::process))
        .route("/{draft_id}", get().to(get::process))
        .route("/{draft_id}", web::delete().to(remove::process))
        .route("/{draft_id}/preview", post().to(preview::process))
        .route("/{draft_id}/complete", post().to(complete::process))
}

/// Loads a draft together with the layout its metadata points to.
///
/// Either lookup can come back `NotFound`; the layout binary being gone
/// surfaces later as `MissingLayoutFile` when the caller reads the file.
fn load_draft_and_layout(settings: &Settings, draft_id: i64) -> Result<(Draft, Layout), ApiError> {
    let draft = store::get_draft(settings, draft_id)?;
    let layout = store::get_layout(settings, draft.content.metadata.layout_id)?;
    Ok((draft, layout))
}
