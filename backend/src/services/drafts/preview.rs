use crate::config::Settings;
use crate::error::ApiError;
use crate::services::drafts::load_draft_and_layout;
use crate::services::output;
use crate::store;
use actix_web::{web, HttpResponse};
use common::requests::DraftPreviewRequest;

/// `POST /api/drafts/{draft_id}/preview`: merges the caller's extra data
/// over the stored fields (extra wins on collision) and returns the HTML
/// preview. Fields still missing after the merge become empty text.
///
/// The layout binary may have been deleted independently of the draft;
/// that case surfaces as `MISSING_LAYOUT_FILE`, not as a crash.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    draft_id: web::Path<i64>,
    payload: web::Json<DraftPreviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let (draft, layout) = load_draft_and_layout(&settings, draft_id.into_inner())?;
    let bytes = store::read_layout_file(&layout)?;
    let merged = draft.content.merged_with(&payload.extra_data);
    let response = output::preview(bytes, merged).await?;
    Ok(HttpResponse::Ok().json(response))
}
