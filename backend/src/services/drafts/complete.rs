use crate::config::Settings;
use crate::error::ApiError;
use crate::services::drafts::load_draft_and_layout;
use crate::services::output;
use actix_web::{web, HttpResponse};
use common::requests::CompleteDraftRequest;

/// `POST /api/drafts/{draft_id}/complete`: merges the caller's data over
/// the stored fields and returns the final DOCX or PDF. The merged data is
/// validated strictly against the layout's field schema.
///
/// Completion never mutates the draft: it stays available as a reusable
/// fill-in form, and concurrent completions each produce an independent
/// output.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    draft_id: web::Path<i64>,
    payload: web::Json<CompleteDraftRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    let (draft, layout) = load_draft_and_layout(&settings, draft_id.into_inner())?;
    let merged = draft.content.merged_with(&request.extra_data);
    output::generate(&settings, &layout, merged, request.format, &draft.title).await
}
