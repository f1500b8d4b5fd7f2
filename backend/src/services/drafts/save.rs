use crate::config::Settings;
use crate::error::ApiError;
use crate::store;
use actix_web::{web, HttpResponse};
use common::model::draft::{DraftContent, LayoutReference};
use common::requests::SaveDraftRequest;
use log::info;

/// `POST /api/drafts`: saves a partially filled layout as a draft.
///
/// The layout must exist at save time; its id, name and description are
/// copied into the draft's metadata so the draft stays readable even if
/// the layout is deleted later. The audience value is already validated by
/// deserialization into the `Audience` enum.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    payload: web::Json<SaveDraftRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    if request.title.trim().is_empty() {
        return Err(ApiError::Validation(
            "draft title must not be blank".to_string(),
        ));
    }

    let layout = store::get_layout(&settings, request.layout_id)?;
    let content = DraftContent {
        fields: request.partial_data,
        metadata: LayoutReference {
            layout_id: layout.id,
            layout_name: layout.name.clone(),
            layout_description: layout.description.clone(),
            audience: request.audience,
        },
    };

    let draft = store::insert_draft(&settings, request.title.trim(), &content)?;
    info!(
        "draft {} saved from layout {} for audience {}",
        draft.id,
        layout.id,
        content.metadata.audience.as_str()
    );
    Ok(HttpResponse::Created().json(draft))
}
