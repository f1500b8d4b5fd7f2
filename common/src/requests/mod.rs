use crate::model::draft::Audience;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Output formats a layout or draft can be generated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Docx,
    Pdf,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }
}

/// Metadata part of the multipart layout upload (the `meta` field).
#[derive(Debug, Clone, Deserialize)]
pub struct UploadLayoutMeta {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub creator_id: String,
}

/// Body of `POST /api/layouts/{id}/preview`.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub field_values: HashMap<String, String>,
}

/// Body of `POST /api/layouts/{id}/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub field_values: HashMap<String, String>,
    pub format: OutputFormat,
}

/// Body of `POST /api/drafts`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveDraftRequest {
    pub layout_id: i64,
    #[serde(default)]
    pub partial_data: HashMap<String, String>,
    pub title: String,
    pub audience: Audience,
}

/// Body of `POST /api/drafts/{id}/preview`.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftPreviewRequest {
    #[serde(default)]
    pub extra_data: HashMap<String, String>,
}

/// Body of `POST /api/drafts/{id}/complete`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteDraftRequest {
    #[serde(default)]
    pub extra_data: HashMap<String, String>,
    pub format: OutputFormat,
}

/// Response of the preview endpoints: the rendered HTML plus non-fatal
/// structural warnings from the DOCX conversion.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub html: String,
    pub warnings: Vec<String>,
}
