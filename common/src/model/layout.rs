use crate::model::field::FieldSpec;
use serde::{Deserialize, Serialize};

/// A stored DOCX layout together with the field schema extracted from it
/// at upload time.
///
/// The schema is persisted alongside the binary so that listing and
/// validation never have to re-open the DOCX package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Path of the stored DOCX under the layout storage directory.
    /// Write-once; removed together with the row on delete.
    #[serde(skip_serializing, default)]
    pub file_path: String,
    pub fields: Vec<FieldSpec>,
    pub creator_id: String,
    pub created_at: String,
}

impl Layout {
    /// Names of all placeholders, in first-seen document order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
