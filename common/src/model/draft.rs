use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status of a row in the shared `documents` table. Partial templates live
/// there with status `template`; the remaining states belong to finalized
/// documents managed by the document registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Template,
    Draft,
    Published,
    Archived,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Template => "template",
            DocumentStatus::Draft => "draft",
            DocumentStatus::Published => "published",
            DocumentStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "template" => Some(DocumentStatus::Template),
            "draft" => Some(DocumentStatus::Draft),
            "published" => Some(DocumentStatus::Published),
            "archived" => Some(DocumentStatus::Archived),
            _ => None,
        }
    }
}

/// Role allowed to see and complete a partial template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Professor,
    Colaborador,
    All,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Professor => "professor",
            Audience::Colaborador => "colaborador",
            Audience::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "professor" => Some(Audience::Professor),
            "colaborador" => Some(Audience::Colaborador),
            "all" => Some(Audience::All),
            _ => None,
        }
    }

    /// Whether a draft tagged with `self` is visible to `viewer`.
    /// Drafts tagged `all` are visible to everyone.
    pub fn visible_to(&self, viewer: Audience) -> bool {
        matches!(self, Audience::All) || *self == viewer
    }
}

/// Soft reference from a draft back to its originating layout.
///
/// Kept as plain metadata rather than a foreign key so the draft row
/// survives layout deletion; the missing binary is then reported as a
/// distinct error when the draft is previewed or completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutReference {
    pub layout_id: i64,
    pub layout_name: String,
    pub layout_description: Option<String>,
    pub audience: Audience,
}

/// Content column of a partial template: the field values supplied so far
/// plus the layout reference, as two separate members.
///
/// The metadata is deliberately not part of `fields`, so merging user data
/// can never clobber it and it can never leak into a rendered document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftContent {
    pub fields: HashMap<String, String>,
    pub metadata: LayoutReference,
}

impl DraftContent {
    /// Shallow-merges `extra` over the stored fields; `extra` wins on key
    /// collision. The stored content is left untouched.
    pub fn merged_with(&self, extra: &HashMap<String, String>) -> HashMap<String, String> {
        let mut merged = self.fields.clone();
        for (key, value) in extra {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// A partial template: a document row holding a subset of field values
/// pre-filled against a layout, pending completion by another party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: i64,
    pub title: String,
    pub status: DocumentStatus,
    pub content: DraftContent,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> LayoutReference {
        LayoutReference {
            layout_id: 7,
            layout_name: "Ata de reunião".to_string(),
            layout_description: None,
            audience: Audience::Professor,
        }
    }

    #[test]
    fn merge_extra_wins_on_collision() {
        let mut fields = HashMap::new();
        fields.insert("nome".to_string(), "Ana".to_string());
        fields.insert("data".to_string(), "old".to_string());
        let content = DraftContent {
            fields,
            metadata: reference(),
        };

        let mut extra = HashMap::new();
        extra.insert("data".to_string(), "2024-01-01".to_string());

        let merged = content.merged_with(&extra);
        assert_eq!(merged["nome"], "Ana");
        assert_eq!(merged["data"], "2024-01-01");
        // stored content untouched
        assert_eq!(content.fields["data"], "old");
    }

    #[test]
    fn metadata_never_appears_among_merged_fields() {
        let content = DraftContent {
            fields: HashMap::new(),
            metadata: reference(),
        };
        let merged = content.merged_with(&HashMap::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn audience_visibility() {
        assert!(Audience::All.visible_to(Audience::Professor));
        assert!(Audience::Professor.visible_to(Audience::Professor));
        assert!(!Audience::Professor.visible_to(Audience::Colaborador));
    }

    #[test]
    fn audience_rejects_unknown_values() {
        assert_eq!(Audience::parse("professor"), Some(Audience::Professor));
        assert_eq!(Audience::parse("aluno"), None);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            DocumentStatus::Template,
            DocumentStatus::Draft,
            DocumentStatus::Published,
            DocumentStatus::Archived,
        ] {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
    }
}
