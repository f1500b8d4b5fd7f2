//! Persistence for layouts and partial templates.
//!
//! Layout binaries live on disk under the storage directory with uuid-based
//! names (write-once, never reused); their metadata and the extracted field
//! schema live in the `layouts` table. Partial templates are rows of the
//! shared `documents` table with status `template` and a JSON content
//! column. The SQL for both entities is kept here so the service handlers
//! stay thin.

use crate::config::Settings;
use crate::db;
use crate::docx::extract::extract_fields;
use crate::error::ApiError;
use common::model::draft::{Audience, DocumentStatus, Draft, DraftContent};
use common::model::field::FieldSpec;
use common::model::layout::Layout;
use log::warn;
use rusqlite::{params, OptionalExtension, Row};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Creates a layout from an uploaded DOCX.
///
/// Extraction runs before anything is written, so a package that cannot be
/// parsed rejects the upload without leaving a file behind. If the insert
/// fails after the binary was stored, the file is removed again.
pub fn insert_layout(
    settings: &Settings,
    name: &str,
    description: Option<&str>,
    creator_id: &str,
    bytes: &[u8],
) -> Result<Layout, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation(
            "layout name must not be blank".to_string(),
        ));
    }
    if name.len() > 255 {
        return Err(ApiError::Validation(
            "layout name must be at most 255 characters".to_string(),
        ));
    }

    let field_names = extract_fields(bytes)?;
    let specs: Vec<FieldSpec> = field_names
        .iter()
        .map(|n| FieldSpec::from_name(n))
        .collect();
    let placeholders_json = serde_json::to_string(&specs)?;
    let placeholders_text = field_names.join(",");

    fs::create_dir_all(&settings.storage_dir)?;
    let file_path: PathBuf =
        PathBuf::from(&settings.storage_dir).join(format!("{}.docx", Uuid::new_v4()));
    let file_path_str = file_path.to_string_lossy().into_owned();
    fs::write(&file_path, bytes)?;

    let conn = db::open(&settings.db_path)?;
    let inserted = conn.execute(
        "INSERT INTO layouts (name, description, file_path, placeholders_json, placeholders_text, creator_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            name,
            description,
            file_path_str,
            placeholders_json,
            placeholders_text,
            creator_id
        ],
    );
    if let Err(e) = inserted {
        // No orphaned binaries on a failed insert.
        if let Err(unlink) = fs::remove_file(&file_path) {
            warn!("failed to remove layout file after insert error: {}", unlink);
        }
        return Err(ApiError::internal(e));
    }

    get_layout(settings, conn.last_insert_rowid())
}

pub fn get_layout(settings: &Settings, id: i64) -> Result<Layout, ApiError> {
    let conn = db::open(&settings.db_path)?;
    let row = conn
        .query_row(
            "SELECT id, name, description, file_path, placeholders_json, creator_id, created_at
             FROM layouts WHERE id = ?1",
            params![id],
            layout_columns,
        )
        .optional()?;
    match row {
        Some(columns) => layout_from_columns(columns),
        None => Err(ApiError::NotFound("layout")),
    }
}

/// All layouts, newest first.
pub fn list_layouts(settings: &Settings) -> Result<Vec<Layout>, ApiError> {
    let conn = db::open(&settings.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT id, name, description, file_path, placeholders_json, creator_id, created_at
         FROM layouts ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([], layout_columns)?;
    let mut layouts = Vec::new();
    for row in rows {
        layouts.push(layout_from_columns(row?)?);
    }
    Ok(layouts)
}

/// Removes the database row and the binary behind it. The two stores are
/// not atomic; the row goes first and a failed unlink is only logged, since
/// uuid file names are never reused.
pub fn delete_layout(settings: &Settings, id: i64) -> Result<(), ApiError> {
    let layout = get_layout(settings, id)?;
    let conn = db::open(&settings.db_path)?;
    conn.execute("DELETE FROM layouts WHERE id = ?1", params![id])?;
    if let Err(e) = fs::remove_file(&layout.file_path) {
        warn!("layout {} deleted but file unlink failed: {}", id, e);
    }
    Ok(())
}

/// Reads the stored binary. A missing file is a distinct error from a
/// missing row: the draft pointing here may outlive the layout file.
pub fn read_layout_file(layout: &Layout) -> Result<Vec<u8>, ApiError> {
    match fs::read(&layout.file_path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::MissingLayoutFile),
        Err(e) => Err(ApiError::internal(e)),
    }
}

type LayoutColumns = (i64, String, Option<String>, String, String, String, String);

fn layout_columns(row: &Row<'_>) -> rusqlite::Result<LayoutColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn layout_from_columns(columns: LayoutColumns) -> Result<Layout, ApiError> {
    let (id, name, description, file_path, placeholders_json, creator_id, created_at) = columns;
    let fields: Vec<FieldSpec> = serde_json::from_str(&placeholders_json)?;
    Ok(Layout {
        id,
        name,
        description,
        file_path,
        fields,
        creator_id,
        created_at,
    })
}

/// Stores a partial template as a `documents` row with status `template`.
pub fn insert_draft(
    settings: &Settings,
    title: &str,
    content: &DraftContent,
) -> Result<Draft, ApiError> {
    let conn = db::open(&settings.db_path)?;
    conn.execute(
        "INSERT INTO documents (title, status, content) VALUES (?1, ?2, ?3)",
        params![
            title,
            DocumentStatus::Template.as_str(),
            serde_json::to_string(content)?
        ],
    )?;
    get_draft(settings, conn.last_insert_rowid())
}

pub fn get_draft(settings: &Settings, id: i64) -> Result<Draft, ApiError> {
    let conn = db::open(&settings.db_path)?;
    let row = conn
        .query_row(
            "SELECT id, title, status, content, created_at
             FROM documents WHERE id = ?1 AND status = ?2",
            params![id, DocumentStatus::Template.as_str()],
            draft_columns,
        )
        .optional()?;
    match row {
        Some(columns) => draft_from_columns(columns),
        None => Err(ApiError::NotFound("draft")),
    }
}

/// All partial templates, newest first, optionally restricted to those
/// visible to one audience (`all`-tagged drafts are always included).
pub fn list_drafts(
    settings: &Settings,
    visible_to: Option<Audience>,
) -> Result<Vec<Draft>, ApiError> {
    let conn = db::open(&settings.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT id, title, status, content, created_at
         FROM documents WHERE status = ?1 ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![DocumentStatus::Template.as_str()], draft_columns)?;
    let mut drafts = Vec::new();
    for row in rows {
        let draft = draft_from_columns(row?)?;
        if let Some(viewer) = visible_to {
            if !draft.content.metadata.audience.visible_to(viewer) {
                continue;
            }
        }
        drafts.push(draft);
    }
    Ok(drafts)
}

pub fn delete_draft(settings: &Settings, id: i64) -> Result<(), ApiError> {
    let conn = db::open(&settings.db_path)?;
    let affected = conn.execute(
        "DELETE FROM documents WHERE id = ?1 AND status = ?2",
        params![id, DocumentStatus::Template.as_str()],
    )?;
    if affected == 0 {
        return Err(ApiError::NotFound("draft"));
    }
    Ok(())
}

type DraftColumns = (i64, String, String, String, String);

fn draft_columns(row: &Row<'_>) -> rusqlite::Result<DraftColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn draft_from_columns(columns: DraftColumns) -> Result<Draft, ApiError> {
    let (id, title, status, content, created_at) = columns;
    let status = DocumentStatus::parse(&status)
        .ok_or_else(|| ApiError::internal(format!("unknown document status '{}'", status)))?;
    let content: DraftContent = serde_json::from_str(&content)?;
    Ok(Draft {
        id,
        title,
        status,
        content,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::docx::testutil::{make_docx, paragraph};
    use common::model::draft::LayoutReference;
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_settings(dir: &TempDir) -> Settings {
        let root = dir.path();
        let settings = Settings {
            host: "127.0.0.1".to_string(),
            port: 0,
            db_path: root.join("test.sqlite").to_string_lossy().into_owned(),
            storage_dir: root.join("layouts").to_string_lossy().into_owned(),
            max_upload_bytes: 10 * 1024 * 1024,
            pdf_timeout: Duration::from_secs(30),
        };
        db::init_schema(&settings.db_path).expect("schema");
        settings
    }

    fn sample_docx() -> Vec<u8> {
        make_docx(&paragraph("Aluno {{nome}} em {{data}}"))
    }

    #[test]
    fn upload_extracts_schema_and_stores_binary() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);

        let layout =
            insert_layout(&settings, "Boletim", Some("notas"), "admin-1", &sample_docx()).unwrap();
        assert_eq!(layout.field_names(), vec!["nome", "data"]);
        assert!(std::path::Path::new(&layout.file_path).exists());

        let fetched = get_layout(&settings, layout.id).unwrap();
        assert_eq!(fetched.name, "Boletim");
        assert_eq!(fetched.field_names(), vec!["nome", "data"]);
    }

    #[test]
    fn blank_name_is_rejected_before_any_write() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);

        let err = insert_layout(&settings, "   ", None, "admin-1", &sample_docx()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(!std::path::Path::new(&settings.storage_dir).exists());
    }

    #[test]
    fn unparseable_docx_rejects_the_upload_without_a_file() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);

        let err = insert_layout(&settings, "Boletim", None, "admin-1", b"garbage").unwrap_err();
        assert!(matches!(err, ApiError::TemplateFormat(_)));
        assert!(!std::path::Path::new(&settings.storage_dir).exists());
    }

    #[test]
    fn list_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);

        insert_layout(&settings, "Primeiro", None, "admin-1", &sample_docx()).unwrap();
        insert_layout(&settings, "Segundo", None, "admin-1", &sample_docx()).unwrap();

        let layouts = list_layouts(&settings).unwrap();
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].name, "Segundo");
        assert_eq!(layouts[1].name, "Primeiro");
    }

    #[test]
    fn delete_removes_row_and_file() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);

        let layout = insert_layout(&settings, "Boletim", None, "admin-1", &sample_docx()).unwrap();
        delete_layout(&settings, layout.id).unwrap();

        assert!(matches!(
            get_layout(&settings, layout.id).unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(!std::path::Path::new(&layout.file_path).exists());
    }

    #[test]
    fn delete_of_missing_layout_is_not_found() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);
        assert!(matches!(
            delete_layout(&settings, 99).unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn missing_binary_is_a_distinct_error_from_missing_row() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);

        let layout = insert_layout(&settings, "Boletim", None, "admin-1", &sample_docx()).unwrap();
        std::fs::remove_file(&layout.file_path).unwrap();

        let err = read_layout_file(&layout).unwrap_err();
        assert!(matches!(err, ApiError::MissingLayoutFile));
    }

    fn draft_content(audience: Audience) -> DraftContent {
        let mut fields = HashMap::new();
        fields.insert("nome".to_string(), "Ana".to_string());
        DraftContent {
            fields,
            metadata: LayoutReference {
                layout_id: 1,
                layout_name: "Boletim".to_string(),
                layout_description: None,
                audience,
            },
        }
    }

    #[test]
    fn draft_round_trips_through_the_documents_table() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);

        let draft = insert_draft(&settings, "Boletim da Ana", &draft_content(Audience::Professor))
            .unwrap();
        assert_eq!(draft.status, DocumentStatus::Template);

        let fetched = get_draft(&settings, draft.id).unwrap();
        assert_eq!(fetched.title, "Boletim da Ana");
        assert_eq!(fetched.content.fields["nome"], "Ana");
        assert_eq!(fetched.content.metadata.audience, Audience::Professor);
    }

    #[test]
    fn draft_list_filters_by_audience() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);

        insert_draft(&settings, "Para professores", &draft_content(Audience::Professor)).unwrap();
        insert_draft(&settings, "Para todos", &draft_content(Audience::All)).unwrap();

        let professor_view = list_drafts(&settings, Some(Audience::Professor)).unwrap();
        assert_eq!(professor_view.len(), 2);

        let colaborador_view = list_drafts(&settings, Some(Audience::Colaborador)).unwrap();
        assert_eq!(colaborador_view.len(), 1);
        assert_eq!(colaborador_view[0].title, "Para todos");

        let unfiltered = list_drafts(&settings, None).unwrap();
        assert_eq!(unfiltered.len(), 2);
    }

    #[test]
    fn deleting_a_draft_twice_is_not_found() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);

        let draft = insert_draft(&settings, "Efemero", &draft_content(Audience::All)).unwrap();
        delete_draft(&settings, draft.id).unwrap();
        assert!(matches!(
            delete_draft(&settings, draft.id).unwrap_err(),
            ApiError::NotFound(_)
        ));
    }
}
