//! Placeholder extraction.
//!
//! Scans a DOCX package's main document XML for `{{field}}` tokens and
//! returns the deduplicated field names in first-seen order. Pure over the
//! input bytes; runs once at upload time, never lazily.

use crate::docx::{decode_entities, read_document_xml};
use crate::error::ApiError;
use regex::Regex;

/// Extracts the ordered set of placeholder names from a DOCX binary.
///
/// The XML is flattened to plain text first (tags stripped, entities
/// decoded), so placeholders split across inline runs are still found.
pub fn extract_fields(docx: &[u8]) -> Result<Vec<String>, ApiError> {
    let xml = read_document_xml(docx)?;
    let text = decode_entities(&strip_tags(&xml)?);
    extract_from_text(&text)
}

/// Removes every `<...>` tag, leaving only text content.
fn strip_tags(xml: &str) -> Result<String, ApiError> {
    let tag_re = Regex::new(r"<[^>]*>").map_err(ApiError::internal)?;
    Ok(tag_re.replace_all(xml, "").into_owned())
}

/// Scans plain text for `{{name}}` where name is any run of non-`}`
/// characters. Names are trimmed and collected first-seen, deduplicated.
fn extract_from_text(text: &str) -> Result<Vec<String>, ApiError> {
    let field_re = Regex::new(r"\{\{([^}]*)\}\}").map_err(ApiError::internal)?;
    let mut fields = Vec::new();
    for capture in field_re.captures_iter(text) {
        let name = capture[1].trim().to_string();
        if name.is_empty() {
            continue;
        }
        if !fields.contains(&name) {
            fields.push(name);
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::testutil::{make_docx, paragraph, zip_without_document};

    #[test]
    fn trims_dedupes_and_keeps_first_seen_order() {
        let body = format!(
            "{}{}{}",
            paragraph("{{a}}"),
            paragraph("{{ b }}"),
            paragraph("{{a}}")
        );
        let fields = extract_fields(&make_docx(&body)).unwrap();
        assert_eq!(fields, vec!["a", "b"]);
    }

    #[test]
    fn no_placeholders_yields_empty_list() {
        let docx = make_docx(&paragraph("plain text only"));
        assert!(extract_fields(&docx).unwrap().is_empty());
    }

    #[test]
    fn placeholder_split_across_runs_is_found() {
        let body = "<w:p><w:r><w:t>{{no</w:t></w:r><w:r><w:t>me}}</w:t></w:r></w:p>";
        let fields = extract_fields(&make_docx(body)).unwrap();
        assert_eq!(fields, vec!["nome"]);
    }

    #[test]
    fn entities_are_decoded_before_scanning() {
        let docx = make_docx(&paragraph("Tom &amp; Jerry {{campo}}"));
        assert_eq!(extract_fields(&docx).unwrap(), vec!["campo"]);
    }

    #[test]
    fn empty_placeholder_is_skipped() {
        let docx = make_docx(&paragraph("{{  }} {{ok}}"));
        assert_eq!(extract_fields(&docx).unwrap(), vec!["ok"]);
    }

    #[test]
    fn non_zip_bytes_are_a_template_format_error() {
        let err = extract_fields(b"not a zip at all").unwrap_err();
        assert!(matches!(err, ApiError::TemplateFormat(_)));
    }

    #[test]
    fn missing_document_entry_is_a_template_format_error() {
        let err = extract_fields(&zip_without_document()).unwrap_err();
        assert!(matches!(err, ApiError::TemplateFormat(_)));
    }
}
