//! Placeholder substitution.
//!
//! Takes a stored layout binary plus a field→value mapping and produces a
//! filled DOCX. Word splits text into inline runs at arbitrary points, so a
//! placeholder's `{{` and `}}` may be separated by run markup; substitution
//! works on the raw XML and collapses any tags sitting inside a placeholder
//! span. The tags inside such a span are paired closers/openers (end of one
//! run, start of the next), so removing them keeps the XML well formed.

use crate::docx::{decode_entities, read_document_xml, DOCUMENT_ENTRY};
use crate::error::ApiError;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Renders `values` into the layout binary, returning a filled DOCX.
/// Missing fields are substituted with empty text; strict flows validate
/// against the layout's field schema before calling this. Pure over inputs.
pub fn render_layout(docx: &[u8], values: &HashMap<String, String>) -> Result<Vec<u8>, ApiError> {
    let xml = read_document_xml(docx)?;
    let filled = substitute_placeholders(&xml, values)?;
    rebuild_package(docx, &filled)
}

/// A placeholder occurrence in the raw XML: the byte span covering the
/// whole `{{...}}` token (including any markup between its characters) and
/// the trimmed field name.
struct Span {
    start: usize,
    end: usize,
    name: String,
}

/// Replaces every `{{name}}` token in the document XML with the matching
/// value, XML-escaped. Fails with `Render` on an unterminated `{{`.
fn substitute_placeholders(
    xml: &str,
    values: &HashMap<String, String>,
) -> Result<String, ApiError> {
    let spans = find_spans(xml)?;
    let mut out = String::with_capacity(xml.len());
    let mut cursor = 0;
    for span in &spans {
        out.push_str(&xml[cursor..span.start]);
        let value = values.get(&span.name).map(String::as_str).unwrap_or("");
        out.push_str(&escape_value(value));
        cursor = span.end;
    }
    out.push_str(&xml[cursor..]);
    Ok(out)
}

/// Locates placeholder spans by walking the XML's text content (characters
/// outside `<...>` tags) and matching `{{` ... `}}` across run boundaries.
fn find_spans(xml: &str) -> Result<Vec<Span>, ApiError> {
    // Text characters with their byte offsets, markup skipped.
    let mut text = Vec::new();
    let mut in_tag = false;
    for (idx, ch) in xml.char_indices() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push((idx, ch)),
            _ => {}
        }
    }

    let mut spans = Vec::new();
    let mut i = 0;
    while i < text.len() {
        if text[i].1 != '{' || i + 1 >= text.len() || text[i + 1].1 != '{' {
            i += 1;
            continue;
        }
        // Opening pair found; scan for the closing pair.
        let mut j = i + 2;
        let mut close = None;
        while j < text.len() {
            if text[j].1 == '}' && j + 1 < text.len() && text[j + 1].1 == '}' {
                close = Some(j);
                break;
            }
            j += 1;
        }
        let close = close.ok_or_else(|| {
            ApiError::Render("unterminated {{ placeholder delimiter".to_string())
        })?;

        let name: String = text[i + 2..close].iter().map(|(_, c)| *c).collect();
        let end_char = text[close + 1];
        spans.push(Span {
            start: text[i].0,
            end: end_char.0 + end_char.1.len_utf8(),
            // Extraction scans entity-decoded text, so the schema stores
            // `a & b` for a name written `a &amp; b`. Decode here too or the
            // value lookup misses.
            name: decode_entities(name.trim()),
        });
        i = close + 2;
    }
    Ok(spans)
}

/// XML-escapes a field value; newlines become Word line breaks.
fn escape_value(value: &str) -> String {
    let escaped = value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;");
    escaped.replace('\n', "</w:t><w:br/><w:t xml:space=\"preserve\">")
}

/// Re-serializes the package with the filled document XML, copying every
/// other entry through unchanged.
fn rebuild_package(docx: &[u8], document_xml: &str) -> Result<Vec<u8>, ApiError> {
    let mut archive = ZipArchive::new(Cursor::new(docx))
        .map_err(|e| ApiError::TemplateFormat(format!("not a ZIP package: {}", e)))?;
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default();
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| ApiError::TemplateFormat(e.to_string()))?;
            let name = entry.name().to_string();
            if entry.is_dir() {
                writer
                    .add_directory(name, options)
                    .map_err(ApiError::internal)?;
                continue;
            }
            writer
                .start_file(name.as_str(), options)
                .map_err(ApiError::internal)?;
            if name == DOCUMENT_ENTRY {
                writer
                    .write_all(document_xml.as_bytes())
                    .map_err(ApiError::internal)?;
            } else {
                let mut raw = Vec::new();
                entry.read_to_end(&mut raw).map_err(ApiError::internal)?;
                writer.write_all(&raw).map_err(ApiError::internal)?;
            }
        }
        writer.finish().map_err(ApiError::internal)?;
    }
    Ok(buffer.into_inner())
}
