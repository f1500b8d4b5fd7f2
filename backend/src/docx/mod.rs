//! # DOCX Engine
//!
//! Everything that touches the DOCX package format lives here:
//! - `extract`: pulls `{{field}}` placeholder names out of an uploaded layout.
//! - `render`: substitutes field values into a layout, producing a filled DOCX.
//! - `html`: converts a filled DOCX to HTML for previews.
//! - `pdf`: the HTML + headless-browser pipeline producing the final PDF.
//!
//! A DOCX is a ZIP package whose text content sits in `word/document.xml`;
//! all four modules operate on that entry and never mutate stored layouts.

pub mod extract;
pub mod html;
pub mod pdf;
pub mod render;

use crate::error::ApiError;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// MIME type accepted by the layout upload endpoint.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Name of the main document entry inside the package.
pub const DOCUMENT_ENTRY: &str = "word/document.xml";

/// Decodes the minimal entity set a Word document body uses for text.
/// `&amp;` goes last so it cannot create new entities. Extraction and
/// rendering both run placeholder names through this, so a name written
/// as `a &amp; b` in the markup matches the schema entry `a & b`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Opens `bytes` as a DOCX package and returns the main document XML.
///
/// A package that is not a readable ZIP, or that lacks `word/document.xml`,
/// is rejected as a `TemplateFormat` error: the layout invariant (the stored
/// field schema always reflects the binary) forbids silently treating an
/// unreadable package as an empty one.
pub fn read_document_xml(bytes: &[u8]) -> Result<String, ApiError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ApiError::TemplateFormat(format!("not a ZIP package: {}", e)))?;
    let mut entry = archive
        .by_name(DOCUMENT_ENTRY)
        .map_err(|_| ApiError::TemplateFormat(format!("package has no {}", DOCUMENT_ENTRY)))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| ApiError::TemplateFormat(format!("{} is not UTF-8 text: {}", DOCUMENT_ENTRY, e)))?;
    Ok(xml)
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::DOCUMENT_ENTRY;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Builds a minimal DOCX package around the given `word/document.xml`
    /// body content (the part between `<w:body>` and `</w:body>`).
    pub fn make_docx(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        );
        make_docx_raw(&xml)
    }

    /// Builds a package with a verbatim `word/document.xml`.
    pub fn make_docx_raw(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = ZipWriter::new(&mut buffer);
            let options = SimpleFileOptions::default();
            writer
                .start_file("[Content_Types].xml", options)
                .expect("start entry");
            writer
                .write_all(b"<?xml version=\"1.0\"?><Types/>")
                .expect("write entry");
            writer
                .start_file(DOCUMENT_ENTRY, options)
                .expect("start entry");
            writer
                .write_all(document_xml.as_bytes())
                .expect("write entry");
            writer.finish().expect("finish zip");
        }
        buffer.into_inner()
    }

    /// A single paragraph with one run holding `text`.
    pub fn paragraph(text: &str) -> String {
        format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text)
    }

    /// A ZIP that is valid but has no `word/document.xml`.
    pub fn zip_without_document() -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = ZipWriter::new(&mut buffer);
            writer
                .start_file("other.txt", SimpleFileOptions::default())
                .expect("start entry");
            writer.write_all(b"hello").expect("write entry");
            writer.finish().expect("finish zip");
        }
        buffer.into_inner()
    }
}
