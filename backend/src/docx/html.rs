//! DOCX to HTML conversion for previews.
//!
//! Walks the main document XML with a streaming reader and maps the subset
//! of WordprocessingML that academic documents use: paragraphs, styled runs,
//! line breaks and tables. Structures outside that subset are dropped with a
//! warning so callers can surface them; the conversion itself never fails on
//! them. Deterministic: the same bytes always produce the same HTML.

use crate::docx::read_document_xml;
use crate::error::ApiError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Result of a conversion: the HTML fragment plus non-fatal structural
/// notices (omitted drawings, embedded objects, ...).
#[derive(Debug, Clone)]
pub struct HtmlOutput {
    pub html: String,
    pub warnings: Vec<String>,
}

/// Converts a DOCX binary to an HTML fragment.
pub fn convert_to_html(docx: &[u8]) -> Result<HtmlOutput, ApiError> {
    let xml = read_document_xml(docx)?;
    convert_document_xml(&xml)
}

struct RunState {
    bold: bool,
    italic: bool,
    underline: bool,
}

impl RunState {
    fn clear(&mut self) {
        self.bold = false;
        self.italic = false;
        self.underline = false;
    }

    fn open_tags(&self) -> String {
        let mut tags = String::new();
        if self.bold {
            tags.push_str("<strong>");
        }
        if self.italic {
            tags.push_str("<em>");
        }
        if self.underline {
            tags.push_str("<u>");
        }
        tags
    }

    fn close_tags(&self) -> String {
        let mut tags = String::new();
        if self.underline {
            tags.push_str("</u>");
        }
        if self.italic {
            tags.push_str("</em>");
        }
        if self.bold {
            tags.push_str("</strong>");
        }
        tags
    }
}

fn convert_document_xml(xml: &str) -> Result<HtmlOutput, ApiError> {
    let mut reader = Reader::from_str(xml);
    let mut html = String::new();
    let mut warnings: Vec<String> = Vec::new();

    let mut run = RunState {
        bold: false,
        italic: false,
        underline: false,
    };
    let mut in_rpr = false;
    let mut in_wt = false;
    // Depth inside a skipped element; everything nested (text boxes
    // included) is suppressed until its matching end tag.
    let mut skip_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ApiError::TemplateFormat(format!("bad document XML: {}", e)))?;
        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }
        match event {
            Event::Start(e) if is_skipped(e.name().as_ref()) => {
                warn_once(&mut warnings, e.name().as_ref());
                skip_depth = 1;
            }
            Event::Empty(e) if is_skipped(e.name().as_ref()) => {
                warn_once(&mut warnings, e.name().as_ref());
            }
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => html.push_str("<p>"),
                b"w:tbl" => html.push_str("<table>"),
                b"w:tr" => html.push_str("<tr>"),
                b"w:tc" => html.push_str("<td>"),
                b"w:r" => run.clear(),
                b"w:rPr" => in_rpr = true,
                b"w:t" => in_wt = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:b" if in_rpr => run.bold = true,
                b"w:i" if in_rpr => run.italic = true,
                b"w:u" if in_rpr => run.underline = true,
                b"w:br" => html.push_str("<br/>"),
                b"w:tab" => html.push_str("&emsp;"),
                _ => {}
            },
            Event::Text(t) if in_wt => {
                let text = t
                    .unescape()
                    .map_err(|e| ApiError::TemplateFormat(format!("bad document XML: {}", e)))?;
                html.push_str(&run.open_tags());
                html.push_str(&escape_html(&text));
                html.push_str(&run.close_tags());
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => html.push_str("</p>"),
                b"w:tbl" => html.push_str("</table>"),
                b"w:tr" => html.push_str("</tr>"),
                b"w:tc" => html.push_str("</td>"),
                b"w:rPr" => in_rpr = false,
                b"w:t" => in_wt = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(HtmlOutput { html, warnings })
}

/// Elements the preview cannot represent. The element and everything nested
/// inside it are dropped with a warning instead of failing the conversion.
fn is_skipped(name: &[u8]) -> bool {
    matches!(name, b"w:drawing" | b"w:pict" | b"w:object")
}

fn warn_once(warnings: &mut Vec<String>, name: &[u8]) {
    let label = match name {
        b"w:drawing" => "drawing omitted from preview",
        b"w:pict" => "legacy picture omitted from preview",
        b"w:object" => "embedded object omitted from preview",
        _ => return,
    };
    if !warnings.iter().any(|w| w.as_str() == label) {
        warnings.push(label.to_string());
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::testutil::{make_docx, paragraph};

    #[test]
    fn paragraphs_become_p_elements() {
        let docx = make_docx(&format!("{}{}", paragraph("um"), paragraph("dois")));
        let out = convert_to_html(&docx).unwrap();
        assert_eq!(out.html, "<p>um</p><p>dois</p>");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn bold_and_italic_runs_are_styled() {
        let body = "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>negrito</w:t></w:r>\
                    <w:r><w:rPr><w:i/></w:rPr><w:t>italico</w:t></w:r></w:p>";
        let out = convert_to_html(&make_docx(body)).unwrap();
        assert!(out.html.contains("<strong>negrito</strong>"));
        assert!(out.html.contains("<em>italico</em>"));
    }

    #[test]
    fn tables_map_to_table_rows_and_cells() {
        let body = "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>c1</w:t></w:r></w:p></w:tc>\
                    <w:tc><w:p><w:r><w:t>c2</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";
        let out = convert_to_html(&make_docx(body)).unwrap();
        assert_eq!(
            out.html,
            "<table><tr><td><p>c1</p></td><td><p>c2</p></td></tr></table>"
        );
    }

    #[test]
    fn conversion_is_deterministic() {
        let docx = make_docx(&paragraph("sempre igual"));
        let first = convert_to_html(&docx).unwrap();
        let second = convert_to_html(&docx).unwrap();
        assert_eq!(first.html, second.html);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn drawings_are_dropped_with_a_warning() {
        let body = "<w:p><w:r><w:drawing><a:blip/></w:drawing><w:t>texto</w:t></w:r></w:p>";
        let out = convert_to_html(&make_docx(body)).unwrap();
        assert!(out.html.contains("texto"));
        assert_eq!(out.warnings, vec!["drawing omitted from preview"]);
    }

    #[test]
    fn text_box_content_inside_a_drawing_is_dropped() {
        let body = "<w:p><w:r><w:drawing><wps:txbx><w:txbxContent>\
                    <w:p><w:r><w:t>dentro</w:t></w:r></w:p>\
                    </w:txbxContent></wps:txbx></w:drawing>\
                    <w:t>fora</w:t></w:r></w:p>";
        let out = convert_to_html(&make_docx(body)).unwrap();
        assert!(!out.html.contains("dentro"));
        assert_eq!(out.html, "<p>fora</p>");
        assert_eq!(out.warnings, vec!["drawing omitted from preview"]);
    }

    #[test]
    fn text_is_html_escaped() {
        let docx = make_docx(&paragraph("a &amp; b"));
        let out = convert_to_html(&docx).unwrap();
        assert!(out.html.contains("a &amp; b"));
    }

    #[test]
    fn line_breaks_are_preserved() {
        let body = "<w:p><w:r><w:t>linha1</w:t><w:br/><w:t>linha2</w:t></w:r></w:p>";
        let out = convert_to_html(&make_docx(body)).unwrap();
        assert_eq!(out.html, "<p>linha1<br/>linha2</p>");
    }
}
