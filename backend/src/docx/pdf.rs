//! DOCX to PDF via the HTML + headless-browser pipeline.
//!
//! Flattening a DOCX to HTML loses table borders and page-break behavior,
//! so the HTML is wrapped in a print stylesheet and, after load, a
//! normalization script re-asserts border and page-break CSS on every table
//! element before printing. The browser is launched per conversion and torn
//! down on every exit path; the temporary DOCX file is removed whether the
//! pipeline succeeds or fails.

use crate::docx::html::convert_to_html;
use crate::error::ApiError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

// A4 in inches, fixed margins; keeps pagination deterministic for the
// same input.
const PAPER_WIDTH_IN: f64 = 8.27;
const PAPER_HEIGHT_IN: f64 = 11.69;
const MARGIN_IN: f64 = 0.4;

/// Print stylesheet forcing visible table borders and forbidding page
/// breaks inside tables, rows and cells.
const PRINT_STYLE: &str = "\
    @page { size: A4; margin: 15mm; }\
    body { font-family: 'Times New Roman', serif; font-size: 12pt; }\
    p { margin: 0 0 8px 0; }\
    table { width: 100%; border-collapse: collapse; page-break-inside: avoid; }\
    tr { page-break-inside: avoid; }\
    td, th { border: 1px solid #000; padding: 4px; page-break-inside: avoid; vertical-align: top; }";

/// Post-load pass re-asserting the border/page-break CSS directly on every
/// table element, in case styles carried over from the source document
/// conflict with the stylesheet.
const TABLE_NORMALIZE_JS: &str = "\
    document.querySelectorAll('table').forEach(function (t) {\
        t.style.borderCollapse = 'collapse';\
        t.style.width = '100%';\
        t.style.pageBreakInside = 'avoid';\
    });\
    document.querySelectorAll('td, th').forEach(function (c) {\
        c.style.border = '1px solid #000';\
        c.style.pageBreakInside = 'avoid';\
    });\
    document.querySelectorAll('tr').forEach(function (r) {\
        r.style.pageBreakInside = 'avoid';\
    });";

/// Converts a filled DOCX to a paginated PDF. Runs on the blocking pool:
/// the browser protocol client is synchronous.
pub async fn convert_to_pdf(
    docx: Vec<u8>,
    title: String,
    timeout: Duration,
) -> Result<Vec<u8>, ApiError> {
    tokio::task::spawn_blocking(move || convert_blocking(&docx, &title, timeout))
        .await
        .map_err(ApiError::internal)?
}

fn convert_blocking(docx: &[u8], title: &str, timeout: Duration) -> Result<Vec<u8>, ApiError> {
    let mut temp = NamedTempFile::new().map_err(ApiError::internal)?;
    temp.write_all(docx).map_err(ApiError::internal)?;

    let result = pipeline(temp.path(), title, timeout);

    // Cleanup failures are logged, never allowed to mask the pipeline error.
    if let Err(e) = temp.close() {
        warn!("failed to remove temporary DOCX: {}", e);
    }
    result
}

fn pipeline(docx_path: &Path, title: &str, timeout: Duration) -> Result<Vec<u8>, ApiError> {
    let bytes = fs::read(docx_path).map_err(ApiError::internal)?;
    let converted = convert_to_html(&bytes)?;
    for warning in &converted.warnings {
        debug!("pdf conversion: {}", warning);
    }
    let page = wrap_printable(&converted.html, title);
    print_with_browser(&page, timeout)
}

/// Wraps the HTML fragment in a complete document with the print stylesheet.
fn wrap_printable(html: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"/>\
         <title>{}</title><style>{}</style></head><body>{}</body></html>",
        escape_title(title),
        PRINT_STYLE,
        html
    )
}

fn escape_title(title: &str) -> String {
    title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn print_with_browser(html: &str, timeout: Duration) -> Result<Vec<u8>, ApiError> {
    let options = LaunchOptions::default_builder()
        .idle_browser_timeout(timeout)
        .build()
        .map_err(|e| ApiError::Conversion(e.to_string()))?;
    let browser = Browser::new(options)
        .map_err(|e| ApiError::Conversion(format!("failed to launch headless browser: {}", e)))?;

    // The child process is killed when `browser` drops, so the teardown
    // also covers the error paths out of `print_on_tab`.
    print_on_tab(&browser, html, timeout)
}

fn print_on_tab(browser: &Browser, html: &str, timeout: Duration) -> Result<Vec<u8>, ApiError> {
    let tab = browser
        .new_tab()
        .map_err(|e| ApiError::Conversion(e.to_string()))?;
    tab.set_default_timeout(timeout);

    let url = format!("data:text/html;base64,{}", BASE64.encode(html));
    tab.navigate_to(&url)
        .map_err(|e| ApiError::Conversion(e.to_string()))?;
    tab.wait_until_navigated()
        .map_err(|e| ApiError::Conversion(format!("page load timed out: {}", e)))?;
    tab.evaluate(TABLE_NORMALIZE_JS, false)
        .map_err(|e| ApiError::Conversion(e.to_string()))?;

    let pdf = tab
        .print_to_pdf(Some(pdf_options()))
        .map_err(|e| ApiError::Conversion(format!("print to PDF failed: {}", e)))?;

    if let Err(e) = tab.close(true) {
        warn!("failed to close browser tab: {}", e);
    }
    ensure_not_empty(pdf)
}

/// An empty buffer from the browser is a hard failure, never returned as a
/// 0-byte document.
fn ensure_not_empty(pdf: Vec<u8>) -> Result<Vec<u8>, ApiError> {
    if pdf.is_empty() {
        return Err(ApiError::Conversion(
            "headless browser returned an empty PDF".to_string(),
        ));
    }
    Ok(pdf)
}

fn pdf_options() -> PrintToPdfOptions {
    PrintToPdfOptions {
        print_background: Some(true),
        paper_width: Some(PAPER_WIDTH_IN),
        paper_height: Some(PAPER_HEIGHT_IN),
        margin_top: Some(MARGIN_IN),
        margin_bottom: Some(MARGIN_IN),
        margin_left: Some(MARGIN_IN),
        margin_right: Some(MARGIN_IN),
        prefer_css_page_size: Some(true),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_page_carries_the_print_rules() {
        let page = wrap_printable("<table><tr><td>x</td></tr></table>", "Boletim");
        assert!(page.contains("page-break-inside: avoid"));
        assert!(page.contains("border-collapse"));
        assert!(page.contains("<title>Boletim</title>"));
        assert!(page.contains("<table><tr><td>x</td></tr></table>"));
    }

    #[test]
    fn title_is_escaped() {
        let page = wrap_printable("", "a < b & c");
        assert!(page.contains("<title>a &lt; b &amp; c</title>"));
    }

    #[test]
    fn empty_pdf_buffer_is_a_conversion_error() {
        let err = ensure_not_empty(Vec::new()).unwrap_err();
        assert!(matches!(err, ApiError::Conversion(_)));
    }

    #[test]
    fn non_empty_pdf_buffer_passes_through() {
        let pdf = ensure_not_empty(vec![0x25, 0x50, 0x44, 0x46]).unwrap();
        assert_eq!(pdf, vec![0x25, 0x50, 0x44, 0x46]);
    }

    #[test]
    fn normalization_script_touches_every_table_element() {
        assert!(TABLE_NORMALIZE_JS.contains("querySelectorAll('table')"));
        assert!(TABLE_NORMALIZE_JS.contains("pageBreakInside"));
        assert!(TABLE_NORMALIZE_JS.contains("border"));
    }
}
