//! Shared render/convert steps behind the preview and generate endpoints,
//! for both direct layout fills and draft completions.

use crate::config::Settings;
use crate::docx::html::convert_to_html;
use crate::docx::pdf::convert_to_pdf;
use crate::docx::render::render_layout;
use crate::error::ApiError;
use crate::store;
use actix_web::HttpResponse;
use common::model::field::validate_fields;
use common::model::layout::Layout;
use common::requests::{OutputFormat, PreviewResponse};
use std::collections::HashMap;

/// Renders `values` into the layout binary and converts the result to HTML.
/// Lenient: fields without a value become empty text, so a half-filled form
/// can still be previewed.
pub async fn preview(
    bytes: Vec<u8>,
    values: HashMap<String, String>,
) -> Result<PreviewResponse, ApiError> {
    let output = tokio::task::spawn_blocking(move || {
        let filled = render_layout(&bytes, &values)?;
        convert_to_html(&filled)
    })
    .await
    .map_err(ApiError::internal)??;

    Ok(PreviewResponse {
        html: output.html,
        warnings: output.warnings,
    })
}

/// Produces the final DOCX or PDF for a layout. Strict: every required
/// field of the layout's schema must be supplied.
pub async fn generate(
    settings: &Settings,
    layout: &Layout,
    values: HashMap<String, String>,
    format: OutputFormat,
    filename_stem: &str,
) -> Result<HttpResponse, ApiError> {
    let validation = validate_fields(&layout.fields, &values);
    if !validation.valid {
        return Err(ApiError::Validation(format!(
            "missing required fields: {}",
            validation.missing_fields.join(", ")
        )));
    }

    let bytes = store::read_layout_file(layout)?;
    let rendered = tokio::task::spawn_blocking(move || render_layout(&bytes, &values))
        .await
        .map_err(ApiError::internal)??;

    let body = match format {
        OutputFormat::Docx => rendered,
        OutputFormat::Pdf => {
            convert_to_pdf(rendered, filename_stem.to_string(), settings.pdf_timeout).await?
        }
    };

    Ok(attachment(body, format, filename_stem))
}

fn attachment(body: Vec<u8>, format: OutputFormat, filename_stem: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(format.mime_type())
        .insert_header((
            "Content-Disposition",
            format!(
                "attachment; filename=\"{}.{}\"",
                sanitize_filename(filename_stem),
                format.extension()
            ),
        ))
        .body(body)
}

/// Keeps the download name header-safe: alphanumerics and a few separators,
/// everything else becomes an underscore.
fn sanitize_filename(stem: &str) -> String {
    let cleaned: String = stem
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "documento".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_header_safe() {
        assert_eq!(sanitize_filename("Boletim da Ana"), "Boletim_da_Ana");
        assert_eq!(sanitize_filename("nota\"final\""), "nota_final_");
        assert_eq!(sanitize_filename("   "), "documento");
    }
}
