//! Runtime settings, read once at startup from the environment with
//! defaults suitable for a local deployment.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// SQLite database file holding layouts and documents.
    pub db_path: String,
    /// Directory where uploaded layout binaries are stored.
    pub storage_dir: String,
    /// Upload and JSON body ceiling, in bytes.
    pub max_upload_bytes: usize,
    /// Hard ceiling for the headless-browser PDF stage.
    pub pdf_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "secretaria.sqlite".to_string()),
            storage_dir: env::var("LAYOUT_STORAGE_DIR").unwrap_or_else(|_| "layouts".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            pdf_timeout: Duration::from_secs(
                env::var("PDF_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
