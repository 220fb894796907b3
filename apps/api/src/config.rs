use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    /// Directory where generated .tex and .pdf artifacts are written.
    pub output_dir: PathBuf,
    /// Explicit LaTeX engine binary; overrides auto-detection when set.
    pub pdflatex_path: Option<PathBuf>,
    /// Remote compilation endpoint used when no local engine is found.
    pub latex_remote_url: String,
    pub compile_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            output_dir: PathBuf::from(
                std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()),
            ),
            pdflatex_path: std::env::var("PDFLATEX_PATH").ok().map(PathBuf::from),
            latex_remote_url: std::env::var("LATEX_REMOTE_URL")
                .unwrap_or_else(|_| "https://latexonline.cc/data".to_string()),
            compile_timeout: Duration::from_secs(
                std::env::var("COMPILE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse::<u64>()
                    .context("COMPILE_TIMEOUT_SECS must be a number of seconds")?,
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
