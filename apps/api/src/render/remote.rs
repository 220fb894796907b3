//! Remote compilation fallback over HTTP.
//!
//! Used when no local compiler exists or local compilation failed. One
//! multipart POST of the `.tex` source to a latexonline.cc-style endpoint,
//! one attempt, bounded timeout. Success is a 200 response with a PDF
//! content-type; the body is persisted verbatim. Every failure mode —
//! non-200, wrong content-type, network error, timeout — collapses to
//! `false`, because the caller can always fall back to offering the source.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{info, warn};

const TEX_FILENAME: &str = "resume.tex";

#[derive(Clone)]
pub struct RemoteCompiler {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteCompiler {
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
            endpoint,
        }
    }

    /// Submits the document source and writes the returned PDF to `dest`.
    /// Returns whether a valid artifact was produced. Never errors.
    pub async fn compile(&self, source: &str, dest: &Path) -> bool {
        let form = Form::new().part(
            "file",
            Part::text(source.to_owned())
                .file_name(TEX_FILENAME)
                .mime_str("text/x-tex")
                .expect("static mime type"),
        );

        let response = match self.client.post(&self.endpoint).multipart(form).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(endpoint = %self.endpoint, "remote compile request failed: {e}");
                return false;
            }
        };

        let status = response.status();
        // Exactly 200: a 204/206 never carries a complete artifact.
        if status != reqwest::StatusCode::OK {
            warn!(%status, "remote compile service rejected the document");
            return false;
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("application/pdf") {
            warn!(content_type, "remote compile returned a non-PDF response");
            return false;
        }

        let bytes = match response.bytes().await {
            Ok(b) if !b.is_empty() => b,
            Ok(_) => {
                warn!("remote compile returned an empty body");
                return false;
            }
            Err(e) => {
                warn!("failed reading remote compile response: {e}");
                return false;
            }
        };

        if let Err(e) = tokio::fs::write(dest, &bytes).await {
            warn!(dest = %dest.display(), "failed writing remote artifact: {e}");
            return false;
        }

        info!(dest = %dest.display(), size = bytes.len(), "PDF compiled remotely");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use axum::{routing::post, Router};

    /// Serves one fixed response on an ephemeral port.
    async fn serve_response(
        response: impl IntoResponse + Clone + Send + Sync + 'static,
    ) -> String {
        let app = Router::new().route("/compile", post(move || async move { response }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/compile")
    }

    #[tokio::test]
    async fn test_ok_pdf_response_is_persisted() {
        let endpoint = serve_response((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/pdf")],
            "%PDF-1.4 fake",
        ))
        .await;
        let remote = RemoteCompiler::new(endpoint, Duration::from_secs(2));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");

        assert!(remote.compile("\\documentclass{article}", &dest).await);
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn test_non_200_success_status_is_rejected() {
        // 206 with a PDF content-type and body is still not a complete
        // artifact.
        let endpoint = serve_response((
            StatusCode::PARTIAL_CONTENT,
            [(header::CONTENT_TYPE, "application/pdf")],
            "%PDF-1.4 partial",
        ))
        .await;
        let remote = RemoteCompiler::new(endpoint, Duration::from_secs(2));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");

        assert!(!remote.compile("\\documentclass{article}", &dest).await);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_non_pdf_content_type_is_rejected() {
        let endpoint = serve_response((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            "<html>compile log</html>",
        ))
        .await;
        let remote = RemoteCompiler::new(endpoint, Duration::from_secs(2));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");

        assert!(!remote.compile("\\documentclass{article}", &dest).await);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_returns_false() {
        // TCP port 9 (discard) is closed on any sane host; the connection is
        // refused immediately rather than timing out.
        let remote = RemoteCompiler::new(
            "http://127.0.0.1:9/compile".to_string(),
            Duration::from_secs(2),
        );
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");

        assert!(!remote.compile("\\documentclass{article}", &dest).await);
        assert!(!dest.exists());
    }
}
