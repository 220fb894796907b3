//! Render pipeline — record → LaTeX source → PDF artifact.
//!
//! Flow: assemble → persist `.tex` → local two-pass compile →
//!       (on unavailability or failure) remote compile → outcome.
//!
//! Compilation failure is never an error here: the `.tex` source is always
//! produced and persisted, and the outcome records which path (if any)
//! yielded a PDF. Only genuine I/O failures while persisting the source
//! propagate as hard errors.

pub mod compiler;
pub mod remote;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::latex::assemble;
use crate::models::resume::ResumeRecord;
use compiler::LatexCompiler;
use remote::RemoteCompiler;

/// How a render request ended up. The source is available in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStatus {
    /// Compiled by the local engine.
    LocalPdf,
    /// Local path unavailable or failed; the remote service produced the PDF.
    RemotePdf,
    /// No PDF: no compiler is installed and the remote service also failed.
    CompilerUnavailable,
    /// No PDF: local compilation was attempted and failed, and the remote
    /// service also failed.
    CompilationFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderOutcome {
    pub latex_source: String,
    pub tex_filename: String,
    pub pdf_filename: Option<String>,
    pub status: RenderStatus,
}

impl RenderOutcome {
    pub fn pdf_compiled(&self) -> bool {
        self.pdf_filename.is_some()
    }

    /// Caller-facing explanation for the no-PDF cases, distinguishing
    /// "compiler not installed" from "compilation attempted and failed".
    pub fn warning(&self) -> Option<&'static str> {
        match self.status {
            RenderStatus::LocalPdf | RenderStatus::RemotePdf => None,
            RenderStatus::CompilerUnavailable => Some(
                "No LaTeX compiler is installed on the server. Download the .tex source and compile it with Overleaf or a local TeX installation.",
            ),
            RenderStatus::CompilationFailed => Some(
                "PDF compilation was attempted but failed. Download the .tex source and compile it manually to see the full compiler log.",
            ),
        }
    }
}

/// Renders a résumé record into `output_dir`.
///
/// Writes `{base_name}_resume.tex` unconditionally, then tries for
/// `{base_name}_resume.pdf` via the local compiler and the remote fallback.
pub async fn render_resume(
    record: &ResumeRecord,
    base_name: &str,
    output_dir: &Path,
    compiler: &LatexCompiler,
    remote: &RemoteCompiler,
) -> Result<RenderOutcome> {
    let latex_source = assemble(record);

    let tex_filename = format!("{base_name}_resume.tex");
    let pdf_filename = format!("{base_name}_resume.pdf");

    tokio::fs::write(output_dir.join(&tex_filename), &latex_source)
        .await
        .with_context(|| format!("failed writing {tex_filename}"))?;
    info!(tex = %tex_filename, "LaTeX source written");

    let pdf_path = output_dir.join(&pdf_filename);

    // Local path first; any failure falls through to the remote service.
    let local_attempted = compiler.is_available();
    if local_attempted {
        match compiler.compile(&latex_source, &pdf_path).await {
            Ok(()) => {
                return Ok(RenderOutcome {
                    latex_source,
                    tex_filename,
                    pdf_filename: Some(pdf_filename),
                    status: RenderStatus::LocalPdf,
                });
            }
            Err(e) => warn!("local compilation failed, trying remote fallback: {e}"),
        }
    }

    if remote.compile(&latex_source, &pdf_path).await {
        return Ok(RenderOutcome {
            latex_source,
            tex_filename,
            pdf_filename: Some(pdf_filename),
            status: RenderStatus::RemotePdf,
        });
    }

    let status = if local_attempted {
        RenderStatus::CompilationFailed
    } else {
        RenderStatus::CompilerUnavailable
    };
    warn!(?status, "no PDF produced; source remains available");

    Ok(RenderOutcome {
        latex_source,
        tex_filename,
        pdf_filename: None,
        status,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::time::Duration;

    fn fake_engine(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("pdflatex");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{body}").unwrap();
        let mut perms = file.metadata().unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn unreachable_remote() -> RemoteCompiler {
        RemoteCompiler::new("http://127.0.0.1:9/compile".to_string(), Duration::from_secs(2))
    }

    fn sample_record() -> ResumeRecord {
        ResumeRecord {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_local_success_yields_local_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(dir.path(), "printf '%%PDF-1.4 fake' > resume.pdf");
        let compiler = LatexCompiler::new(Some(engine), Duration::from_secs(5));

        let outcome = render_resume(
            &sample_record(),
            "ada",
            dir.path(),
            &compiler,
            &unreachable_remote(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.status, RenderStatus::LocalPdf);
        assert!(outcome.pdf_compiled());
        assert!(outcome.warning().is_none());
        assert!(dir.path().join("ada_resume.tex").exists());
        assert!(dir.path().join("ada_resume.pdf").exists());
    }

    #[tokio::test]
    async fn test_local_failure_and_remote_failure_reports_compilation_failed() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(dir.path(), "exit 1");
        let compiler = LatexCompiler::new(Some(engine), Duration::from_secs(5));

        let outcome = render_resume(
            &sample_record(),
            "ada",
            dir.path(),
            &compiler,
            &unreachable_remote(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.status, RenderStatus::CompilationFailed);
        assert!(!outcome.pdf_compiled());
        assert!(outcome.warning().unwrap().contains("attempted"));
        // The source is still persisted and returned.
        assert!(dir.path().join("ada_resume.tex").exists());
        assert!(outcome.latex_source.contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_unavailable_compiler_skips_local_and_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        // Detection is pre-seeded to "unavailable" so the test does not
        // depend on whatever is installed on the host.
        let compiler = LatexCompiler::unavailable(Duration::from_secs(5));

        let outcome = render_resume(
            &sample_record(),
            "ada",
            dir.path(),
            &compiler,
            &unreachable_remote(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.status, RenderStatus::CompilerUnavailable);
        assert!(outcome.warning().unwrap().contains("No LaTeX compiler"));
        assert!(dir.path().join("ada_resume.tex").exists());
        assert!(!dir.path().join("ada_resume.pdf").exists());
    }
}
