//! Local LaTeX compiler detection and two-pass invocation.
//!
//! Detection runs at most once per process and is memoized in a `OnceCell`.
//! The probe order is: explicit `PDFLATEX_PATH` override → `pdflatex` on
//! PATH or in well-known install locations → a self-contained toolchain
//! (`tectonic`, TinyTeX). Detection is idempotent, so a racing first call is
//! harmless — both racers converge on the same answer.
//!
//! Each compilation job owns a scoped temp directory which is removed on
//! every exit path (success, compiler error, timeout) by `TempDir`'s drop.
//! The engine is always invoked non-interactively with an explicit output
//! directory — the process-wide cwd is never touched.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{debug, info, warn};

const TEX_FILENAME: &str = "resume.tex";
const PDF_FILENAME: &str = "resume.pdf";

/// How much compiler output to keep in error values for operator diagnosis.
const LOG_EXCERPT_LEN: usize = 2000;

/// Well-known pdflatex install locations probed after the PATH search.
const WELL_KNOWN_PDFLATEX: &[&str] = &[
    "/usr/bin/pdflatex",
    "/usr/local/bin/pdflatex",
    "/usr/local/texlive/bin/x86_64-linux/pdflatex",
    "/opt/texlive/bin/x86_64-linux/pdflatex",
    "/Library/TeX/texbin/pdflatex",
];

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("no LaTeX compiler is available on this host")]
    Unavailable,

    #[error("first pdflatex pass failed (exit code {code:?}): {log}")]
    Pass1Failed { code: Option<i32>, log: String },

    #[error("compiler pass exceeded the {0:?} timeout")]
    Timeout(Duration),

    #[error("compiler exited but produced no PDF artifact")]
    ArtifactMissing,

    #[error("compilation I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which engine family the resolved binary belongs to. They take different
/// command lines but share the two-pass contract and artifact layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Pdflatex,
    Tectonic,
}

/// A compiler binary that detection validated as present and executable.
#[derive(Debug, Clone)]
pub struct ResolvedEngine {
    pub kind: EngineKind,
    pub path: PathBuf,
}

/// Owns the memoized availability state and runs compilation jobs.
///
/// Jobs never share state beyond the read-only resolved engine; concurrent
/// jobs each get their own temp directory.
pub struct LatexCompiler {
    override_path: Option<PathBuf>,
    timeout: Duration,
    resolved: OnceCell<Option<ResolvedEngine>>,
}

impl LatexCompiler {
    pub fn new(override_path: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            override_path,
            timeout,
            resolved: OnceCell::new(),
        }
    }

    /// Resolves the compiler binary, memoizing the answer for the process
    /// lifetime. Returns `None` when no engine can be found.
    pub fn detect(&self) -> Option<&ResolvedEngine> {
        self.resolved
            .get_or_init(|| {
                let engine = self.probe();
                match &engine {
                    Some(e) => info!(path = %e.path.display(), kind = ?e.kind, "LaTeX compiler detected"),
                    None => warn!("no LaTeX compiler found; all jobs will use the remote fallback"),
                }
                engine
            })
            .as_ref()
    }

    pub fn is_available(&self) -> bool {
        self.detect().is_some()
    }

    /// A compiler whose detection has already concluded "unavailable",
    /// independent of what the host has installed.
    #[cfg(test)]
    pub(crate) fn unavailable(timeout: Duration) -> Self {
        let compiler = Self::new(None, timeout);
        compiler.resolved.set(None).expect("fresh cell");
        compiler
    }

    fn probe(&self) -> Option<ResolvedEngine> {
        // 1. Explicit override, validated to exist and be executable.
        if let Some(path) = &self.override_path {
            if is_executable(path) {
                return Some(ResolvedEngine {
                    kind: kind_from_path(path),
                    path: path.clone(),
                });
            }
            warn!(path = %path.display(), "PDFLATEX_PATH is set but not an executable file");
        }

        // 2. pdflatex on PATH, then well-known install locations.
        if let Ok(path) = which::which("pdflatex") {
            return Some(ResolvedEngine {
                kind: EngineKind::Pdflatex,
                path,
            });
        }
        for candidate in WELL_KNOWN_PDFLATEX {
            let path = PathBuf::from(candidate);
            if is_executable(&path) {
                return Some(ResolvedEngine {
                    kind: EngineKind::Pdflatex,
                    path,
                });
            }
        }

        // 3. Self-contained toolchain: tectonic on PATH or in the usual user
        //    install spots, or a TinyTeX-provided pdflatex.
        if let Ok(path) = which::which("tectonic") {
            return Some(ResolvedEngine {
                kind: EngineKind::Tectonic,
                path,
            });
        }
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            let tectonic = home.join(".cargo/bin/tectonic");
            if is_executable(&tectonic) {
                return Some(ResolvedEngine {
                    kind: EngineKind::Tectonic,
                    path: tectonic,
                });
            }
            let tinytex = home.join(".TinyTeX/bin/x86_64-linux/pdflatex");
            if is_executable(&tinytex) {
                return Some(ResolvedEngine {
                    kind: EngineKind::Pdflatex,
                    path: tinytex,
                });
            }
        }

        None
    }

    /// Compiles `source` and copies the resulting PDF to `dest`.
    ///
    /// Two passes, always: the first establishes layout and references, the
    /// second resolves them. A non-zero exit on the first pass is an
    /// immediate failure; the second pass's exit code is ignored because
    /// reference-resolution warnings commonly produce benign non-zero codes —
    /// artifact presence is the sole success criterion.
    pub async fn compile(&self, source: &str, dest: &Path) -> Result<(), CompileError> {
        let engine = self.detect().ok_or(CompileError::Unavailable)?.clone();

        // Scoped working directory; dropped (and removed) on every return path.
        let workdir = tempfile::tempdir()?;
        tokio::fs::write(workdir.path().join(TEX_FILENAME), source).await?;

        let pass1 = self.run_pass(&engine, workdir.path()).await?;
        if !pass1.status.success() {
            return Err(CompileError::Pass1Failed {
                code: pass1.status.code(),
                log: log_excerpt(&pass1),
            });
        }
        debug!("first compiler pass succeeded");

        let pass2 = self.run_pass(&engine, workdir.path()).await?;
        if !pass2.status.success() {
            debug!(code = ?pass2.status.code(), "second pass exited non-zero; checking artifact");
        }

        let artifact = workdir.path().join(PDF_FILENAME);
        let size = tokio::fs::metadata(&artifact)
            .await
            .map_err(|_| CompileError::ArtifactMissing)?
            .len();
        if size == 0 {
            return Err(CompileError::ArtifactMissing);
        }

        tokio::fs::copy(&artifact, dest).await?;
        info!(dest = %dest.display(), size, "PDF compiled locally");
        Ok(())
    }

    async fn run_pass(
        &self,
        engine: &ResolvedEngine,
        workdir: &Path,
    ) -> Result<std::process::Output, CompileError> {
        let mut cmd = tokio::process::Command::new(&engine.path);
        match engine.kind {
            EngineKind::Pdflatex => {
                cmd.arg("-interaction=nonstopmode")
                    .arg("-output-directory")
                    .arg(workdir)
                    .arg(TEX_FILENAME);
            }
            EngineKind::Tectonic => {
                cmd.arg("--outdir").arg(workdir).arg(TEX_FILENAME);
            }
        }
        cmd.current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(CompileError::Io(e)),
            // The dropped child is killed via kill_on_drop; the scoped
            // workdir is still cleaned up by the caller's TempDir.
            Err(_) => Err(CompileError::Timeout(self.timeout)),
        }
    }
}

fn kind_from_path(path: &Path) -> EngineKind {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if name.contains("tectonic") {
        EngineKind::Tectonic
    } else {
        EngineKind::Pdflatex
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn log_excerpt(output: &std::process::Output) -> String {
    let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        log.push_str("\n--- stderr ---\n");
        log.push_str(&stderr);
    }
    if log.len() > LOG_EXCERPT_LEN {
        // Keep the tail: pdflatex prints the actual error last.
        let cut = log.len() - LOG_EXCERPT_LEN;
        let boundary = log
            .char_indices()
            .map(|(i, _)| i)
            .find(|&i| i >= cut)
            .unwrap_or(0);
        log = log[boundary..].to_string();
    }
    log
}
