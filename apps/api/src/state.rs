use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::{compiler::LatexCompiler, remote::RemoteCompiler};

/// Remote compilation gets a fixed cushion over the local compile timeout
/// to cover upload and queueing time on the far end.
const REMOTE_TIMEOUT_EXTRA_SECS: u64 = 30;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Local engine wrapper; detection is memoized inside, so sharing one
    /// instance means the probe runs once per process.
    pub compiler: Arc<LatexCompiler>,
    pub remote: RemoteCompiler,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let llm = LlmClient::new(config.gemini_api_key.clone());
        let compiler = Arc::new(LatexCompiler::new(
            config.pdflatex_path.clone(),
            config.compile_timeout,
        ));
        let remote = RemoteCompiler::new(
            config.latex_remote_url.clone(),
            config.compile_timeout + Duration::from_secs(REMOTE_TIMEOUT_EXTRA_SECS),
        );

        Self {
            llm,
            compiler,
            remote,
            config,
        }
    }
}
