//! Record Normalizer — raw résumé text in, normalized [`ResumeRecord`] out.
//!
//! Primary path is a Gemini extraction call; any LLM failure (network, rate
//! limit, unparseable output) falls back to the regex/heuristic parser.
//! Parsing never fails the request: the worst case is a sparse record.

pub mod fallback;
pub mod improve;

use tracing::{info, warn};

use crate::llm_client::prompts::EXTRACTION_PROMPT_TEMPLATE;
use crate::llm_client::LlmClient;
use crate::models::resume::ResumeRecord;

/// Parses raw extracted text into a normalized record, best-effort.
pub async fn parse_resume_text(text: &str, llm: &LlmClient) -> ResumeRecord {
    match extract_with_llm(text, llm).await {
        Ok(record) => {
            info!("resume parsed via LLM extraction");
            record
        }
        Err(e) => {
            warn!("LLM extraction failed ({e}), using heuristic fallback parser");
            fallback::parse_heuristic(text)
        }
    }
}

async fn extract_with_llm(
    text: &str,
    llm: &LlmClient,
) -> Result<ResumeRecord, crate::llm_client::LlmError> {
    let prompt = EXTRACTION_PROMPT_TEMPLATE.replace("{cv_text}", text);
    llm.call_json(&prompt).await
}
