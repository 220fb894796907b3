//! "Improve this résumé" flow — re-invokes the LLM with reviewer feedback.
//!
//! Unlike first-pass extraction there is no heuristic fallback here: if the
//! model cannot produce an improved record, the caller keeps the original
//! and surfaces the error.

use tracing::info;

use crate::llm_client::prompts::IMPROVE_PROMPT_TEMPLATE;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::ResumeRecord;

/// Applies free-text reviewer feedback to a record via the LLM.
pub async fn improve_resume(
    record: &ResumeRecord,
    feedback: &str,
    llm: &LlmClient,
) -> Result<ResumeRecord, LlmError> {
    let resume_json = serde_json::to_string_pretty(record)?;
    let prompt = IMPROVE_PROMPT_TEMPLATE
        .replace("{resume_json}", &resume_json)
        .replace("{feedback}", feedback);

    let improved: ResumeRecord = llm.call_json(&prompt).await?;
    info!("resume improved via LLM feedback pass");
    Ok(improved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improve_prompt_carries_record_and_feedback() {
        let record = ResumeRecord {
            name: "Ada Lovelace".to_string(),
            ..Default::default()
        };
        let resume_json = serde_json::to_string_pretty(&record).unwrap();
        let prompt = IMPROVE_PROMPT_TEMPLATE
            .replace("{resume_json}", &resume_json)
            .replace("{feedback}", "Quantify the achievements");

        assert!(prompt.contains("Ada Lovelace"));
        assert!(prompt.contains("Quantify the achievements"));
        assert!(!prompt.contains("{resume_json}"));
        assert!(!prompt.contains("{feedback}"));
    }
}
