use crate::llm_client::{GenerativeModel, LlmError};
use crate::models::document::DocumentPayload;
use crate::screening::prompts::NAME_EXTRACTION_PROMPT;

pub const UNNAMED_LABEL: &str = "Unnamed Resume";

/// Asks the model for the candidate's name. The answer is only a display
/// label and is not validated.
pub async fn extract_candidate_name(
    model: &dyn GenerativeModel,
    document: &DocumentPayload,
) -> Result<String, LlmError> {
    let raw = model.generate(NAME_EXTRACTION_PROMPT, document, "").await?;
    Ok(label_from_response(&raw))
}

pub fn label_from_response(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNNAMED_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}
