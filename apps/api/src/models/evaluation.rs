use serde::Serialize;

/// Match percentage pulled out of a percentage-match response.
///
/// `Missing` means the response had no `Percentage Match: N%` marker. It ranks
/// as 0 but stays distinguishable from a model that really answered 0%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum PercentageMatch {
    Parsed(u32),
    Missing,
}

impl PercentageMatch {
    pub fn score(&self) -> u32 {
        match self {
            PercentageMatch::Parsed(value) => *value,
            PercentageMatch::Missing => 0,
        }
    }
}

/// One résumé's evaluation under one prompt.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub label: String,
    pub file_name: String,
    pub response_text: String,
    /// Only set for the percentage-match prompt.
    pub match_percentage: Option<PercentageMatch>,
    pub export_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// 1-based.
    pub rank: usize,
    pub label: String,
    pub percentage: u32,
    pub parsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Validation,
    Extraction,
    ModelCall,
}

/// A document that produced no result. The rest of the batch is unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct BatchIssue {
    pub file_name: String,
    pub kind: IssueKind,
    pub message: String,
}

/// Download name for an exported evaluation.
pub fn export_file_name(label: &str) -> String {
    format!("{label}_analysis.txt")
}
