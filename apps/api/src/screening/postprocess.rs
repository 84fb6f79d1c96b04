use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::evaluation::PercentageMatch;
use crate::screening::prompts::EvaluationPrompt;

static PERCENTAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Percentage Match\s*:\s*\**\s*(\d+)\s*%").expect("valid percentage regex")
});

// Existing Markdown links are matched first so they are left untouched.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]*\]\([^)\s]*\)|https?://[^\s]+").expect("valid link regex")
});

/// Finds the first `Percentage Match: N%` marker. Values above 100 are clamped.
pub fn parse_percentage(text: &str) -> PercentageMatch {
    PERCENTAGE_RE
        .captures(text)
        .and_then(|c| c[1].parse::<u32>().ok())
        .map(|n| PercentageMatch::Parsed(n.min(100)))
        .unwrap_or(PercentageMatch::Missing)
}

/// The numeric score used for ranking; 0 when no marker is present.
#[cfg(test)]
pub fn extract_percentage(text: &str) -> u32 {
    parse_percentage(text).score()
}

/// Wraps every bare `http(s)://` URL as `[url](url)`; all other text is unchanged.
pub fn make_links_clickable(text: &str) -> String {
    LINK_RE
        .replace_all(text, |caps: &Captures| {
            let found = &caps[0];
            if found.starts_with('[') {
                found.to_string()
            } else {
                format!("[{found}]({found})")
            }
        })
        .into_owned()
}

/// Applies the prompt-specific treatment to a raw model response.
pub fn postprocess(prompt: EvaluationPrompt, response: String) -> (String, Option<PercentageMatch>) {
    match prompt {
        EvaluationPrompt::Review => (response, None),
        EvaluationPrompt::Improve => (make_links_clickable(&response), None),
        EvaluationPrompt::Match => {
            let percentage = parse_percentage(&response);
            (response, Some(percentage))
        }
    }
}
