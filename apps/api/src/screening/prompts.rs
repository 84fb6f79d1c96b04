use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Instruction used to label a résumé. Only the name is wanted back.
pub const NAME_EXTRACTION_PROMPT: &str = "\
    Read the attached resume and return only the candidate's full name. \
    Do not add any other words, punctuation, labels or formatting.";

const GENERAL_REVIEW_PROMPT: &str = "\
    You are an experienced Technical Human Resource Manager. Your task is to review the \
    provided resume against the job description. Please share your professional evaluation \
    on whether the candidate's profile aligns with the role. Highlight the strengths and \
    weaknesses of the applicant in relation to the specified job requirements.";

const SKILL_IMPROVEMENT_PROMPT: &str = "\
    You are an expert career counselor with a deep understanding of the job market, skill \
    development, and online certifications. Your task is to evaluate the resume and suggest \
    how the candidate can improve their skills to better align with the job description. \
    Provide specific certifications, online courses (with full https:// links), or skill \
    improvement strategies that can help the candidate.";

const PERCENTAGE_MATCH_PROMPT: &str = "\
    You are a skilled ATS (Applicant Tracking System) scanner with a deep understanding of \
    data science and ATS functionality. Your task is to evaluate the resume against the \
    provided job description and give the percentage of match. Begin your answer with a line \
    of the exact form 'Percentage Match: <number>%', then list the keywords missing from the \
    resume, and finish with your final thoughts.";

/// The three fixed evaluations a user can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationPrompt {
    /// General strengths/weaknesses review.
    Review,
    /// Skill-improvement suggestions; URLs in the response are linkified.
    Improve,
    /// Percentage match; responses are scored and ranked.
    Match,
}

impl EvaluationPrompt {
    pub fn instruction(&self) -> &'static str {
        match self {
            EvaluationPrompt::Review => GENERAL_REVIEW_PROMPT,
            EvaluationPrompt::Improve => SKILL_IMPROVEMENT_PROMPT,
            EvaluationPrompt::Match => PERCENTAGE_MATCH_PROMPT,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            EvaluationPrompt::Review => "review",
            EvaluationPrompt::Improve => "improve",
            EvaluationPrompt::Match => "match",
        }
    }
}

impl fmt::Display for EvaluationPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for EvaluationPrompt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "review" => Ok(EvaluationPrompt::Review),
            "improve" => Ok(EvaluationPrompt::Improve),
            "match" => Ok(EvaluationPrompt::Match),
            other => Err(format!(
                "Unknown evaluation mode '{other}': expected review, improve or match"
            )),
        }
    }
}
