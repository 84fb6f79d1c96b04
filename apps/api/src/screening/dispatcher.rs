//! Evaluation dispatcher: runs one prompt over a batch of résumés, one at a time.

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::documents::{ExtractError, ExtractionCache};
use crate::llm_client::GenerativeModel;
use crate::models::document::UploadedDocument;
use crate::models::evaluation::{
    export_file_name, BatchIssue, EvaluationResult, IssueKind, RankedEntry,
};
use crate::screening::name::{extract_candidate_name, UNNAMED_LABEL};
use crate::screening::postprocess::postprocess;
use crate::screening::prompts::EvaluationPrompt;
use crate::screening::ranker::rank;

/// Everything one user action needs; nothing is read from shared state.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub documents: Vec<UploadedDocument>,
    pub job_description: String,
    pub prompt: EvaluationPrompt,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// In input order, one per document that got a model response.
    pub results: Vec<EvaluationResult>,
    /// Only for the percentage-match prompt.
    pub ranking: Option<Vec<RankedEntry>>,
    pub skipped: Vec<BatchIssue>,
}

/// Processes documents sequentially. A document that fails validation,
/// extraction or its model call is recorded in `skipped` and the batch moves on.
pub async fn run_batch(model: &dyn GenerativeModel, request: BatchRequest) -> BatchOutcome {
    let BatchRequest {
        documents,
        job_description,
        prompt,
    } = request;

    let total = documents.len();
    let mut cache = ExtractionCache::new();
    let mut labels = LabelRegistry::default();
    let mut results = Vec::with_capacity(total);
    let mut skipped = Vec::new();

    info!("Starting {prompt} batch of {total} resume(s)");

    for (index, document) in documents.iter().enumerate() {
        let payload = match cache.get_or_extract(document).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Skipping '{}': {e}", document.file_name);
                let kind = match e {
                    ExtractError::UnsupportedMediaType(_) => IssueKind::Validation,
                    _ => IssueKind::Extraction,
                };
                skipped.push(BatchIssue {
                    file_name: document.file_name.clone(),
                    kind,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let name = match extract_candidate_name(model, &payload).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Name extraction failed for '{}': {e}", document.file_name);
                UNNAMED_LABEL.to_string()
            }
        };
        let label = labels.claim(&name);

        let response = match model
            .generate(prompt.instruction(), &payload, &job_description)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Evaluation failed for '{}': {e}", document.file_name);
                skipped.push(BatchIssue {
                    file_name: document.file_name.clone(),
                    kind: IssueKind::ModelCall,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let (response_text, match_percentage) = postprocess(prompt, response);
        results.push(EvaluationResult {
            export_file_name: export_file_name(&label),
            label,
            file_name: document.file_name.clone(),
            response_text,
            match_percentage,
        });

        info!("Processed {}/{} resumes", index + 1, total);
    }

    let ranking = (prompt == EvaluationPrompt::Match).then(|| rank(&results));

    info!(
        "Batch finished: {} result(s), {} skipped, {} cache hit(s)",
        results.len(),
        skipped.len(),
        cache.hits()
    );

    BatchOutcome {
        results,
        ranking,
        skipped,
    }
}

/// Hands out unique labels in input order: "Jane Doe", "Jane Doe (2)", ...
#[derive(Debug, Default)]
struct LabelRegistry {
    issued: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl LabelRegistry {
    /// Never returns a label already handed out, including generated ones.
    fn claim(&mut self, name: &str) -> String {
        if self.issued.insert(name.to_string()) {
            return name.to_string();
        }
        let suffix = self.next_suffix.entry(name.to_string()).or_insert(2);
        loop {
            let label = format!("{name} ({suffix})");
            *suffix += 1;
            if self.issued.insert(label.clone()) {
                return label;
            }
        }
    }
}
