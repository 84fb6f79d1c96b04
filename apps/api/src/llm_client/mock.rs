//! In-process `GenerativeModel` for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{GenerativeModel, LlmError};
use crate::models::document::DocumentPayload;

type Handler = dyn Fn(&str, &DocumentPayload, &str) -> Result<String, LlmError> + Send + Sync;

/// Answers every call with the given closure and records (prompt, document text, job description).
pub struct MockModel {
    handler: Box<Handler>,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl MockModel {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &DocumentPayload, &str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(
        &self,
        prompt: &str,
        document: &DocumentPayload,
        job_description: &str,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push((
            prompt.to_string(),
            document.text.clone(),
            job_description.to_string(),
        ));
        (self.handler)(prompt, document, job_description)
    }
}
