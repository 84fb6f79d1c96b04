//! Job-description acquisition: pasted text, or a page fetched through a
//! site-specific `JobDescriptionSource`.

pub mod linkedin;
pub mod renderer;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Scrape failures. Every message starts with "Unable" or "Failed" so callers
/// can surface them as warnings and fall back to an empty description.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Unable to find the job description on the page")]
    DescriptionNotFound,

    #[error("Failed to load job page: {0}")]
    Load(String),

    #[error("Failed to load job page: blocked by bot detection (status 999)")]
    BotDetected,
}

/// A site adapter that can turn a job URL into description text.
#[async_trait]
pub trait JobDescriptionSource: Send + Sync {
    fn name(&self) -> &str;

    fn supports(&self, url: &str) -> bool;

    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedJobDescription {
    pub text: String,
    pub warning: Option<String>,
}

impl ResolvedJobDescription {
    fn text(text: String) -> Self {
        Self {
            text,
            warning: None,
        }
    }

    fn empty_with_warning(warning: String) -> Self {
        Self {
            text: String::new(),
            warning: Some(warning),
        }
    }
}

/// Picks the job description for a request from manual text or a URL.
pub struct JobDescriptionAcquirer {
    sources: Vec<Arc<dyn JobDescriptionSource>>,
}

impl JobDescriptionAcquirer {
    pub fn new(sources: Vec<Arc<dyn JobDescriptionSource>>) -> Self {
        Self { sources }
    }

    /// Non-blank manual text wins and the URL is not consulted. Otherwise the
    /// URL goes to the first source that supports it. Unsupported URLs and scrape
    /// failures give an empty description plus a warning, never an error.
    pub async fn resolve(&self, manual_text: Option<&str>, url: Option<&str>) -> ResolvedJobDescription {
        if let Some(text) = manual_text.map(str::trim).filter(|t| !t.is_empty()) {
            return ResolvedJobDescription::text(text.to_string());
        }

        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return ResolvedJobDescription::text(String::new());
        };

        let Some(source) = self.sources.iter().find(|s| s.supports(url)) else {
            warn!("No job description source supports {url}");
            return ResolvedJobDescription::empty_with_warning(self.unsupported_message());
        };

        match source.fetch(url).await {
            Ok(text) => {
                info!("Fetched job description from {} ({} chars)", source.name(), text.len());
                ResolvedJobDescription::text(text)
            }
            Err(e) => {
                warn!("{} scrape failed: {e}", source.name());
                ResolvedJobDescription::empty_with_warning(e.to_string())
            }
        }
    }

    fn unsupported_message(&self) -> String {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        format!(
            "Unsupported platform: only {} job URLs can be fetched. Paste the job description instead.",
            names.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct StubSource {
        result: fn() -> Result<String, ScrapeError>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(result: fn() -> Result<String, ScrapeError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl JobDescriptionSource for StubSource {
        fn name(&self) -> &str {
            "LinkedIn"
        }

        fn supports(&self, url: &str) -> bool {
            url.contains("linkedin.com")
        }

        async fn fetch(&self, _url: &str) -> Result<String, ScrapeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn acquirer(source: &Arc<StubSource>) -> JobDescriptionAcquirer {
        let source: Arc<dyn JobDescriptionSource> = source.clone();
        JobDescriptionAcquirer::new(vec![source])
    }

    #[tokio::test]
    async fn test_manual_text_wins() {
        let source = StubSource::new(|| Ok("scraped".into()));
        let resolved = acquirer(&source)
            .resolve(
                Some("  Senior Backend Engineer  "),
                Some("https://www.linkedin.com/jobs/view/1"),
            )
            .await;
        assert_eq!(resolved.text, "Senior Backend Engineer");
        assert!(resolved.warning.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsupported_url_never_scraped() {
        let source = StubSource::new(|| Ok("scraped".into()));
        let resolved = acquirer(&source)
            .resolve(None, Some("https://jobs.example.com/123"))
            .await;
        assert_eq!(resolved.text, "");
        assert!(resolved.warning.unwrap().starts_with("Unsupported platform"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_supported_url_scraped() {
        let source = StubSource::new(|| Ok("Build distributed systems in Go".into()));
        let resolved = acquirer(&source)
            .resolve(Some(""), Some("https://www.linkedin.com/jobs/view/1"))
            .await;
        assert_eq!(resolved.text, "Build distributed systems in Go");
        assert!(resolved.warning.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scrape_failure_becomes_warning() {
        let source = StubSource::new(|| Err(ScrapeError::DescriptionNotFound));
        let resolved = acquirer(&source)
            .resolve(None, Some("https://www.linkedin.com/jobs/view/1"))
            .await;
        assert_eq!(resolved.text, "");
        assert!(resolved.warning.unwrap().starts_with("Unable"));
    }

    #[tokio::test]
    async fn test_nothing_provided_is_empty_without_warning() {
        let source = StubSource::new(|| Ok("scraped".into()));
        let resolved = acquirer(&source).resolve(None, Some("   ")).await;
        assert_eq!(resolved, ResolvedJobDescription::text(String::new()));
    }

    #[test]
    fn test_scrape_errors_have_soft_failure_prefix() {
        let errors = [
            ScrapeError::DescriptionNotFound,
            ScrapeError::Load("timeout".into()),
            ScrapeError::BotDetected,
        ];
        for e in errors {
            let msg = e.to_string();
            assert!(msg.starts_with("Unable") || msg.starts_with("Failed"), "{msg}");
        }
    }
}
