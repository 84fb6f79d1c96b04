use async_trait::async_trait;
use reqwest::Url;
use scraper::{Html, Selector};

use crate::job_description::renderer::PageRenderer;
use crate::job_description::{JobDescriptionSource, ScrapeError};

const LINKEDIN_DOMAIN: &str = "linkedin.com";

/// The two class names LinkedIn has used for the description container.
const DESCRIPTION_SELECTOR: &str =
    r#"[class*="show-more-less-html__markup"], [class*="description__text"]"#;

/// Everything from the first of these onward is page chrome, not the posting.
const BOILERPLATE_MARKERS: &[&str] = &[
    "How to Apply",
    "Show more",
    "Show less",
    "Seniority level",
    "Referrals increase your chances",
];

/// Adapter for LinkedIn job postings. Matches on the page's current markup, so
/// layout changes on LinkedIn's side surface as `DescriptionNotFound`.
pub struct LinkedInJobScraper<R> {
    renderer: R,
}

impl<R: PageRenderer> LinkedInJobScraper<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl<R: PageRenderer> JobDescriptionSource for LinkedInJobScraper<R> {
    fn name(&self) -> &str {
        "LinkedIn"
    }

    fn supports(&self, url: &str) -> bool {
        is_linkedin_url(url)
    }

    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let html = self.renderer.render(url).await?;
        extract_description(&html)
    }
}

/// An http(s) URL whose host is `linkedin.com` or one of its subdomains.
pub fn is_linkedin_url(url: &str) -> bool {
    let Ok(url) = Url::parse(url.trim()) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    url.host_str().is_some_and(|host| {
        let host = host.trim_end_matches('.');
        host == LINKEDIN_DOMAIN
            || host
                .strip_suffix(LINKEDIN_DOMAIN)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Finds the description container in rendered HTML and strips trailing boilerplate.
pub fn extract_description(html: &str) -> Result<String, ScrapeError> {
    let selector =
        Selector::parse(DESCRIPTION_SELECTOR).map_err(|_| ScrapeError::DescriptionNotFound)?;
    let document = Html::parse_document(html);

    let element = document
        .select(&selector)
        .next()
        .ok_or(ScrapeError::DescriptionNotFound)?;

    let text = element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let description = truncate_at_boilerplate(&text).trim();
    if description.is_empty() {
        return Err(ScrapeError::DescriptionNotFound);
    }
    Ok(description.to_string())
}

/// Keeps only the text before the earliest boilerplate marker.
pub fn truncate_at_boilerplate(text: &str) -> &str {
    let cut = BOILERPLATE_MARKERS
        .iter()
        .filter_map(|marker| text.find(marker))
        .min()
        .unwrap_or(text.len());
    &text[..cut]
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct FixtureRenderer {
        html: Result<&'static str, ()>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PageRenderer for FixtureRenderer {
        async fn render(&self, _url: &str) -> Result<String, ScrapeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.html
                .map(str::to_string)
                .map_err(|_| ScrapeError::Load("connection reset".into()))
        }
    }

    const POSTING: &str = r#"
        <html><body>
          <h1 class="top-card-layout__title">Senior Backend Engineer</h1>
          <div class="description__text description__text--rich">
            <section class="show-more-less-html">
              <div class="show-more-less-html__markup relative overflow-hidden">
                <p>We build distributed systems in Go.</p>
                <ul><li>5+ years backend experience</li><li>gRPC</li></ul>
                <p>How to Apply</p>
                <p>Send your CV to jobs@example.com</p>
              </div>
            </section>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_first_matching_container() {
        let text = extract_description(POSTING).unwrap();
        assert!(text.starts_with("We build distributed systems in Go."));
        assert!(text.contains("gRPC"));
    }

    #[test]
    fn test_boilerplate_truncated() {
        let text = extract_description(POSTING).unwrap();
        assert!(!text.contains("How to Apply"));
        assert!(!text.contains("jobs@example.com"));
    }

    #[test]
    fn test_alternate_class_pattern() {
        let html = r#"<div class="jobs-description__text">Own the billing platform. Show more</div>"#;
        assert_eq!(extract_description(html).unwrap(), "Own the billing platform.");
    }

    #[test]
    fn test_missing_container_is_unable() {
        let err = extract_description("<html><body><p>Sign in</p></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::DescriptionNotFound));
        assert!(err.to_string().starts_with("Unable"));
    }

    #[test]
    fn test_truncate_uses_earliest_marker() {
        assert_eq!(
            truncate_at_boilerplate("Role\nSeniority level\nMid\nHow to Apply"),
            "Role\n"
        );
        assert_eq!(truncate_at_boilerplate("No markers here"), "No markers here");
    }

    #[test]
    fn test_supports_linkedin_only() {
        let scraper = LinkedInJobScraper::new(FixtureRenderer {
            html: Ok(POSTING),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        assert!(scraper.supports("https://www.LinkedIn.com/jobs/view/3912"));
        assert!(!scraper.supports("https://boards.greenhouse.io/acme/jobs/1"));
    }

    #[test]
    fn test_linkedin_hosts_accepted() {
        assert!(is_linkedin_url("https://linkedin.com/jobs/view/1"));
        assert!(is_linkedin_url("https://uk.linkedin.com/jobs/view/1"));
        assert!(is_linkedin_url("http://www.linkedin.com./jobs/view/1"));
    }

    #[test]
    fn test_linkedin_mention_outside_host_rejected() {
        assert!(!is_linkedin_url("http://169.254.169.254/latest/meta-data/?x=linkedin.com"));
        assert!(!is_linkedin_url("http://127.0.0.1:8080/linkedin.com/jobs"));
        assert!(!is_linkedin_url("https://notlinkedin.com/jobs/view/1"));
        assert!(!is_linkedin_url("https://linkedin.com.evil.example/jobs"));
        assert!(!is_linkedin_url("https://linkedin.com@169.254.169.254/"));
        assert!(!is_linkedin_url("file:///etc/linkedin.com"));
        assert!(!is_linkedin_url("www.linkedin.com/jobs/view/1"));
    }

    #[tokio::test]
    async fn test_fetch_renders_then_extracts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let scraper = LinkedInJobScraper::new(FixtureRenderer {
            html: Ok(POSTING),
            calls: calls.clone(),
        });
        let text = scraper
            .fetch("https://www.linkedin.com/jobs/view/1")
            .await
            .unwrap();
        assert!(text.contains("distributed systems"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_render_failure_is_failed() {
        let scraper = LinkedInJobScraper::new(FixtureRenderer {
            html: Err(()),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let err = scraper
            .fetch("https://www.linkedin.com/jobs/view/1")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed"));
    }
}
