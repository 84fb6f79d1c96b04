use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::{Attempt, Policy};
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::job_description::ScrapeError;

const MAX_REDIRECTS: usize = 5;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Produces the HTML of a job page. The only seam between site adapters and the network.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Fetches pages over HTTP with a browser user agent, bounded by a fixed wait.
pub struct HttpPageRenderer {
    client: Client,
}

impl HttpPageRenderer {
    pub fn new(render_wait: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(render_wait)
            .redirect(Policy::custom(same_site_redirects))
            .build()?;
        Ok(Self { client })
    }
}

/// Follows a redirect only while it stays on the site the first request went to.
fn same_site_redirects(attempt: Attempt) -> reqwest::redirect::Action {
    if attempt.previous().len() > MAX_REDIRECTS {
        return attempt.error("too many redirects");
    }
    let same_site = attempt
        .previous()
        .first()
        .is_some_and(|origin| same_site(origin, attempt.url()));
    if same_site {
        attempt.follow()
    } else {
        warn!("Refusing cross-site redirect to {}", attempt.url());
        attempt.stop()
    }
}

fn same_site(origin: &Url, target: &Url) -> bool {
    if !matches!(target.scheme(), "http" | "https") {
        return false;
    }
    match (origin.host_str(), target.host_str()) {
        (Some(a), Some(b)) => site_of(a) == site_of(b),
        _ => false,
    }
}

/// The last two labels of a host name, e.g. `linkedin.com` for `www.linkedin.com`.
fn site_of(host: &str) -> String {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let labels: Vec<&str> = host.rsplitn(3, '.').collect();
    match labels.as_slice() {
        [tld, domain, ..] => format!("{domain}.{tld}"),
        _ => host,
    }
}

#[async_trait]
impl PageRenderer for HttpPageRenderer {
    async fn render(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Fetching job page: {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Load(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 999 {
            warn!("Received 999 status - likely bot detection");
            return Err(ScrapeError::BotDetected);
        }
        if !status.is_success() {
            return Err(ScrapeError::Load(format!("status {status}")));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::Load(e.to_string()))?;
        debug!("Job page HTML length: {} bytes", html.len());
        Ok(html)
    }
}
