/// Guideline source fetcher.
///
/// Fetches the configured guideline pages over HTTP and reduces each to a
/// title plus whitespace-normalized text. Every source produces an explicit
/// `FetchOutcome`: failures are data, logged and reported, never raised.
/// The snippet selector only ever sees successfully fetched pages.
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::error::AppError;
use crate::model::GuidelinePage;
use triage_common::error::CommonError;

/// Title used when a page has no usable `<title>` element.
const DEFAULT_TITLE: &str = "Guideline resource";

/// Outcome of one fetch attempt against one configured source.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(GuidelinePage),
    Failed { url: String, reason: String },
}

/// A source that could not be fetched or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFetch {
    pub url: String,
    pub reason: String,
}

/// Split fetch outcomes into pages (input order preserved) and failures.
pub fn partition_outcomes(outcomes: Vec<FetchOutcome>) -> (Vec<GuidelinePage>, Vec<FailedFetch>) {
    let mut pages = Vec::new();
    let mut failed = Vec::new();
    for outcome in outcomes {
        match outcome {
            FetchOutcome::Fetched(page) => pages.push(page),
            FetchOutcome::Failed { url, reason } => failed.push(FailedFetch { url, reason }),
        }
    }
    (pages, failed)
}

pub struct GuidelineFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl GuidelineFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent("referral-triage/fetch")
            .build()
            .map_err(CommonError::from)?;
        Ok(Self { http, timeout })
    }

    /// Fetch every URL concurrently. The returned outcomes are in input
    /// order regardless of completion order.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<FetchOutcome> {
        let outcomes =
            futures::future::join_all(urls.iter().map(|url| self.fetch_one(url))).await;
        let fetched = outcomes
            .iter()
            .filter(|o| matches!(o, FetchOutcome::Fetched(_)))
            .count();
        info!(requested = urls.len(), fetched, "guideline fetch round complete");
        outcomes
    }

    async fn fetch_one(&self, url: &str) -> FetchOutcome {
        match self.try_fetch(url).await {
            Ok(page) => FetchOutcome::Fetched(page),
            Err(reason) => {
                warn!(url, reason = %reason, "guideline source fetch failed");
                FetchOutcome::Failed {
                    url: url.to_string(),
                    reason,
                }
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<GuidelinePage, String> {
        let resp = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("unexpected status {status}"));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| format!("failed to read body: {e}"))?;

        Ok(parse_guideline_page(url, &body))
    }
}

/// Reduce raw HTML to a `GuidelinePage`: `<title>` text (or a fixed
/// fallback) plus the page's visible text with whitespace runs collapsed
/// to single spaces.
pub fn parse_guideline_page(url: &str, html: &str) -> GuidelinePage {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let raw_text = document.root_element().text().collect::<Vec<_>>().join("\n");
    let text = normalize_whitespace(&raw_text);

    GuidelinePage {
        title,
        url: url.to_string(),
        text,
    }
}

static WHITESPACE_RUNS: OnceLock<Regex> = OnceLock::new();

/// Collapse every whitespace run to a single space and trim. The pattern
/// is compiled once and reused across pages and ingested documents.
pub fn normalize_whitespace(s: &str) -> String {
    let re = WHITESPACE_RUNS.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
    re.replace_all(s, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_title_and_collapses_whitespace() {
        let html = "<html><head><title>  Chest pain |\n NICE CKS </title></head>\
                    <body><h1>Assessment</h1>\n\n<p>Refer   urgently\twhen indicated.</p></body></html>";
        let page = parse_guideline_page("https://example.org/chest-pain", html);
        assert_eq!(page.title, "Chest pain | NICE CKS");
        assert_eq!(page.url, "https://example.org/chest-pain");
        assert!(page.text.contains("Assessment Refer urgently when indicated."));
        assert!(!page.text.contains('\n'));
    }

    #[test]
    fn missing_title_falls_back() {
        let html = "<html><body><p>guidance text</p></body></html>";
        let page = parse_guideline_page("u", html);
        assert_eq!(page.title, DEFAULT_TITLE);
    }

    #[test]
    fn empty_title_falls_back() {
        let html = "<html><head><title>   </title></head><body>x</body></html>";
        let page = parse_guideline_page("u", html);
        assert_eq!(page.title, DEFAULT_TITLE);
    }

    #[test]
    fn normalize_whitespace_trims_and_collapses() {
        assert_eq!(normalize_whitespace("  a\n\n b\t\tc "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
        // Repeated calls reuse the shared compiled pattern.
        assert_eq!(normalize_whitespace("x  y"), normalize_whitespace("x \n y"));
    }

    #[test]
    fn partition_preserves_order() {
        let outcomes = vec![
            FetchOutcome::Fetched(GuidelinePage {
                title: "A".into(),
                url: "ua".into(),
                text: "ta".into(),
            }),
            FetchOutcome::Failed {
                url: "ub".into(),
                reason: "timeout".into(),
            },
            FetchOutcome::Fetched(GuidelinePage {
                title: "C".into(),
                url: "uc".into(),
                text: "tc".into(),
            }),
        ];
        let (pages, failed) = partition_outcomes(outcomes);
        assert_eq!(
            pages.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            vec!["A", "C"]
        );
        assert_eq!(failed, vec![FailedFetch { url: "ub".into(), reason: "timeout".into() }]);
    }
}
