use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::domain::{DomainCheckResult, IndexStatus};

static TITLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title>(.*?)</title>").expect("valid title regex"));
static NO_RESULTS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<li\s+class="b_no".*?>(.*?)</li>"#).expect("valid no-results regex")
});
static COUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<span\s+class="sb_count">(.*?)</span>"#).expect("valid count regex")
});
static NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d,]*").expect("valid number regex"));
static ORGANIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<li\s+class="b_algo""#).expect("valid organic regex"));
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid tag regex"));

/// Decides from a result page whether the queried domain is indexed.
pub trait PageClassifier {
    fn classify(&self, html: &str, domain: &str) -> Option<DomainCheckResult>;
}

/// Matches the result page markup of the search engine against known marker
/// substrings rather than parsing the document.
#[derive(Debug, Clone)]
pub struct MarkupClassifier {
    no_result_phrases: Vec<String>,
}

impl MarkupClassifier {
    pub fn new(no_result_phrases: Vec<String>) -> Self {
        Self { no_result_phrases }
    }

    pub fn detect(&self, html: &str) -> Option<(IndexStatus, u64)> {
        if let Some(title) = TITLE_REGEX.captures(html).and_then(|c| c.get(1)) {
            debug!(target: "classifier", title = %title.as_str().trim(), "page title");
        }

        if let Some(inner) = NO_RESULTS_REGEX.captures(html).and_then(|c| c.get(1)) {
            let inner = inner.as_str();
            let text = TAG_REGEX.replace_all(inner, " ");
            let preview: String = text.trim().chars().take(60).collect();
            warn!(target: "classifier", text = %preview, "no-results marker present");
            if self
                .no_result_phrases
                .iter()
                .any(|phrase| inner.contains(phrase.as_str()))
            {
                return None;
            }
        }

        if let Some(count_text) = COUNT_REGEX.captures(html).and_then(|c| c.get(1)) {
            let count_text = count_text.as_str();
            info!(target: "classifier", text = %count_text, "result count marker present");
            if let Some(digits) = NUMBER_REGEX.find(count_text) {
                return match digits.as_str().replace(',', "").parse::<u64>() {
                    Ok(count) => Some((IndexStatus::Indexed, count)),
                    Err(err) => {
                        warn!(target: "classifier", error = %err, "result count is not a usable number");
                        None
                    }
                };
            }
        }

        let organic = ORGANIC_REGEX.find_iter(html).count();
        if organic > 0 {
            info!(target: "classifier", organic, "organic results present, total not shown");
            return Some((IndexStatus::IndexedCountUnknown, organic as u64));
        }

        warn!(target: "classifier", "no index markers found");
        None
    }
}

impl PageClassifier for MarkupClassifier {
    fn classify(&self, html: &str, domain: &str) -> Option<DomainCheckResult> {
        self.detect(html)
            .map(|(status, pages)| DomainCheckResult::new(domain, status, pages, Local::now()))
    }
}
