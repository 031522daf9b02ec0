use anyhow::{Context, Result};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, StatusCode,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::SearchConfig;

use super::query::search_url;

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("search engine answered with status {0}")]
    Status(StatusCode),
    #[error("result page is not valid UTF-8")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// Source of result pages for `site:` queries.
#[allow(async_fn_in_trait)]
pub trait SearchBackend {
    async fn fetch_results(&self, target: &str) -> Result<String, FetchError>;
}

pub struct SearchClient {
    client: Client,
    endpoint: Url,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("invalid SEARCH_USER_AGENT")?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).context("invalid ACCEPT_LANGUAGE")?,
        );
        headers.insert(
            header::REFERER,
            HeaderValue::from_str(&config.referer).context("invalid SEARCH_REFERER")?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl SearchBackend for SearchClient {
    async fn fetch_results(&self, target: &str) -> Result<String, FetchError> {
        let url = search_url(&self.endpoint, target);
        debug!(target: "search", url = %url, query = %format!("site:{target}"), "querying");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(String::from_utf8(body.to_vec())?)
    }
}
