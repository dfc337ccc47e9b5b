use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

const USER_AGENT: &str = "TimesJobs-Scraper/1.0";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for page {page} failed: {source}")]
    Request {
        page: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("page {page} returned HTTP {status}")]
    Status { page: u32, status: u16 },
    #[error("could not read body of page {page}: {source}")]
    Body {
        page: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that can hand back the markup of one results page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<String, FetchError>;
}

pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// The TimesJobs candidate search, one fixed query.
pub struct TimesJobsSource {
    client: Client,
    base_url: String,
    search_phrase: String,
}

impl TimesJobsSource {
    pub fn new(client: Client, base_url: impl Into<String>, search_phrase: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            search_phrase: search_phrase.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> reqwest::Result<Self> {
        let client = build_client(cfg.request_timeout)?;
        Ok(Self::new(client, cfg.base_url.clone(), cfg.search_phrase.clone()))
    }

    fn search_params(&self, page: u32) -> [(&'static str, String); 7] {
        [
            ("searchType", "personalizedSearch".to_string()),
            ("from", "submit".to_string()),
            ("searchTextSrc", "as".to_string()),
            ("searchTextText", self.search_phrase.clone()),
            ("txtKeywords", self.search_phrase.clone()),
            ("txtLocation", String::new()),
            ("sequence", page.to_string()),
        ]
    }

    pub fn page_request(&self, page: u32) -> Result<Request, FetchError> {
        self.client
            .get(&self.base_url)
            .query(&self.search_params(page))
            .build()
            .map_err(|source| FetchError::Request { page, source })
    }
}

#[async_trait]
impl PageSource for TimesJobsSource {
    async fn fetch_page(&self, page: u32) -> Result<String, FetchError> {
        let req = self.page_request(page)?;
        debug!(page, url = %req.url(), "Fetching results page");

        let res = self
            .client
            .execute(req)
            .await
            .map_err(|source| FetchError::Request { page, source })?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page,
                status: status.as_u16(),
            });
        }

        res.text()
            .await
            .map_err(|source| FetchError::Body { page, source })
    }
}
