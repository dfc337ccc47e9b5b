use std::ops::RangeInclusive;

use thiserror::Error;
use tokio::time::{sleep, Duration};
use tracing::{error, info, info_span, Instrument};

use crate::{
    config::{Config, NodeFailurePolicy},
    crawler::{
        fetcher::{FetchError, PageSource},
        models::{JobListing, ScrapeReport},
        parser::{self, ExtractError},
    },
};

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

#[derive(Debug)]
pub enum PageOutcome {
    Scraped { page: u32, listings: Vec<JobListing> },
    Failed { page: u32, error: PageError },
}

pub struct ScrapingService<S> {
    source: S,
    pages: RangeInclusive<u32>,
    delay_ms: u64,
    policy: NodeFailurePolicy,
}

impl<S: PageSource> ScrapingService<S> {
    pub fn new(cfg: &Config, source: S) -> Self {
        Self {
            source,
            pages: cfg.pages(),
            delay_ms: cfg.delay_ms,
            policy: cfg.node_failure_policy,
        }
    }

    /// Fetches and parses a single results page.
    pub async fn scrape_page(&self, page: u32) -> PageOutcome {
        let result = async {
            let html = self.source.fetch_page(page).await?;
            Ok::<_, PageError>(parser::extract_listings(&html, self.policy)?)
        }
        .await;

        match result {
            Ok(listings) => PageOutcome::Scraped { page, listings },
            Err(error) => PageOutcome::Failed { page, error },
        }
    }

    /// Walks the whole page range. A failing page is logged and skipped;
    /// the run itself never fails.
    pub async fn run(&self) -> ScrapeReport {
        let mut report = ScrapeReport::default();

        for page in self.pages.clone() {
            let outcome = self
                .scrape_page(page)
                .instrument(info_span!("page", page))
                .await;

            match outcome {
                PageOutcome::Scraped { page, listings } => {
                    info!(page, count = listings.len(), "Page scraped");
                    report.listings.extend(listings);
                }
                PageOutcome::Failed { page, error } => {
                    error!(page, error = %error, "Error scraping page {page}");
                    report.failed_pages.push(page);
                }
            }

            if self.delay_ms > 0 && page < *self.pages.end() {
                sleep(Duration::from_millis(self.delay_ms)).await;
            }
        }

        info!(
            total = report.listings.len(),
            failed_pages = report.failed_pages.len(),
            "DONE: all pages processed"
        );
        report
    }
}
