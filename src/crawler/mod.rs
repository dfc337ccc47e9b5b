use anyhow::Context;

use crate::config::Config;
use crate::crawler::{fetcher::TimesJobsSource, models::ScrapeReport, service::ScrapingService};

pub mod fetcher;
pub mod models;
pub mod parser;
pub mod service;

/// Scrapes every configured results page from TimesJobs.
pub async fn crawl_pages(cfg: &Config) -> anyhow::Result<ScrapeReport> {
    let source = TimesJobsSource::from_config(cfg).context("failed to build http client")?;
    let service = ScrapingService::new(cfg, source);
    Ok(service.run().await)
}
