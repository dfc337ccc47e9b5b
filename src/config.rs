use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{bail, Context};

pub const DEFAULT_BASE_URL: &str = "https://www.timesjobs.com/candidate/job-search.html";
pub const DEFAULT_SEARCH_PHRASE: &str = "\"Machine Learning\"";

/// What to do when one listing node on a page is missing a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFailurePolicy {
    /// The whole page contributes nothing.
    Page,
    /// Only the malformed node is skipped.
    Node,
}

impl FromStr for NodeFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" => Ok(Self::Page),
            "node" => Ok(Self::Node),
            other => bail!("unknown node failure policy {other:?} (expected \"page\" or \"node\")"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub search_phrase: String,
    pub start_page: u32,
    pub end_page: u32,
    pub delay_ms: u64,
    pub request_timeout: Duration,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
    pub node_failure_policy: NodeFailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_phrase: DEFAULT_SEARCH_PHRASE.to_string(),
            start_page: 1,
            end_page: 23,
            delay_ms: 0,
            request_timeout: Duration::from_secs(30),
            output_path: PathBuf::from("Job_Postings.csv"),
            log_path: PathBuf::from("scraping.log"),
            node_failure_policy: NodeFailurePolicy::Page,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset keys keep
    /// their defaults.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("TIMESJOBS_BASE_URL") {
            cfg.base_url = v;
        }
        if let Some(v) = lookup("SEARCH_PHRASE") {
            cfg.search_phrase = v;
        }
        if let Some(v) = lookup("START_PAGE") {
            cfg.start_page = parse_var("START_PAGE", &v)?;
        }
        if let Some(v) = lookup("END_PAGE") {
            cfg.end_page = parse_var("END_PAGE", &v)?;
        }
        if let Some(v) = lookup("DELAY_MS") {
            cfg.delay_ms = parse_var("DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            cfg.request_timeout = Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("OUTPUT_PATH") {
            cfg.output_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("LOG_PATH") {
            cfg.log_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("NODE_FAILURE_POLICY") {
            cfg.node_failure_policy = v.parse()?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.start_page == 0 {
            bail!("START_PAGE is 1-based, got 0");
        }
        if self.start_page > self.end_page {
            bail!(
                "START_PAGE ({}) is after END_PAGE ({})",
                self.start_page,
                self.end_page
            );
        }
        if self.request_timeout.is_zero() {
            bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.start_page..=self.end_page
    }
}

fn parse_var<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {key}: {value:?}"))
}
