use serde::Serialize;

/// CSV column labels, in write order.
pub const CSV_HEADER: [&str; 4] = ["Company Name", "Required Skills", "Published on", "More Info"];

/// One job posting as found on a search results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct JobListing {
    #[serde(rename = "Company Name")]
    pub company_name: String,
    #[serde(rename = "Required Skills")]
    pub required_skills: String,
    #[serde(rename = "Published on")]
    pub published_on: String,
    #[serde(rename = "More Info")]
    pub more_info: String,
}

#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Listings in page order, then document order within a page.
    pub listings: Vec<JobListing>,
    pub failed_pages: Vec<u32>,
}
