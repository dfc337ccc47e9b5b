use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::warn;

use crate::config::NodeFailurePolicy;
use crate::crawler::models::JobListing;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("hard-coded selector must parse")
}

// Exact class attribute: listings carrying extra classes are other blocks.
static LISTING: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"li[class="clearfix job-bx wht-shd-bx"]"#));
static PUBLISHED: LazyLock<Selector> = LazyLock::new(|| selector("span.sim-posted span"));
static COMPANY: LazyLock<Selector> = LazyLock::new(|| selector("h3.joblist-comp-name"));
static SKILLS: LazyLock<Selector> = LazyLock::new(|| selector("span.srp-skills"));
static HEADER: LazyLock<Selector> = LazyLock::new(|| selector("header"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("listing #{index} has no {field} element")]
    MissingElement { index: usize, field: &'static str },
    #[error("listing #{index}: {field} element has no {attribute} attribute")]
    MissingAttribute {
        index: usize,
        field: &'static str,
        attribute: &'static str,
    },
}

/// Pulls every job listing out of one search results page, in document order.
///
/// With [`NodeFailurePolicy::Page`] the first malformed listing fails the
/// whole page. With [`NodeFailurePolicy::Node`] it is logged and skipped.
pub fn extract_listings(
    html: &str,
    policy: NodeFailurePolicy,
) -> Result<Vec<JobListing>, ExtractError> {
    let doc = Html::parse_document(html);
    let mut listings = Vec::new();

    for (index, node) in doc.select(&LISTING).enumerate() {
        match extract_listing(node, index) {
            Ok(listing) => listings.push(listing),
            Err(e) if policy == NodeFailurePolicy::Node => {
                warn!(index, error = %e, "Skipping malformed listing");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(listings)
}

fn extract_listing(node: ElementRef<'_>, index: usize) -> Result<JobListing, ExtractError> {
    let published_on = element_text(node, &PUBLISHED, index, "published date")?
        .trim()
        .to_string();
    let company_name = strip_whitespace(&element_text(node, &COMPANY, index, "company name")?);
    let required_skills = strip_whitespace(&element_text(node, &SKILLS, index, "required skills")?);

    // First header, its first h2, that h2's first anchor.
    let header = find(node, &HEADER, index, "header")?;
    let title = find(header, &TITLE, index, "job title")?;
    let link = find(title, &ANCHOR, index, "more info link")?;
    let more_info = link
        .value()
        .attr("href")
        .ok_or(ExtractError::MissingAttribute {
            index,
            field: "more info link",
            attribute: "href",
        })?
        .trim()
        .to_string();

    Ok(JobListing {
        company_name,
        required_skills,
        published_on,
        more_info,
    })
}

fn find<'a>(
    node: ElementRef<'a>,
    sel: &Selector,
    index: usize,
    field: &'static str,
) -> Result<ElementRef<'a>, ExtractError> {
    node.select(sel)
        .next()
        .ok_or(ExtractError::MissingElement { index, field })
}

fn element_text(
    node: ElementRef<'_>,
    sel: &Selector,
    index: usize,
    field: &'static str,
) -> Result<String, ExtractError> {
    Ok(find(node, sel, index, field)?.text().collect())
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
