use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marketplace a listing was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Craigslist,
    FacebookMarketplace,
}

impl Source {
    /// Stable key used in lead id derivation. Never rename these values:
    /// changing them would re-key every previously recorded lead.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Source::Craigslist => "craigslist",
            Source::FacebookMarketplace => "facebook_marketplace",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key_prefix())
    }
}

/// Unprocessed listing data as handed over by a scraping collaborator.
///
/// Everything here is free text straight off the page. The pipeline never
/// trusts any of it; the extractor derives typed fields and the validator
/// decides what is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub source: Source,
    /// Expected globally unique per source. May be empty when the scraper
    /// could not resolve a link; validation rejects such listings.
    #[serde(default)]
    pub listing_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub raw_price: String,
    #[serde(default)]
    pub raw_posted_date: Option<String>,
    #[serde(default)]
    pub raw_location: Option<String>,
    #[serde(default)]
    pub raw_contact: Option<String>,
}

/// Typed fields derived from a [`RawListing`] by the field extractor.
///
/// Absence is always `None`, never an empty string or a sentinel value, so
/// downstream logic does not have to guess whether "" means "not found" or
/// "found and empty".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLead {
    pub year: Option<u16>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub price: Option<f64>,
    /// Set when the raw price carried an "obo" / "or best offer" qualifier.
    pub price_is_approximate: bool,
    pub posted_at: Option<NaiveDate>,
    /// Seller phone number recovered from contact or description text.
    pub phone: Option<String>,
    /// The raw listing carried through unchanged for diagnostics and storage.
    pub raw: RawListing,
}

/// Outcome of structural validation for a single lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    /// Usable for outreach but flagged for review.
    Incomplete,
    Rejected,
}

/// Outcome of duplicate classification against the known-lead set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStatus {
    New,
    /// Already known; discarded from the outreach output, kept for stats.
    Duplicate,
    /// Already known but a mutable field changed; passed through for a data
    /// refresh only. Must never re-trigger the one-time seller outreach.
    Updated,
}

/// Canonical, fully classified record of a single vehicle listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Deterministic key derived from source + listing URL. `None` only when
    /// the listing had no URL; such leads are rejected and their key is never
    /// reported to storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<Uuid>,
    pub normalized: NormalizedLead,
    pub validation_status: ValidationStatus,
    pub dedup_status: DedupStatus,
    /// Fully explains any rejected status; empty when valid.
    pub rejection_reasons: Vec<String>,
}

/// Derives the stable dedup key for a listing.
///
/// UUIDv5 over the source prefix and URL, so re-processing the same URL
/// always yields the same id across runs and processes.
pub fn lead_id(source: Source, listing_url: &str) -> Uuid {
    let key = format!("{}|{}", source.key_prefix(), listing_url);
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
}
