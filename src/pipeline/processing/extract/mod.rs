use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{NormalizedLead, RawListing};

/// Vehicle makes recognized in listing titles. Matching is case-insensitive
/// and token-based; the display form keeps the seller's common spelling
/// ("Chevy", "VW") rather than canonicalizing brands.
pub const KNOWN_MAKES: &[&str] = &[
    "toyota",
    "honda",
    "ford",
    "chevrolet",
    "chevy",
    "nissan",
    "hyundai",
    "kia",
    "mazda",
    "subaru",
    "lexus",
    "bmw",
    "mercedes",
    "audi",
    "volkswagen",
    "vw",
    "dodge",
    "jeep",
    "chrysler",
    "acura",
    "infiniti",
    "mitsubishi",
    "volvo",
];

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());
static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").unwrap());
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());
static DAYS_AGO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s+days?\s+ago$").unwrap());
static HOURS_AGO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+(?:hours?|minutes?)\s+ago$").unwrap());

/// Trait for deriving typed fields from a raw listing.
///
/// Extraction never fails: an unparseable field is represented as `None` on
/// the normalized lead, and validation decides what that means. The reference
/// `now` is supplied by the caller so relative dates and year bounds are
/// deterministic under test.
pub trait FieldExtractor {
    fn extract(&self, raw: &RawListing, now: DateTime<Utc>) -> NormalizedLead;
}

/// Default extractor: regex and vocabulary based, single pass per field.
pub struct DefaultFieldExtractor;

impl DefaultFieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// First 4-digit token within the plausible model-year range wins.
    /// The title is searched before the description: titles are curated by
    /// sellers and more reliable.
    fn extract_year(&self, raw: &RawListing, now: DateTime<Utc>) -> Option<u16> {
        let max_year = (now.year() + 1) as u16;
        for text in [raw.title.as_str(), raw.description.as_str()] {
            for cap in YEAR_RE.find_iter(text) {
                if let Ok(year) = cap.as_str().parse::<u16>() {
                    if (1900..=max_year).contains(&year) {
                        return Some(year);
                    }
                }
            }
        }
        None
    }

    /// Token-based make lookup over the title with the year token removed,
    /// then the single following token as the model. Sellers overwhelmingly
    /// write "<year> <make> <model> ...", so one token is the right cutoff
    /// before trim levels and ad copy start ("EX", "- low miles").
    fn extract_make_model(
        &self,
        raw: &RawListing,
        year: Option<u16>,
    ) -> (Option<String>, Option<String>) {
        let year_token = year.map(|y| y.to_string());
        let tokens: Vec<&str> = raw
            .title
            .split_whitespace()
            .filter(|t| year_token.as_deref() != Some(*t))
            .collect();

        let make_index = match tokens.iter().position(|t| {
            let cleaned = clean_token(t);
            KNOWN_MAKES.contains(&cleaned.as_str())
        }) {
            Some(index) => index,
            None => return (None, None),
        };

        let make = Some(title_case(&clean_token(tokens[make_index])));
        let model = tokens
            .get(make_index + 1)
            .map(|t| clean_token(t))
            .filter(|t| !t.is_empty() && !is_model_stop(t))
            .map(|t| title_case(&t));

        (make, model)
    }

    /// Strips currency symbols and thousands separators and takes the first
    /// numeric run. Empty or non-numeric raw prices come back as `None`,
    /// never zero: zero is a valid price meaning "free".
    fn extract_price(&self, raw: &RawListing) -> (Option<f64>, bool) {
        let lowered = raw.raw_price.to_lowercase();
        let approximate = lowered.contains("obo") || lowered.contains("or best offer");

        let price = PRICE_RE
            .find(&raw.raw_price)
            .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok());

        (price, approximate)
    }

    /// Accepts ISO dates, US dates, "Month Day" and relative strings like
    /// "2 days ago", all resolved against the supplied `now`.
    fn extract_posted_at(&self, raw: &RawListing, now: DateTime<Utc>) -> Option<NaiveDate> {
        let text = raw.raw_posted_date.as_deref()?.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.date_naive());
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%m/%d/%Y") {
            return Some(date);
        }

        // "June 5" style dates carry no year; assume the reference year.
        let with_year = format!("{} {}", text, now.year());
        for format in ["%B %d %Y", "%b %d %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(&with_year, format) {
                return Some(date);
            }
        }

        let lowered = text.to_lowercase();
        match lowered.as_str() {
            "today" | "just now" => return Some(now.date_naive()),
            "yesterday" => return Some(now.date_naive() - Duration::days(1)),
            _ => {}
        }
        if let Some(caps) = DAYS_AGO_RE.captures(&lowered) {
            if let Ok(days) = caps[1].parse::<i64>() {
                return Some(now.date_naive() - Duration::days(days));
            }
        }
        if HOURS_AGO_RE.is_match(&lowered) {
            return Some(now.date_naive());
        }

        None
    }

    /// Phone numbers show up in contact snippets first, sometimes only in
    /// the description body.
    fn extract_phone(&self, raw: &RawListing) -> Option<String> {
        raw.raw_contact
            .as_deref()
            .and_then(|text| PHONE_RE.find(text))
            .or_else(|| PHONE_RE.find(&raw.description))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for DefaultFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DefaultFieldExtractor {
    fn extract(&self, raw: &RawListing, now: DateTime<Utc>) -> NormalizedLead {
        let year = self.extract_year(raw, now);
        let (make, model) = self.extract_make_model(raw, year);
        let (price, price_is_approximate) = self.extract_price(raw);
        let posted_at = self.extract_posted_at(raw, now);
        let phone = self.extract_phone(raw);

        NormalizedLead {
            year,
            make,
            model,
            price,
            price_is_approximate,
            posted_at,
            phone,
            raw: raw.clone(),
        }
    }
}

/// Strips punctuation from token edges and lowercases for vocabulary lookup.
fn clean_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Tokens that end a model phrase rather than belonging to it.
fn is_model_stop(cleaned: &str) -> bool {
    cleaned.chars().all(|c| c.is_ascii_digit()) || KNOWN_MAKES.contains(&cleaned)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
