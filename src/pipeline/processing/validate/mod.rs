use chrono::{DateTime, Datelike, Utc};

use crate::domain::{NormalizedLead, ValidationStatus};

/// Result of validating one normalized lead. Every violated rule is
/// reported, not just the first, so diagnostics fully explain the status.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub status: ValidationStatus,
    pub reasons: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_rejected(&self) -> bool {
        self.status == ValidationStatus::Rejected
    }
}

/// Structural validator for normalized leads.
///
/// Rules are evaluated independently; status precedence is
/// Rejected > Incomplete > Valid. The minimum model year comes from
/// configuration, never a hardcoded constant.
pub struct LeadValidator {
    min_vehicle_year: u16,
}

impl LeadValidator {
    pub fn new(min_vehicle_year: u16) -> Self {
        Self { min_vehicle_year }
    }

    pub fn validate(&self, lead: &NormalizedLead, now: DateTime<Utc>) -> ValidationOutcome {
        let mut reasons = Vec::new();
        let mut rejected = false;
        let mut incomplete = false;

        match lead.year {
            None => {
                rejected = true;
                reasons.push("no model year found".to_string());
            }
            Some(year) => {
                let max_year = (now.year() + 1) as u16;
                if year < self.min_vehicle_year {
                    rejected = true;
                    reasons.push("year below minimum threshold".to_string());
                } else if year > max_year {
                    // The extractor already drops out-of-range years; this
                    // guards against callers that build leads by hand.
                    rejected = true;
                    reasons.push("year beyond plausible model range".to_string());
                }
            }
        }

        if lead.raw.listing_url.trim().is_empty() {
            rejected = true;
            reasons.push("no unique identifier".to_string());
        }

        if lead.make.is_none() && lead.model.is_none() {
            incomplete = true;
            reasons.push("make and model not identified".to_string());
        }

        if let Some(price) = lead.price {
            if price < 0.0 || (price == 0.0 && !lead.price_is_approximate) {
                incomplete = true;
                reasons.push("price anomaly".to_string());
            }
        }

        let status = if rejected {
            ValidationStatus::Rejected
        } else if incomplete {
            ValidationStatus::Incomplete
        } else {
            ValidationStatus::Valid
        };

        ValidationOutcome { status, reasons }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawListing, Source};
    use chrono::TimeZone;

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn normalized(year: Option<u16>, url: &str) -> NormalizedLead {
        NormalizedLead {
            year,
            make: Some("Honda".to_string()),
            model: Some("Civic".to_string()),
            price: Some(14500.0),
            price_is_approximate: false,
            posted_at: None,
            phone: None,
            raw: RawListing {
                source: Source::Craigslist,
                listing_url: url.to_string(),
                title: "2019 Honda Civic".to_string(),
                description: String::new(),
                raw_price: "$14,500".to_string(),
                raw_posted_date: None,
                raw_location: None,
                raw_contact: None,
            },
        }
    }

    #[test]
    fn test_complete_lead_is_valid() {
        let validator = LeadValidator::new(2018);
        let outcome = validator.validate(&normalized(Some(2019), "cl/123"), reference_now());
        assert_eq!(outcome.status, ValidationStatus::Valid);
        assert!(outcome.reasons.is_empty());
    }

    #[test]
    fn test_missing_year_rejects() {
        let validator = LeadValidator::new(2018);
        let outcome = validator.validate(&normalized(None, "cl/123"), reference_now());
        assert_eq!(outcome.status, ValidationStatus::Rejected);
        assert!(outcome.reasons.iter().any(|r| r.contains("no model year")));
    }

    #[test]
    fn test_year_below_configured_minimum_rejects() {
        let validator = LeadValidator::new(2018);
        let outcome = validator.validate(&normalized(Some(2016), "cl/123"), reference_now());
        assert_eq!(outcome.status, ValidationStatus::Rejected);
        assert!(outcome
            .reasons
            .iter()
            .any(|r| r.contains("year below minimum threshold")));
    }

    #[test]
    fn test_missing_url_rejects_with_identifier_reason() {
        let validator = LeadValidator::new(2018);
        let outcome = validator.validate(&normalized(Some(2019), ""), reference_now());
        assert_eq!(outcome.status, ValidationStatus::Rejected);
        assert!(outcome
            .reasons
            .iter()
            .any(|r| r.contains("no unique identifier")));
    }

    #[test]
    fn test_all_violated_rules_are_reported() {
        let validator = LeadValidator::new(2018);
        let outcome = validator.validate(&normalized(None, ""), reference_now());
        assert_eq!(outcome.status, ValidationStatus::Rejected);
        assert_eq!(outcome.reasons.len(), 2);
    }

    #[test]
    fn test_missing_make_and_model_is_incomplete_not_rejected() {
        let validator = LeadValidator::new(2018);
        let mut lead = normalized(Some(2019), "cl/123");
        lead.make = None;
        lead.model = None;

        let outcome = validator.validate(&lead, reference_now());
        assert_eq!(outcome.status, ValidationStatus::Incomplete);
    }

    #[test]
    fn test_zero_price_without_qualifier_is_flagged() {
        let validator = LeadValidator::new(2018);
        let mut lead = normalized(Some(2019), "cl/123");
        lead.price = Some(0.0);

        let outcome = validator.validate(&lead, reference_now());
        assert_eq!(outcome.status, ValidationStatus::Incomplete);
        assert!(outcome.reasons.iter().any(|r| r.contains("price anomaly")));
    }

    #[test]
    fn test_rejection_wins_over_incomplete() {
        let validator = LeadValidator::new(2018);
        let mut lead = normalized(None, "cl/123");
        lead.make = None;
        lead.model = None;

        let outcome = validator.validate(&lead, reference_now());
        assert_eq!(outcome.status, ValidationStatus::Rejected);
        // Both findings still reported.
        assert_eq!(outcome.reasons.len(), 2);
    }
}
