use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DedupStatus, Lead, NormalizedLead, ValidationStatus};
use crate::pipeline::processing::validate::ValidationOutcome;

/// Pure aggregation of the three stage outputs into the final record.
///
/// A duplicate lead is still fully populated so it can be logged even though
/// it will not be forwarded to messaging or CRM collaborators.
pub fn assemble(
    lead_id: Option<Uuid>,
    normalized: NormalizedLead,
    validation: ValidationOutcome,
    dedup_status: DedupStatus,
) -> Lead {
    Lead {
        lead_id,
        normalized,
        validation_status: validation.status,
        dedup_status,
        rejection_reasons: validation.reasons,
    }
}

/// Partitioned result of one pipeline run, handed back to the storage
/// collaborator. Only `new` and `updated` are eligible for messaging and
/// CRM; `duplicates` exist for run statistics and `rejected` for
/// diagnostics.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub new: Vec<Lead>,
    pub updated: Vec<Lead>,
    pub duplicates: Vec<Lead>,
    pub rejected: Vec<Lead>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.new.len() + self.updated.len() + self.duplicates.len() + self.rejected.len()
    }

    /// Routes an assembled lead into its output partition. Rejected leads
    /// never land in `new`, whatever their dedup classification.
    pub fn push(&mut self, lead: Lead) {
        if lead.validation_status == ValidationStatus::Rejected {
            self.rejected.push(lead);
            return;
        }
        match lead.dedup_status {
            DedupStatus::New => self.new.push(lead),
            DedupStatus::Updated => self.updated.push(lead),
            DedupStatus::Duplicate => self.duplicates.push(lead),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} listings: {} new, {} updated, {} duplicate, {} rejected",
            self.total(),
            self.new.len(),
            self.updated.len(),
            self.duplicates.len(),
            self.rejected.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{lead_id, RawListing, Source};

    fn lead(status: ValidationStatus, dedup: DedupStatus) -> Lead {
        let raw = RawListing {
            source: Source::Craigslist,
            listing_url: "cl/123".to_string(),
            title: "2019 Honda Civic".to_string(),
            description: String::new(),
            raw_price: "$14,500".to_string(),
            raw_posted_date: None,
            raw_location: None,
            raw_contact: None,
        };
        Lead {
            lead_id: Some(lead_id(Source::Craigslist, "cl/123")),
            normalized: NormalizedLead {
                year: Some(2019),
                make: Some("Honda".to_string()),
                model: Some("Civic".to_string()),
                price: Some(14500.0),
                price_is_approximate: false,
                posted_at: None,
                phone: None,
                raw,
            },
            validation_status: status,
            dedup_status: dedup,
            rejection_reasons: Vec::new(),
        }
    }

    #[test]
    fn test_partitions_by_dedup_status() {
        let mut outcome = BatchOutcome::default();
        outcome.push(lead(ValidationStatus::Valid, DedupStatus::New));
        outcome.push(lead(ValidationStatus::Incomplete, DedupStatus::Updated));
        outcome.push(lead(ValidationStatus::Valid, DedupStatus::Duplicate));

        assert_eq!(outcome.new.len(), 1);
        assert_eq!(outcome.updated.len(), 1);
        assert_eq!(outcome.duplicates.len(), 1);
        assert_eq!(outcome.rejected.len(), 0);
    }

    #[test]
    fn test_rejected_never_reaches_new_partition() {
        let mut outcome = BatchOutcome::default();
        outcome.push(lead(ValidationStatus::Rejected, DedupStatus::New));

        assert!(outcome.new.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn test_assembled_rejection_reasons_carry_through() {
        let outcome = ValidationOutcome {
            status: ValidationStatus::Rejected,
            reasons: vec!["no model year found".to_string()],
        };
        let source = lead(ValidationStatus::Valid, DedupStatus::New);
        let assembled = assemble(
            source.lead_id,
            source.normalized,
            outcome,
            DedupStatus::Duplicate,
        );

        assert_eq!(assembled.validation_status, ValidationStatus::Rejected);
        assert_eq!(assembled.rejection_reasons, vec!["no model year found"]);
    }
}
