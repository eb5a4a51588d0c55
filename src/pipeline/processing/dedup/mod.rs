use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DedupStatus, NormalizedLead};

/// Last-known mutable fields of a previously recorded lead, as supplied by
/// the storage collaborator for one run. Immutable fields (year, make,
/// model) are not tracked: a changed year on the same URL is a seller edit
/// the refresh carries along, not a new lead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeadSnapshot {
    pub price: Option<f64>,
    #[serde(default)]
    pub description: String,
    pub posted_at: Option<NaiveDate>,
}

impl LeadSnapshot {
    pub fn of(lead: &NormalizedLead) -> Self {
        Self {
            price: lead.price,
            description: lead.raw.description.clone(),
            posted_at: lead.posted_at,
        }
    }
}

/// Snapshot view of every lead id the storage collaborator already holds.
/// The pipeline never mutates the caller's copy; batch-local additions go
/// through a working clone.
pub type KnownLeads = HashMap<Uuid, LeadSnapshot>;

/// Classifies candidates against the known-lead set.
///
/// Comparison is exact on the derived lead id; near-duplicate detection
/// (re-posted ads with altered text) is out of scope.
pub struct Deduplicator {
    update_policy_enabled: bool,
}

impl Deduplicator {
    pub fn new(update_policy_enabled: bool) -> Self {
        Self {
            update_policy_enabled,
        }
    }

    pub fn classify(
        &self,
        lead_id: Uuid,
        candidate: &NormalizedLead,
        known: &KnownLeads,
    ) -> DedupStatus {
        match known.get(&lead_id) {
            None => DedupStatus::New,
            Some(existing) => {
                if self.update_policy_enabled && Self::has_changes(existing, candidate) {
                    DedupStatus::Updated
                } else {
                    DedupStatus::Duplicate
                }
            }
        }
    }

    /// Field-by-field comparison of the mutable fields.
    fn has_changes(existing: &LeadSnapshot, candidate: &NormalizedLead) -> bool {
        existing.price != candidate.price
            || existing.description != candidate.raw.description
            || existing.posted_at != candidate.posted_at
    }
}
