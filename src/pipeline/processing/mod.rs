// Pipeline processing: field extraction, validation, dedup and assembly

pub mod assemble;
pub mod dedup;
pub mod extract;
pub mod validate;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::domain::{lead_id, DedupStatus, RawListing};
use crate::pipeline::processing::assemble::{assemble, BatchOutcome};
use crate::pipeline::processing::dedup::{Deduplicator, KnownLeads, LeadSnapshot};
use crate::pipeline::processing::extract::FieldExtractor;
use crate::pipeline::processing::validate::LeadValidator;

/// Runs one batch of raw listings through extract, validate, dedup and
/// assemble.
///
/// Pure and synchronous: no I/O, no shared state. The caller owns the
/// known-lead snapshot; a working clone picks up leads accepted earlier in
/// the same batch so a URL submitted twice in one run classifies as a
/// duplicate on its second occurrence.
pub fn process_batch(
    extractor: &dyn FieldExtractor,
    listings: &[RawListing],
    known: &KnownLeads,
    config: &PipelineConfig,
    now: DateTime<Utc>,
) -> BatchOutcome {
    let validator = LeadValidator::new(config.min_vehicle_year);
    let deduplicator = Deduplicator::new(config.update_policy_enabled);

    let mut seen = known.clone();
    let mut outcome = BatchOutcome::default();

    for raw in listings {
        let normalized = extractor.extract(raw, now);
        let validation = validator.validate(&normalized, now);

        // Rejected leads never enter the known set and are never classified
        // against it; they carry the discarded classification.
        if validation.is_rejected() {
            debug!(title = %raw.title, reasons = ?validation.reasons, "listing rejected");
            let id = (!raw.listing_url.trim().is_empty())
                .then(|| lead_id(raw.source, &raw.listing_url));
            outcome.push(assemble(id, normalized, validation, DedupStatus::Duplicate));
            continue;
        }

        let id = lead_id(raw.source, &raw.listing_url);
        let dedup_status = deduplicator.classify(id, &normalized, &seen);
        if matches!(dedup_status, DedupStatus::New | DedupStatus::Updated) {
            seen.insert(id, LeadSnapshot::of(&normalized));
        }

        debug!(title = %raw.title, status = ?dedup_status, "listing classified");
        outcome.push(assemble(Some(id), normalized, validation, dedup_status));
    }

    outcome
}
