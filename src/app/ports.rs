use async_trait::async_trait;

use crate::pipeline::processing::assemble::BatchOutcome;
use crate::pipeline::processing::dedup::KnownLeads;

/// Storage-side port supplying the known-lead snapshot for one run.
#[async_trait]
pub trait KnownLeadsPort: Send + Sync {
    async fn load_known_leads(&self) -> anyhow::Result<KnownLeads>;
}

/// Output port receiving the partitioned batch result.
///
/// Contract for implementors: only `new` and `updated` leads may be
/// forwarded to messaging or CRM collaborators, and an `updated` lead must
/// refresh data only, never re-trigger the one-time seller outreach.
/// `duplicates` are for run statistics, `rejected` for diagnostics.
#[async_trait]
pub trait LeadSinkPort: Send + Sync {
    async fn write_batch(&self, outcome: &BatchOutcome) -> anyhow::Result<()>;
}
