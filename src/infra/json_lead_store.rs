use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::app::ports::{KnownLeadsPort, LeadSinkPort};
use crate::pipeline::processing::assemble::BatchOutcome;
use crate::pipeline::processing::dedup::{KnownLeads, LeadSnapshot};

/// File-backed adapter for both storage-side ports.
///
/// The known-leads file is a JSON map of lead id to last-seen snapshot; the
/// optional report file receives the full partitioned batch result. Stands
/// in for the spreadsheet/CRM storage collaborators during local runs.
pub struct JsonLeadStore {
    known_path: PathBuf,
    report_path: Option<PathBuf>,
}

impl JsonLeadStore {
    pub fn new(known_path: PathBuf, report_path: Option<PathBuf>) -> Self {
        Self {
            known_path,
            report_path,
        }
    }

    fn read_known(&self) -> anyhow::Result<KnownLeads> {
        if !self.known_path.exists() {
            debug!(path = %self.known_path.display(), "no known-leads file, starting empty");
            return Ok(KnownLeads::new());
        }
        let content = fs::read_to_string(&self.known_path)?;
        let known: KnownLeads = serde_json::from_str(&content)?;
        Ok(known)
    }
}

#[async_trait]
impl KnownLeadsPort for JsonLeadStore {
    async fn load_known_leads(&self) -> anyhow::Result<KnownLeads> {
        let known = self.read_known()?;
        debug!(count = known.len(), "loaded known leads");
        Ok(known)
    }
}

#[async_trait]
impl LeadSinkPort for JsonLeadStore {
    async fn write_batch(&self, outcome: &BatchOutcome) -> anyhow::Result<()> {
        // Fold new and updated leads back into the known set so the next run
        // sees them. Rejected leads are excluded: they carry no usable key.
        let mut known = self.read_known()?;
        for lead in outcome.new.iter().chain(outcome.updated.iter()) {
            let id: Uuid = match lead.lead_id {
                Some(id) => id,
                None => continue,
            };
            known.insert(id, LeadSnapshot::of(&lead.normalized));
        }

        if let Some(parent) = self.known_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.known_path, serde_json::to_string_pretty(&known)?)?;
        info!(
            path = %self.known_path.display(),
            count = known.len(),
            "known-leads file updated"
        );

        if let Some(report_path) = &self.report_path {
            fs::write(report_path, serde_json::to_string_pretty(outcome)?)?;
            info!(path = %report_path.display(), "batch report written");
        }

        Ok(())
    }
}
