use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::app::ports::{KnownLeadsPort, LeadSinkPort};
use crate::config::PipelineConfig;
use crate::domain::RawListing;
use crate::pipeline::processing::assemble::BatchOutcome;
use crate::pipeline::processing::extract::{DefaultFieldExtractor, FieldExtractor};
use crate::pipeline::processing::process_batch;

/// Use case for running one batch of scraped listings through the pipeline
/// and handing the partitioned result to the storage collaborator.
pub struct ProcessBatchUseCase {
    extractor: Box<dyn FieldExtractor + Send + Sync>,
    known_leads: Box<dyn KnownLeadsPort>,
    sink: Box<dyn LeadSinkPort>,
    config: PipelineConfig,
}

impl ProcessBatchUseCase {
    pub fn new(
        extractor: Box<dyn FieldExtractor + Send + Sync>,
        known_leads: Box<dyn KnownLeadsPort>,
        sink: Box<dyn LeadSinkPort>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            known_leads,
            sink,
            config,
        }
    }

    /// Create a use case with the default extractor
    pub fn with_default_extractor(
        known_leads: Box<dyn KnownLeadsPort>,
        sink: Box<dyn LeadSinkPort>,
        config: PipelineConfig,
    ) -> Self {
        Self::new(
            Box::new(DefaultFieldExtractor::new()),
            known_leads,
            sink,
            config,
        )
    }

    /// Process a batch of raw listings against the stored known-lead set.
    pub async fn process(
        &self,
        listings: &[RawListing],
        now: DateTime<Utc>,
    ) -> Result<BatchOutcome> {
        let known = self.known_leads.load_known_leads().await?;
        info!(
            listings = listings.len(),
            known = known.len(),
            min_vehicle_year = self.config.min_vehicle_year,
            update_policy = self.config.update_policy_enabled,
            "processing batch"
        );

        let outcome = process_batch(self.extractor.as_ref(), listings, &known, &self.config, now);
        info!(summary = %outcome.summary(), "batch processed");

        self.sink.write_batch(&outcome).await?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{lead_id, Source};
    use crate::pipeline::processing::dedup::{KnownLeads, LeadSnapshot};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Arc;

    struct FixedKnownLeads {
        known: KnownLeads,
    }

    #[async_trait]
    impl KnownLeadsPort for FixedKnownLeads {
        async fn load_known_leads(&self) -> Result<KnownLeads> {
            Ok(self.known.clone())
        }
    }

    struct CapturingSink {
        summaries: Arc<tokio::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl LeadSinkPort for CapturingSink {
        async fn write_batch(&self, outcome: &BatchOutcome) -> Result<()> {
            self.summaries.lock().await.push(outcome.summary());
            Ok(())
        }
    }

    fn listing(url: &str, title: &str, raw_price: &str) -> RawListing {
        RawListing {
            source: Source::Craigslist,
            listing_url: url.to_string(),
            title: title.to_string(),
            description: String::new(),
            raw_price: raw_price.to_string(),
            raw_posted_date: None,
            raw_location: None,
            raw_contact: None,
        }
    }

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_use_case_partitions_and_writes_to_sink() {
        let summaries = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let mut known = KnownLeads::new();
        known.insert(lead_id(Source::Craigslist, "cl/300"), LeadSnapshot::default());

        let use_case = ProcessBatchUseCase::with_default_extractor(
            Box::new(FixedKnownLeads { known }),
            Box::new(CapturingSink {
                summaries: summaries.clone(),
            }),
            PipelineConfig {
                min_vehicle_year: 2018,
                update_policy_enabled: false,
            },
        );

        let listings = vec![
            listing("cl/123", "2019 Honda Civic EX - low miles", "$14,500 obo"),
            listing("cl/300", "2020 Toyota Camry", "$22,000"),
            listing("cl/301", "Selling my car", "$5,000"),
        ];

        let outcome = use_case.process(&listings, reference_now()).await.unwrap();
        assert_eq!(outcome.new.len(), 1);
        assert_eq!(outcome.duplicates.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);

        let written = summaries.lock().await;
        assert_eq!(written.len(), 1);
        assert!(written[0].contains("1 new"));
    }
}
