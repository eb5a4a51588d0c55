// Lead processing pipeline: extraction, validation, dedup, assembly

pub mod processing;

// Re-export the batch entry point
pub use processing::process_batch;
