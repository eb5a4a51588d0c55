pub mod json_lead_store;

pub use json_lead_store::JsonLeadStore;
