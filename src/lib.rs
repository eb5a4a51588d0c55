pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod sample;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
