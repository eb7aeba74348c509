//! Export settings for csvguard.
//!
//! This crate provides the settings types read from
//! `.csvguard/config.yaml` and their conversion into a writer
//! [`CsvConfig`](csvguard_export::CsvConfig).

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;
