//! Data ingestion module - fetch pipeline for India-WRIS datasets

pub mod catalog;
pub mod fetch;
pub mod parse;
pub mod pipeline;
pub mod types;
pub mod utils;
pub mod write;

pub use types::*;
