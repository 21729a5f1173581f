//! Data layer for the streaming-history statistics tool.
//!
//! Responsible for reading Spotify `StreamingHistory*.json` exports,
//! selecting plays by year or day, aggregating statistics and running the
//! top-level report pipeline.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod reader;
