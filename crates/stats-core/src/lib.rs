//! Shared types for the streaming-history statistics tool: the play record
//! model, error taxonomy, settings and time/duration helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
