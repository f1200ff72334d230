//! Worker that turns case-management webhook events into personalized
//! email/SMS notifications: scenario resolution, upstream data composition,
//! eligibility validation, dispatch, and exactly-once completion reporting.

pub mod cache;
pub mod clients;
pub mod config;
pub mod errors;
pub mod models;
pub mod processor;
pub mod queries;
pub mod scenarios;
pub mod validation;
