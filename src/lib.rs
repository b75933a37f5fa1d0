//! Jupiter Docs - Land Agreement Payment Schedules
//!
//! This crate turns agreement documents exported as typed fact bags into
//! normalized documents with term dates, payment schedules, merged amendments
//! and deeds, and QC flags.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
