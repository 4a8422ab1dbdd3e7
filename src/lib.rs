//! E-commerce Dashboard - transaction log analytics
//!
//! Loads a transaction CSV once, matches returns against the sales they
//! reverse, and serves per-country aggregates to an egui dashboard or to the
//! JSON report commands.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod gui;
pub mod report;
