//! Retention module for test-run artifacts
//!
//! Keeps the reports, execution logs and screenshot folders produced by the
//! test pipeline within a bounded retention window.
//!
//! # Module Organization
//!
//! - [`manager`] - The `RetentionManager` and its three cleanup operations
//! - [`strategy`] - Screenshot eviction strategies
//! - [`listing`] - Shallow directory scans and recency ordering
//! - [`remover`] - The deletion seam (`EntryRemover`)
//! - [`outcome`] - Per-operation outcomes and the run summary

pub mod listing;
pub mod manager;
pub mod outcome;
pub mod remover;
pub mod strategy;

// Re-export main types for convenience
pub use manager::{CleanupPlan, RetentionManager};
pub use outcome::{CleanupOutcome, CleanupReport, CleanupTarget, FailedDeletion, OutcomeStatus};
pub use remover::{EntryRemover, FsRemover};
pub use strategy::ScreenshotStrategy;
