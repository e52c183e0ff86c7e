//! Claimscore Core Library
//!
//! Claim-based evaluation of retrieval-augmented generation pipelines:
//! claim extraction, judge-scored claim comparison, the retrieval and
//! generation metrics built on it, and run reports.

pub mod cancel;
pub mod claims;
pub mod config;
pub mod error;
pub mod ground_truth;
pub mod judge;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod results;
pub mod similarity;

pub use orchestrator::Evaluator;
