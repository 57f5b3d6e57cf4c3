//! Biospace Common Library
//!
//! Shared code for the Biospace engine and gateway including:
//! - Document / graph / answer data model
//! - Versioned corpus snapshots with atomic reload
//! - Error types and handling
//! - Configuration management
//! - Shared-credential check
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod corpus;
pub mod errors;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use config::AppConfig;
pub use corpus::{CorpusSnapshot, CorpusSource, CorpusStore};
pub use errors::{AppError, Result};
pub use models::{Answer, ComparisonResult, Document, Edge, EvidenceSpan, Node, NodeType, Relation};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
