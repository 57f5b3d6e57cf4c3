//! Corpus Store
//!
//! Holds the canonical document set as an immutable, versioned snapshot:
//! - `CorpusSnapshot`: validated documents plus an id index and digest
//! - `CorpusStore`: lock-free reads, atomic wholesale replacement
//! - `CorpusSource`: where documents come from (JSON file, in-memory)

mod snapshot;
mod source;
mod store;

pub use snapshot::CorpusSnapshot;
pub use source::{CorpusSource, JsonFileSource, StaticSource};
pub use store::CorpusStore;
