//! Atomically swappable snapshot holder

use super::snapshot::CorpusSnapshot;
use crate::errors::Result;
use crate::models::Document;
use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Thread-safe holder of the current `CorpusSnapshot`.
///
/// Readers never block; writers are serialized so versions stay monotonic.
pub struct CorpusStore {
    current: ArcSwap<CorpusSnapshot>,
    install_lock: Mutex<()>,
}

impl CorpusStore {
    pub fn new(initial: CorpusSnapshot) -> Self {
        Self {
            current: ArcSwap::new(Arc::new(initial)),
            install_lock: Mutex::new(()),
        }
    }

    /// Store holding an empty version-0 snapshot
    pub fn empty() -> Self {
        Self::new(CorpusSnapshot::empty())
    }

    /// Current snapshot. The returned `Arc` stays valid across later swaps.
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        self.current.load_full()
    }

    /// Replace the corpus wholesale with `documents`.
    ///
    /// On validation failure the installed snapshot is left untouched.
    pub fn install(&self, documents: Vec<Document>) -> Result<Arc<CorpusSnapshot>> {
        let _guard = self
            .install_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let next_version = self.current.load().version() + 1;
        let snapshot = match CorpusSnapshot::new(next_version, documents) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                warn!(error = %e, "Rejected corpus, keeping current snapshot");
                return Err(e);
            }
        };

        self.current.store(Arc::clone(&snapshot));

        info!(
            version = snapshot.version(),
            documents = snapshot.len(),
            digest = %snapshot.digest(),
            "Corpus snapshot installed"
        );

        Ok(snapshot)
    }
}

impl Default for CorpusStore {
    fn default() -> Self {
        Self::empty()
    }
}
