//! Relevance scoring
//!
//! Ranking only ever sees `DocumentScorer::document_score`, so a real
//! similarity measure can replace the placeholder without touching filtering.

use biospace_common::Document;
use rand::{rngs::StdRng, Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Scores one document against a query
pub trait DocumentScorer: Send + Sync {
    /// Relevance in [0.5, 1.0]
    fn document_score(&self, query: &str, document: &Document) -> f32;
}

/// Pseudo-random score seeded by (query, document id).
///
/// Not a similarity measure. Reproducible for the same inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderScorer;

impl PlaceholderScorer {
    fn seed(query: &str, document_id: &str) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(query.trim().to_lowercase().as_bytes());
        hasher.update([0x1f]);
        hasher.update(document_id.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl DocumentScorer for PlaceholderScorer {
    fn document_score(&self, query: &str, document: &Document) -> f32 {
        let mut rng = StdRng::seed_from_u64(Self::seed(query, &document.id));
        rng.gen_range(0.5f32..=1.0f32)
    }
}
