use crate::annotator::Annotator;
use anyhow::Result;
use serde::Serialize;

/// Descriptive statistics over a sentence collection.
/// Recomputed on demand; never persisted independently of its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    /// Number of sentences in the collection
    pub sentences: usize,
    /// Summed token count across all sentences
    pub total_tokens: usize,
    /// Mean tokens per sentence; 0.0 for an empty collection
    pub mean_tokens: f64,
}

impl CollectionStats {
    pub fn empty() -> Self {
        Self {
            sentences: 0,
            total_tokens: 0,
            mean_tokens: 0.0,
        }
    }
}

/// Compute count, total token length, and mean length for a collection.
///
/// Per-sentence length is the token count from re-annotating the sentence,
/// so lengths agree with what the classifier saw. An empty collection
/// reports mean 0.0 rather than failing.
pub fn aggregate<A: Annotator>(
    sentences: &[String],
    annotator: &mut A,
) -> Result<CollectionStats> {
    if sentences.is_empty() {
        return Ok(CollectionStats::empty());
    }

    let mut total_tokens = 0usize;
    for sentence in sentences {
        total_tokens += annotator.annotate(sentence)?.len();
    }

    Ok(CollectionStats {
        sentences: sentences.len(),
        total_tokens,
        mean_tokens: total_tokens as f64 / sentences.len() as f64,
    })
}
