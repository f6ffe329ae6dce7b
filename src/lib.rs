pub mod annotation;
pub mod annotator;
pub mod backfill;
pub mod classifier;
pub mod corpus;
pub mod pipeline;
pub mod profile;
pub mod segmenter;
pub mod stats;

// Re-export main types for convenient access
pub use annotation::{Token, TokenAnnotation};
pub use annotator::{Annotator, ProcessAnnotator, StaticAnnotator};
pub use classifier::{classify, Outcome, RejectReason};
pub use pipeline::{ClassifyConfig, RunSummary};
pub use profile::{Language, LanguageProfile};
pub use stats::CollectionStats;
