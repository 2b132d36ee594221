// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod digest;
pub mod enrich;
pub mod ingest;
pub mod relevance;
pub mod run;
pub mod select;
pub mod similarity;
pub mod telemetry;

// Delivery channels
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::config::{Secrets, Settings};
pub use crate::digest::{compose, Digest, SelectedItem};
pub use crate::ingest::types::{FeedItem, FeedReader, RawItem, SourcePool};
pub use crate::notify::Dispatcher;
pub use crate::select::{DedupBasis, InterestConfig, Pipeline};
