//! Explain Module - precomputed feature attributions
//!
//! - `store` - per-client payloads loaded from the explainability pipeline
//! - `waterfall` - ranking and accumulation for the waterfall chart

pub mod store;
pub mod types;
pub mod waterfall;

pub use store::{ExplanationError, ExplanationStore};
pub use types::{Explanation, Waterfall, WaterfallStep};
