//! Collaborator traits for the pipeline's external boundaries.
//!
//! Both providers are consumed through these object-safe traits so the
//! coordinator takes explicitly constructed, passed-in clients and tests
//! can substitute fakes without touching global state.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::ComparableSale;

/// Text-generation boundary to the AI provider.
///
/// Implementations must classify provider failures into the closed error
/// set: rate/quota exhaustion as [`crate::Error::RateLimited`] (never
/// retried), transient unavailability as [`crate::Error::Unavailable`]
/// (retry-eligible). The coordinator branches on those tags.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate free-form text for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with JSON-constrained output, returning the parsed value.
    async fn generate_json(&self, prompt: &str) -> Result<JsonValue>;

    /// The model name being used.
    fn model_name(&self) -> &str;
}

/// Comparable-sale lookup boundary to the county records source.
///
/// Errors from this boundary (unsupported county, missing credentials,
/// network failure) are never fatal to a pipeline run; callers treat any
/// of them as "no enrichment available".
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Recent comparable sales for a county, each with a derived
    /// price-per-acre. May be empty.
    async fn recent_sales(&self, county: &str) -> Result<Vec<ComparableSale>>;
}
