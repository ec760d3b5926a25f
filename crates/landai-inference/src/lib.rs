//! # landai-inference
//!
//! Generative-AI provider boundary for LandAI.
//!
//! This crate provides:
//! - [`GeminiBackend`], a [`landai_core::GenerationBackend`] over the
//!   Gemini REST API with free-form and JSON-constrained variants
//! - Typed HTTP-failure classification ([`GeminiErrorCode`]) so callers
//!   branch on error tags, never on message substrings
//! - [`RetryPolicy`], a pure bounded-backoff policy applied to transient
//!   unavailability only
//!
//! # Example
//!
//! ```rust,no_run
//! use landai_inference::{GeminiBackend, RetryPolicy};
//! use landai_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() -> landai_core::Result<()> {
//!     let backend = GeminiBackend::from_env()?;
//!     let retry = RetryPolicy::default();
//!     let report = retry.run(|| backend.generate("Summarize...")).await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod gemini;
pub mod retry;

// Re-export core types
pub use landai_core::*;

pub use error::{to_core_error, GeminiErrorCode};
pub use gemini::GeminiBackend;
pub use retry::RetryPolicy;
