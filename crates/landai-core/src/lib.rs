//! # landai-core
//!
//! Core types, traits, and abstractions for the LandAI lease-analysis
//! pipeline.
//!
//! This crate provides:
//! - The shared error taxonomy the coordinator branches on
//! - Domain models (documents, extracted lease terms, market context,
//!   chat messages)
//! - Collaborator traits for the AI provider and market-data boundaries
//! - Default assumptions and tunable constants

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
pub use models::{
    AgentType, ComparableSale, Document, DocumentSummary, ExtractedLeaseTerms, MarketContext,
    MarketOverrides, Message, NewDocument, NewMessage, UploadOutcome, UploadRequest,
};
pub use traits::{GenerationBackend, MarketDataProvider};
