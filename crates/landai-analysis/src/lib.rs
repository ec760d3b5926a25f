//! # landai-analysis
//!
//! The LandAI document-to-report pipeline.
//!
//! Data flows strictly forward: PDF bytes → plain text → structured lease
//! terms → (+ optional market enrichment) → narrative report → persisted
//! chat messages. The [`DocumentPipeline`] coordinator owns sequencing,
//! the transaction boundary, and the partial-failure policy; the stage
//! modules are pure request/response transforms.
//!
//! - [`extract`]: in-memory PDF text extraction
//! - [`scan`]: regex quick scan feeding the confirmation message
//! - [`lease_terms`]: JSON-constrained structured extraction
//! - [`report`]: four-section narrative report generation
//! - [`pipeline`]: the transactional coordinator and its entrypoints

pub mod extract;
pub mod lease_terms;
pub mod pipeline;
pub mod report;
pub mod scan;

// Re-export core types and the retry policy callers configure the
// pipeline with
pub use landai_core::*;
pub use landai_inference::RetryPolicy;

pub use extract::extract_pdf_text;
pub use lease_terms::{extract_lease_terms, extraction_prompt};
pub use pipeline::{fallback_notice, DocumentPipeline};
pub use report::{analysis_prompt, generate_report, market_context_block};
pub use scan::{quick_summary, scan_lease_text, QuickScan};
