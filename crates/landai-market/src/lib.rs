//! # landai-market
//!
//! Market-data provider boundary for LandAI.
//!
//! Looks up recent comparable land transactions for a county and derives a
//! price-per-acre from documentary stamp fees. Every failure here is
//! non-fatal by contract: the pipeline coordinator treats any error as
//! "no enrichment available" and proceeds on standard assumptions.

pub mod counties;
pub mod county_records;

// Re-export core types
pub use landai_core::*;

pub use counties::{is_supported, SUPPORTED_COUNTIES};
pub use county_records::{
    net_mineral_acres, price_per_acre, CountyRecordsClient, DeedRecord, LegalDescription,
    SOURCE_TAG,
};
