//! Default values and tunable constants for the pipeline.
//!
//! Centralizing these keeps prompt builders, the market enricher, and the
//! coordinator in agreement about the assumptions baked into reports.

/// Default oil price assumption (USD per barrel) when no override is given.
pub const OIL_PRICE_USD: f64 = 75.0;

/// Default natural gas price assumption (USD per MMBtu).
pub const GAS_PRICE_USD: f64 = 2.75;

/// Default drilling cost assumption for a new horizontal well (USD).
pub const DRILLING_COST_USD: f64 = 10_000_000.0;

/// Standard bonus range quoted when no live comparables exist (USD/acre).
pub const STANDARD_BONUS_RANGE: (u32, u32) = (400, 800);

/// Standard royalty range quoted alongside market context.
pub const STANDARD_ROYALTY_RANGE: &str = "3/16 to 1/5";

/// Documentary stamp tax rate: dollars of fee per $1000 of sale price.
pub const DOC_STAMP_RATE_PER_THOUSAND: f64 = 1.5;

/// Acreage of one survey section (section/township/range grid).
pub const ACRES_PER_SECTION: f64 = 640.0;

/// How far back comparable-sale lookups reach.
pub const SALES_LOOKBACK_DAYS: i64 = 365;

/// Maximum AI call attempts (first try + retries) for transient failures.
pub const AI_MAX_ATTEMPTS: u32 = 3;

/// Base backoff delay between AI retries, doubled per attempt (milliseconds).
pub const AI_RETRY_BASE_DELAY_MS: u64 = 500;

/// Timeout for a single generation request (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Token budget for narrative report generation.
pub const REPORT_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Default generation model for the Gemini backend.
pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini API endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default county records API endpoint.
pub const COUNTY_RECORDS_BASE_URL: &str = "https://okcountyrecords.com";

/// The only MIME type the pipeline accepts.
pub const PDF_MIME: &str = "application/pdf";

/// Storage marker for documents processed from an in-memory buffer.
/// Uploads are never written to disk; extracted text and terms are
/// persisted instead.
pub const TRANSIENT_STORAGE: &str = "memory";
