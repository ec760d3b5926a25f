//! Core data models for the LandAI lease-analysis pipeline.
//!
//! These types are shared across all landai crates and represent the
//! domain entities the coordinator sequences and persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::defaults;

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// An uploaded lease document.
///
/// `full_text` and `extracted_data` are written together by a single update
/// after successful extraction; a row with one and not the other indicates a
/// partially-failed pipeline and must not be used as analysis input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub conversation_id: Uuid,
    pub filename: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    /// Where the raw upload lives. Always [`defaults::TRANSIENT_STORAGE`]
    /// for in-memory processing; kept as a column for forward compatibility.
    pub storage_location: String,
    pub full_text: Option<String>,
    pub extracted_data: Option<ExtractedLeaseTerms>,
    pub upload_date: DateTime<Utc>,
}

impl Document {
    /// True when the initial pipeline persisted both text and terms.
    pub fn has_complete_extraction(&self) -> bool {
        self.full_text.is_some() && self.extracted_data.is_some()
    }
}

/// Metadata for a new document row, inserted before any AI call runs.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub conversation_id: Uuid,
    pub filename: String,
    pub file_type: String,
    pub file_size: i64,
}

/// Listing row for a user's uploaded documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub filename: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub upload_date: DateTime<Utc>,
}

// =============================================================================
// EXTRACTED LEASE TERMS
// =============================================================================

/// Structured lease terms extracted by the AI model.
///
/// Exactly this field set, camelCase on the wire; unknown keys are rejected
/// so a drifting model response fails extraction instead of silently
/// widening the schema. Ambiguous values are null, never invented; the
/// extractor records derivations and ambiguities in `notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExtractedLeaseTerms {
    /// Bonus payment per acre (USD). Derived from a lump sum when needed.
    pub bonus_per_acre: Option<f64>,
    /// Royalty as a fraction string, e.g. "1/4" or "3/16".
    pub royalty_rate: Option<String>,
    pub primary_term_in_years: Option<f64>,
    pub acreage: Option<f64>,
    /// ISO date string, "YYYY-MM-DD".
    pub effective_date: Option<String>,
    pub county: Option<String>,
    /// Ambiguities and derivations flagged by the extractor, in order.
    #[serde(default)]
    pub notes: Vec<String>,
}

// =============================================================================
// MARKET CONTEXT
// =============================================================================

/// One comparable land transaction with a derived price-per-acre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableSale {
    pub county: String,
    /// Recording date as reported by the source.
    pub transaction_date: String,
    /// Documentary stamp fee in dollars.
    pub doc_stamps: f64,
    /// Acres derived from unique section/township/range tuples.
    pub net_mineral_acres: f64,
    pub price_per_acre: f64,
    /// Provenance tag for the record.
    pub source: String,
}

/// Market assumptions a report is generated against.
///
/// Ephemeral: never persisted on its own, only folded into the analysis
/// message's `context_data`. `recent_sales` is present only when a live
/// lookup succeeded with at least one usable record; its absence means the
/// standard static assumptions apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    pub oil_price: f64,
    pub gas_price: f64,
    pub drilling_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_sales: Option<Vec<ComparableSale>>,
}

impl MarketContext {
    /// Standard static assumptions used when enrichment is unavailable.
    pub fn standard() -> Self {
        Self {
            oil_price: defaults::OIL_PRICE_USD,
            gas_price: defaults::GAS_PRICE_USD,
            drilling_cost: defaults::DRILLING_COST_USD,
            recent_sales: None,
        }
    }

    /// Fold live comparables into the context. An empty list leaves
    /// `recent_sales` absent so callers fall back to standard assumptions.
    pub fn with_sales(mut self, sales: Vec<ComparableSale>) -> Self {
        self.recent_sales = if sales.is_empty() { None } else { Some(sales) };
        self
    }

    /// Mean price-per-acre across live comparables, if any.
    pub fn average_price_per_acre(&self) -> Option<f64> {
        let sales = self.recent_sales.as_deref()?;
        if sales.is_empty() {
            return None;
        }
        let sum: f64 = sales.iter().map(|s| s.price_per_acre).sum();
        Some(sum / sales.len() as f64)
    }
}

impl Default for MarketContext {
    fn default() -> Self {
        Self::standard()
    }
}

/// Caller-supplied market overrides for re-analysis.
///
/// Only these three keys are honored; anything else in the request object
/// is ignored. Each value must be a positive number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverrides {
    pub oil_price: Option<f64>,
    pub gas_price: Option<f64>,
    pub drilling_cost: Option<f64>,
}

impl MarketOverrides {
    /// Reject non-positive or non-finite overrides before any external call.
    pub fn validate(&self) -> crate::Result<()> {
        for (name, value) in [
            ("oilPrice", self.oil_price),
            ("gasPrice", self.gas_price),
            ("drillingCost", self.drilling_cost),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(crate::Error::InvalidInput(format!(
                        "{} must be a positive number",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Apply overrides on top of `context`. User values always win over
    /// defaults; absent overrides change nothing. Enrichment data is
    /// additive and never touches these numeric assumptions.
    pub fn apply(&self, context: &mut MarketContext) {
        if let Some(v) = self.oil_price {
            context.oil_price = v;
        }
        if let Some(v) = self.gas_price {
            context.gas_price = v;
        }
        if let Some(v) = self.drilling_cost {
            context.drilling_cost = v;
        }
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Which pipeline stage/outcome produced a persisted assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Successful full analysis report.
    LandAnalyzerPro,
    /// Short "file received" confirmation with the quick term scan.
    SystemConfirmation,
    /// Analysis deferred (rate-limited); document saved, retry suggested.
    SystemFallback,
    /// Analysis failed for a non-quota reason; document saved.
    SystemError,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::LandAnalyzerPro => "land_analyzer_pro",
            AgentType::SystemConfirmation => "system_confirmation",
            AgentType::SystemFallback => "system_fallback",
            AgentType::SystemError => "system_error",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "land_analyzer_pro" => Ok(AgentType::LandAnalyzerPro),
            "system_confirmation" => Ok(AgentType::SystemConfirmation),
            "system_fallback" => Ok(AgentType::SystemFallback),
            "system_error" => Ok(AgentType::SystemError),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown agent type: {}",
                other
            ))),
        }
    }
}

/// A new chat message produced by the pipeline.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub role_id: Uuid,
    pub content: String,
    pub agent_type: Option<AgentType>,
    /// Back-reference to the analyzed document; None for pure system notices.
    pub document_id: Option<Uuid>,
    /// The market context the report was generated against.
    pub context_data: Option<MarketContext>,
}

/// A persisted chat message. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role_id: Option<Uuid>,
    pub content: String,
    pub agent_type: Option<AgentType>,
    pub document_id: Option<Uuid>,
    pub context_data: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// PIPELINE ENTRYPOINT TYPES
// =============================================================================

/// Input to the upload entrypoint: the raw file plus its declared metadata.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub user_id: Uuid,
    pub conversation_id: Uuid,
    pub filename: String,
    /// Declared MIME type; must indicate PDF or the pipeline never starts.
    pub file_type: String,
    pub data: Vec<u8>,
}

/// Outcome of an upload: the committed document row plus the chat messages
/// the run produced (confirmation + analysis on success, a single fallback
/// notice otherwise).
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub document: Document,
    pub messages: Vec<Message>,
}
