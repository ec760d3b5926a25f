//! County records client: deed lookups and price-per-acre derivation.
//!
//! The records source does not report sale prices directly. It reports the
//! documentary stamp fee on each recorded transfer, and the stamp tax is
//! proportional to sale price, so the implied total is backed out as
//! `fee / rate * 1000` and divided by net mineral acres derived from the
//! deed's legal descriptions.

use std::collections::HashSet;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use landai_core::{
    defaults, ComparableSale, Error, MarketDataProvider, Result,
};

use crate::counties::is_supported;

/// Provenance tag attached to every record returned by this client.
pub const SOURCE_TAG: &str = "OKCountyRecords API";

/// Deed types relevant to mineral-rights comparables.
const RELEVANT_DEED_TYPES: &str = "DEED|WARRANTY DEED|MINERAL DEED|JOINT TENANT WARRANTY DEED";

/// HTTP client for the county records search API.
pub struct CountyRecordsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CountyRecordsClient {
    /// Create a client with an explicit endpoint and credential.
    ///
    /// `api_key: None` builds a client whose lookups fail with
    /// [`Error::Config`]; callers treat that as enrichment-unavailable.
    pub fn with_config(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Create from environment variables (`OKCOUNTYRECORDS_API_KEY`).
    pub fn from_env() -> Self {
        Self::with_config(
            std::env::var("OKCOUNTYRECORDS_BASE_URL")
                .unwrap_or_else(|_| defaults::COUNTY_RECORDS_BASE_URL.to_string()),
            std::env::var("OKCOUNTYRECORDS_API_KEY").ok(),
        )
    }
}

/// One raw transaction record from the search API.
#[derive(Debug, Clone, Deserialize)]
pub struct DeedRecord {
    #[serde(default)]
    pub document_stamp_fees_in_cents: Option<i64>,
    #[serde(default)]
    pub indexed_date: Option<String>,
    #[serde(default)]
    pub legal_descriptions: Option<Vec<LegalDescription>>,
}

/// Section/township/range coordinates from a deed's legal description.
/// The API is inconsistent about numbers vs. strings, so coordinates are
/// kept raw and stringified when building tuple keys.
#[derive(Debug, Clone, Deserialize)]
pub struct LegalDescription {
    #[serde(default)]
    pub section: Option<JsonValue>,
    #[serde(default)]
    pub township: Option<JsonValue>,
    #[serde(default)]
    pub range: Option<JsonValue>,
}

fn coordinate(value: &Option<JsonValue>) -> Option<String> {
    match value {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Net mineral acres implied by a deed's legal descriptions: one full
/// section (640 acres) per unique section/township/range tuple.
pub fn net_mineral_acres(descriptions: &[LegalDescription]) -> Option<f64> {
    let mut sections = HashSet::new();
    for desc in descriptions {
        if let (Some(s), Some(t), Some(r)) = (
            coordinate(&desc.section),
            coordinate(&desc.township),
            coordinate(&desc.range),
        ) {
            sections.insert(format!("S{}-T{}-R{}", s, t, r));
        }
    }
    if sections.is_empty() {
        None
    } else {
        Some(sections.len() as f64 * defaults::ACRES_PER_SECTION)
    }
}

/// Implied price per acre from a documentary stamp fee.
///
/// `(fee / 1.5) * 1000 / acres`, rounded to cents. Returns None when the
/// fee or acreage makes the computation meaningless; such records are
/// dropped, never returned with a zero or infinite price.
pub fn price_per_acre(doc_stamps_dollars: f64, net_mineral_acres: f64) -> Option<f64> {
    if doc_stamps_dollars <= 0.0 || net_mineral_acres <= 0.0 {
        return None;
    }
    let implied_total =
        doc_stamps_dollars / defaults::DOC_STAMP_RATE_PER_THOUSAND * 1000.0;
    let price = implied_total / net_mineral_acres;
    Some((price * 100.0).round() / 100.0)
}

/// Convert one raw record into a comparable sale, or None when pricing
/// cannot be derived.
fn to_comparable_sale(county: &str, record: &DeedRecord) -> Option<ComparableSale> {
    let doc_stamps = record.document_stamp_fees_in_cents.unwrap_or(0) as f64 / 100.0;
    let acres = record
        .legal_descriptions
        .as_deref()
        .and_then(net_mineral_acres)?;
    let price = price_per_acre(doc_stamps, acres)?;

    Some(ComparableSale {
        county: county.to_string(),
        transaction_date: record.indexed_date.clone().unwrap_or_default(),
        doc_stamps,
        net_mineral_acres: acres,
        price_per_acre: price,
        source: SOURCE_TAG.to_string(),
    })
}

fn lookback_start_date() -> String {
    let start = chrono::Utc::now() - chrono::Duration::days(defaults::SALES_LOOKBACK_DAYS);
    start.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl MarketDataProvider for CountyRecordsClient {
    async fn recent_sales(&self, county: &str) -> Result<Vec<ComparableSale>> {
        let upper = county.trim().to_uppercase();
        if !is_supported(&upper) {
            return Err(Error::UnsupportedCounty(county.to_string()));
        }

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Config("County records API key is not configured".to_string())
        })?;

        let start = Instant::now();
        debug!(
            subsystem = "market",
            component = "county_records",
            op = "recent_sales",
            county = %upper,
            "Fetching relevant deeds"
        );

        let response = self
            .client
            .get(format!("{}/api/v1/search", self.base_url))
            .query(&[
                ("county", upper.as_str()),
                ("type", RELEVANT_DEED_TYPES),
                ("indexed_date_start", lookback_start_date().as_str()),
            ])
            .basic_auth(api_key, Some("x"))
            .send()
            .await
            .map_err(|e| Error::Request(format!("County records request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                subsystem = "market",
                component = "county_records",
                county = %upper,
                status = status.as_u16(),
                "County records lookup failed"
            );
            return Err(Error::Request(format!(
                "County records returned {}: {}",
                status, body
            )));
        }

        let records: Vec<DeedRecord> = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Unexpected records payload: {}", e)))?;

        let total = records.len();
        let sales: Vec<ComparableSale> = records
            .iter()
            .filter_map(|r| to_comparable_sale(&upper, r))
            .collect();

        info!(
            subsystem = "market",
            component = "county_records",
            op = "recent_sales",
            county = %upper,
            fetched = total,
            result_count = sales.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Deed lookup complete"
        );

        Ok(sales)
    }
}
