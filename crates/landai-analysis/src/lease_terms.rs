//! Structured lease-term extraction.
//!
//! One JSON-constrained prompt turns raw lease text into an
//! [`ExtractedLeaseTerms`] value. The prompt pins the exact field list,
//! demands null for anything not found, and demonstrates one fully worked
//! example including the lump-sum-to-per-acre derivation so the model
//! records derivations as notes instead of silently losing them.

use tracing::{debug, instrument};

use landai_core::{Error, ExtractedLeaseTerms, GenerationBackend, Result};
use landai_inference::RetryPolicy;

/// Build the extraction prompt for a lease's raw text.
pub fn extraction_prompt(lease_text: &str) -> String {
    format!(
        r#"You are a highly accurate data extraction bot for oil and gas leases.
Your sole purpose is to analyze the provided lease text and extract the specified fields.
Return ONLY a single, valid JSON object with exactly these keys in this exact order. Do not include any other text, explanation, or markdown formatting.

Here is the exact JSON schema to follow:
- "bonusPerAcre" (number | null): The bonus payment per acre as a plain number. If only a total bonus is given, calculate it by dividing the total by the acreage. If not found, return null.
- "royaltyRate" (string | null): The royalty rate as a fraction (e.g., "1/5", "3/16"). Normalize percentages to a fraction string.
- "primaryTermInYears" (number | null): The length of the primary lease term in years.
- "acreage" (number | null): The total number of acres.
- "effectiveDate" (string | null): The effective date in "YYYY-MM-DD" format.
- "county" (string | null): The county name mentioned in the lease. Find phrases like "situated in [County Name] County, State of Oklahoma".
- "notes" (string[]): An array of short notes for ambiguities or important context.

The JSON object must contain exactly these 7 keys in this order.

---
EXAMPLE:
Lease Text:
"This lease, dated January 1st 2025, covers 80 acres in Kingfisher County, Oklahoma, for a bonus of $40,000. Lessor shall receive a one-fourth (1/4) royalty for a term of three (3) years."
JSON Output:
{{
  "bonusPerAcre": 500,
  "royaltyRate": "1/4",
  "primaryTermInYears": 3,
  "acreage": 80,
  "effectiveDate": "2025-01-01",
  "county": "Kingfisher",
  "notes": ["Calculated bonusPerAcre from total bonus ($40,000 / 80 acres)."]
}}
---

Lease Text to Analyze:
---
{lease_text}
---"#
    )
}

/// Extract structured lease terms from document text using the AI model.
///
/// Rate-limit and transient-unavailability errors pass through untouched
/// so the coordinator can branch on them; everything else (including a
/// response that is not valid JSON or does not match the schema) becomes
/// [`Error::StructuredExtraction`].
#[instrument(skip_all, fields(subsystem = "analysis", component = "lease_terms", op = "extract"))]
pub async fn extract_lease_terms(
    backend: &dyn GenerationBackend,
    retry: &RetryPolicy,
    lease_text: &str,
) -> Result<ExtractedLeaseTerms> {
    if lease_text.trim().is_empty() {
        return Err(Error::StructuredExtraction(
            "Lease text is empty".to_string(),
        ));
    }

    let prompt = extraction_prompt(lease_text);
    let value = match retry.run(|| backend.generate_json(&prompt)).await {
        Ok(value) => value,
        Err(err @ (Error::RateLimited(_) | Error::Unavailable(_))) => return Err(err),
        Err(err) => {
            return Err(Error::StructuredExtraction(format!(
                "AI extraction failed: {}",
                err
            )))
        }
    };

    let terms: ExtractedLeaseTerms = serde_json::from_value(value).map_err(|e| {
        Error::StructuredExtraction(format!("Model returned an unexpected shape: {}", e))
    })?;

    debug!(
        bonus_found = terms.bonus_per_acre.is_some(),
        county_found = terms.county.is_some(),
        note_count = terms.notes.len(),
        "Structured extraction complete"
    );

    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use landai_core::GenerationBackend;
    use serde_json::Value as JsonValue;
    use std::sync::Mutex;

    /// Generation backend that replays canned results.
    struct CannedBackend {
        json_results: Mutex<Vec<Result<JsonValue>>>,
    }

    impl CannedBackend {
        fn with_json(results: Vec<Result<JsonValue>>) -> Self {
            Self {
                json_results: Mutex::new(results),
            }
        }
    }

    #[async_trait]
    impl GenerationBackend for CannedBackend {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(Error::Internal("not used".to_string()))
        }

        async fn generate_json(&self, _prompt: &str) -> Result<JsonValue> {
            self.json_results.lock().unwrap().remove(0)
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    fn valid_terms_json() -> JsonValue {
        serde_json::json!({
            "bonusPerAcre": 500,
            "royaltyRate": "1/4",
            "primaryTermInYears": 3,
            "acreage": 160,
            "effectiveDate": "2026-01-01",
            "county": "Kingfisher",
            "notes": ["Calculated bonusPerAcre from total bonus ($80,000 / 160 acres)."]
        })
    }

    #[test]
    fn test_prompt_pins_schema_and_embeds_text() {
        let prompt = extraction_prompt("LEASE BODY MARKER");
        for key in [
            "bonusPerAcre",
            "royaltyRate",
            "primaryTermInYears",
            "acreage",
            "effectiveDate",
            "county",
            "notes",
        ] {
            assert!(prompt.contains(key), "prompt missing key {key}");
        }
        assert!(prompt.contains("exactly these 7 keys"));
        assert!(prompt.contains("return null"));
        assert!(prompt.contains("LEASE BODY MARKER"));
        // The worked example demonstrates the lump-sum derivation.
        assert!(prompt.contains("$40,000 / 80 acres"));
    }

    #[tokio::test]
    async fn test_extracts_valid_terms() {
        let backend = CannedBackend::with_json(vec![Ok(valid_terms_json())]);
        let terms = extract_lease_terms(&backend, &RetryPolicy::none(), "lease text")
            .await
            .unwrap();
        assert_eq!(terms.bonus_per_acre, Some(500.0));
        assert_eq!(terms.acreage, Some(160.0));
        assert_eq!(terms.royalty_rate.as_deref(), Some("1/4"));
        assert_eq!(terms.primary_term_in_years, Some(3.0));
    }

    #[tokio::test]
    async fn test_schema_drift_is_structured_extraction_error() {
        let mut drifted = valid_terms_json();
        drifted["operatorName"] = serde_json::json!("Continental");
        let backend = CannedBackend::with_json(vec![Ok(drifted)]);

        let err = extract_lease_terms(&backend, &RetryPolicy::none(), "lease text")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StructuredExtraction(_)));
    }

    #[tokio::test]
    async fn test_quota_error_passes_through() {
        let backend =
            CannedBackend::with_json(vec![Err(Error::RateLimited("quota".to_string()))]);
        let err = extract_lease_terms(&backend, &RetryPolicy::none(), "lease text")
            .await
            .unwrap_err();
        assert!(err.is_quota());
    }

    #[tokio::test]
    async fn test_transient_error_retried_then_succeeds() {
        let backend = CannedBackend::with_json(vec![
            Err(Error::Unavailable("503".to_string())),
            Ok(valid_terms_json()),
        ]);
        let retry = RetryPolicy::new(2, std::time::Duration::from_millis(1));
        let terms = extract_lease_terms(&backend, &retry, "lease text")
            .await
            .unwrap();
        assert_eq!(terms.county.as_deref(), Some("Kingfisher"));
    }

    #[tokio::test]
    async fn test_empty_text_rejected_without_ai_call() {
        let backend = CannedBackend::with_json(vec![]);
        let err = extract_lease_terms(&backend, &RetryPolicy::none(), "  \n ")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StructuredExtraction(_)));
    }
}
