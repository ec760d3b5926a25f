//! Narrative report generation.
//!
//! One prompt combines the structured terms, the full lease text, and a
//! market-context block into a four-section report. The section labels may
//! evolve, but the four-part structure and ordering are a contract with
//! the chat UI and must not change.

use tracing::{debug, instrument};

use landai_core::{
    defaults, Error, ExtractedLeaseTerms, GenerationBackend, MarketContext, Result,
};
use landai_inference::RetryPolicy;

/// Render the market-context block of the analysis prompt.
///
/// With live comparables, the block quotes the mean price-per-acre across
/// them; otherwise it quotes the standard static ranges. The numeric
/// assumptions (possibly user-overridden) are always included.
pub fn market_context_block(context: &MarketContext) -> String {
    let mut block = match context.average_price_per_acre() {
        Some(average) => {
            let sales = context.recent_sales.as_deref().unwrap_or_default();
            format!(
                "- Live County Average Price/Acre: ${:.2} (based on {} recent sales)\n- Standard Royalty: {}\n",
                average,
                sales.len(),
                defaults::STANDARD_ROYALTY_RANGE,
            )
        }
        None => format!(
            "- Standard Bonus: ${} - ${} per acre\n- Standard Royalty: {}\n",
            defaults::STANDARD_BONUS_RANGE.0,
            defaults::STANDARD_BONUS_RANGE.1,
            defaults::STANDARD_ROYALTY_RANGE,
        ),
    };

    block.push_str(&format!(
        "- Oil Price Assumption: ${:.2}/bbl\n- Gas Price Assumption: ${:.2}/MMBtu\n- Drilling Cost Assumption: ${:.0}",
        context.oil_price, context.gas_price, context.drilling_cost,
    ));
    block
}

/// Build the master prompt for a comprehensive lease analysis.
pub fn analysis_prompt(
    lease_text: &str,
    terms: &ExtractedLeaseTerms,
    context: &MarketContext,
) -> String {
    let terms_json =
        serde_json::to_string_pretty(terms).expect("lease terms serialize to JSON");
    let market_block = market_context_block(context);

    format!(
        r#"You are LandAI, an expert land acquisition analyst specializing in oil and gas leases in Oklahoma.
Your task is to analyze the lease document below using the provided extracted key terms and current market context. Based on these inputs, generate a professional four-part report to guide decision-making.

**Extracted Key Terms (JSON format):**
---
{terms_json}
---

**Full Lease Document Text (for context and risk analysis):**
---
{lease_text}
---

**Current Market Context for Oklahoma:**
---
{market_block}
---

Generate a complete report with the following four sections in this exact order. Keep each section concise but thorough (2-4 paragraphs each). Use Markdown for formatting.

**1. 📋 MARKET ANALYSIS:**
Compare the lease's bonus and royalty terms to the provided market context. If live data is available, state whether the bonus is above, below, or in line with the live average. If not, use the standard rates. Classify the terms as strong, average, or weak based on this comparison.

**2. 💰 FINANCIAL PROJECTION:**
Calculate a simple break-even oil price required for a new well to be profitable, using the provided oil price, gas price, and drilling cost assumptions. Crucially, explain how the lease's specific royalty rate financially impacts this break-even point compared to a standard royalty.

**3. ⚠️ RISK ASSESSMENT:**
Rate the overall risk level (Low/Medium/High) and analyze the full lease text for unfavorable clauses ("red flags"). Only refer to risks explicitly found in the lease text; never invent clauses that are not present. Look specifically for language related to post-production cost deductions, shut-in royalty provisions, forced pooling, and depth severance clauses. Explain their possible financial impact.

**4. 🎯 RECOMMENDATION:**
Provide a clear, actionable recommendation with a confidence level (High/Medium/Low). Choose one: "ACCEPT AS-IS", "NEGOTIATE BEFORE SIGNING", or "REJECT". Justify your choice. If negotiation is recommended, list the top 2-3 specific clauses to revise and suggest improved language or terms for each."#
    )
}

/// Generate the four-section analysis report.
///
/// Empty lease text is a precondition violation and fails immediately,
/// before any AI call. Rate-limit and transient errors pass through for
/// the coordinator to classify; other provider failures become
/// [`Error::ReportGeneration`].
#[instrument(skip_all, fields(subsystem = "analysis", component = "report", op = "generate"))]
pub async fn generate_report(
    backend: &dyn GenerationBackend,
    retry: &RetryPolicy,
    lease_text: &str,
    terms: &ExtractedLeaseTerms,
    context: &MarketContext,
) -> Result<String> {
    if lease_text.trim().is_empty() {
        return Err(Error::ReportGeneration(
            "Lease text, extracted terms, and market context are required".to_string(),
        ));
    }

    let prompt = analysis_prompt(lease_text, terms, context);
    let report = match retry.run(|| backend.generate(&prompt)).await {
        Ok(report) => report,
        Err(err @ (Error::RateLimited(_) | Error::Unavailable(_))) => return Err(err),
        Err(err) => {
            return Err(Error::ReportGeneration(format!(
                "AI analysis failed: {}",
                err
            )))
        }
    };

    debug!(
        live_context = context.recent_sales.is_some(),
        response_len = report.len(),
        "Report generation complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use landai_core::ComparableSale;
    use serde_json::Value as JsonValue;

    struct FixedBackend {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl GenerationBackend for FixedBackend {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(Error::Internal("unexpected AI call".to_string())),
            }
        }

        async fn generate_json(&self, _prompt: &str) -> Result<JsonValue> {
            Err(Error::Internal("not used".to_string()))
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn terms() -> ExtractedLeaseTerms {
        ExtractedLeaseTerms {
            bonus_per_acre: Some(500.0),
            royalty_rate: Some("1/4".to_string()),
            primary_term_in_years: Some(3.0),
            acreage: Some(160.0),
            effective_date: Some("2026-01-01".to_string()),
            county: Some("Kingfisher".to_string()),
            notes: vec![],
        }
    }

    fn sale(price: f64) -> ComparableSale {
        ComparableSale {
            county: "KINGFISHER".to_string(),
            transaction_date: "2026-03-01".to_string(),
            doc_stamps: 900.0,
            net_mineral_acres: 640.0,
            price_per_acre: price,
            source: "OKCountyRecords API".to_string(),
        }
    }

    #[test]
    fn test_prompt_has_four_sections_in_order() {
        let prompt = analysis_prompt("lease body", &terms(), &MarketContext::standard());
        let market = prompt.find("MARKET ANALYSIS").unwrap();
        let financial = prompt.find("FINANCIAL PROJECTION").unwrap();
        let risk = prompt.find("RISK ASSESSMENT").unwrap();
        let recommendation = prompt.find("RECOMMENDATION").unwrap();
        assert!(market < financial && financial < risk && risk < recommendation);
    }

    #[test]
    fn test_prompt_embeds_terms_and_text() {
        let prompt = analysis_prompt("UNIQUE LEASE MARKER", &terms(), &MarketContext::standard());
        assert!(prompt.contains("UNIQUE LEASE MARKER"));
        assert!(prompt.contains("\"bonusPerAcre\": 500.0"));
        assert!(prompt.contains("\"royaltyRate\": \"1/4\""));
    }

    #[test]
    fn test_prompt_restricts_risk_scan_to_supplied_text() {
        let prompt = analysis_prompt("lease body", &terms(), &MarketContext::standard());
        assert!(prompt.contains("Only refer to risks explicitly found in the lease text"));
        assert!(prompt.contains("post-production cost"));
        assert!(prompt.contains("shut-in royalty"));
        assert!(prompt.contains("forced pooling"));
        assert!(prompt.contains("depth severance"));
    }

    #[test]
    fn test_prompt_offers_three_verdicts() {
        let prompt = analysis_prompt("lease body", &terms(), &MarketContext::standard());
        assert!(prompt.contains("ACCEPT AS-IS"));
        assert!(prompt.contains("NEGOTIATE BEFORE SIGNING"));
        assert!(prompt.contains("REJECT"));
    }

    #[test]
    fn test_standard_block_quotes_static_ranges() {
        let block = market_context_block(&MarketContext::standard());
        assert!(block.contains("Standard Bonus: $400 - $800 per acre"));
        assert!(block.contains("3/16 to 1/5"));
        assert!(!block.contains("Live County Average"));
    }

    #[test]
    fn test_live_block_quotes_mean_price() {
        let context = MarketContext::standard().with_sales(vec![sale(400.0), sale(600.0)]);
        let block = market_context_block(&context);
        assert!(block.contains("Live County Average Price/Acre: $500.00"));
        assert!(block.contains("based on 2 recent sales"));
        assert!(!block.contains("Standard Bonus"));
    }

    #[test]
    fn test_block_reflects_overridden_assumptions() {
        let mut context = MarketContext::standard();
        context.oil_price = 90.0;
        let block = market_context_block(&context);
        assert!(block.contains("$90.00/bbl"));
        assert!(block.contains("$2.75/MMBtu"));
    }

    #[tokio::test]
    async fn test_empty_lease_text_fails_before_ai_call() {
        let backend = FixedBackend { reply: None };
        let err = generate_report(
            &backend,
            &RetryPolicy::none(),
            " ",
            &terms(),
            &MarketContext::standard(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::ReportGeneration(_)));
    }

    #[tokio::test]
    async fn test_successful_generation_returns_report() {
        let backend = FixedBackend {
            reply: Some("## MARKET ANALYSIS\n..."),
        };
        let report = generate_report(
            &backend,
            &RetryPolicy::none(),
            "lease body",
            &terms(),
            &MarketContext::standard(),
        )
        .await
        .unwrap();
        assert!(report.contains("MARKET ANALYSIS"));
    }
}
