//! Quick pattern-based term scan.
//!
//! A cheap, offline first pass over the extracted text that feeds the
//! upload confirmation message. It never replaces the AI extraction; it
//! gives the user immediate signal while the full report is produced in
//! the same request.

use once_cell::sync::Lazy;
use regex::Regex;

static BONUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\$\s*(\d+(?:,\d{3})*(?:\.\d{2})?)\s*(?:per acre|/acre)").unwrap(),
        Regex::new(r"(?i)bonus.*?\$\s*(\d+(?:,\d{3})*(?:\.\d{2})?)").unwrap(),
    ]
});

static ROYALTY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)royalty.*?(\d+/\d+)").unwrap(),
        Regex::new(r"(?i)royalty.*?(\d+(?:\.\d+)?%)").unwrap(),
        Regex::new(r"(?i)(\d+/\d+).*?royalty").unwrap(),
    ]
});

static ACREAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)containing\s*(\d+(?:\.\d+)?)\s*acres").unwrap(),
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*acres").unwrap(),
    ]
});

static PRIMARY_TERM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)primary term.*?(\d+)\s*years?").unwrap(),
        Regex::new(r"(?i)(\d+)\s*year.*?primary term").unwrap(),
        Regex::new(r"(?i)(?:three|four|five|six|seven|eight|nine|ten)\s*\((\d+)\)\s*years?")
            .unwrap(),
        Regex::new(r"(?i)term of.*?(\d+)\s*years?").unwrap(),
        Regex::new(r"(?i)lease.*?(\d+)\s*years?").unwrap(),
    ]
});

/// The red-flag clause categories the scan looks for. The AI report is
/// instructed to assess only these same categories, and only from the
/// supplied text.
static RED_FLAG_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)post.?production.*cost").unwrap(),
            "Broad post-production cost language",
        ),
        (
            Regex::new(r"(?i)shut.?in.*royalty").unwrap(),
            "Shut-in royalty provisions",
        ),
        (
            Regex::new(r"(?i)force.*pool").unwrap(),
            "Forced pooling language",
        ),
        (
            Regex::new(r"(?i)depth.*sever").unwrap(),
            "Depth severance clause",
        ),
    ]
});

/// Result of the quick pattern scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuickScan {
    pub bonus: Option<String>,
    pub royalty: Option<String>,
    pub acreage: Option<String>,
    pub primary_term: Option<String>,
    pub red_flags: Vec<String>,
}

impl QuickScan {
    pub fn found_any_term(&self) -> bool {
        self.bonus.is_some()
            || self.royalty.is_some()
            || self.acreage.is_some()
            || self.primary_term.is_some()
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    for pattern in patterns {
        if let Some(caps) = pattern.captures(text) {
            if let Some(m) = caps.get(1) {
                return Some(m.as_str().to_string());
            }
        }
    }
    None
}

/// Scan lease text for headline terms and red-flag clauses.
pub fn scan_lease_text(text: &str) -> QuickScan {
    QuickScan {
        bonus: first_capture(&BONUS_PATTERNS, text).map(|v| format!("${}/acre", v)),
        royalty: first_capture(&ROYALTY_PATTERNS, text),
        acreage: first_capture(&ACREAGE_PATTERNS, text).map(|v| format!("{} acres", v)),
        primary_term: first_capture(&PRIMARY_TERM_PATTERNS, text).map(|v| format!("{} years", v)),
        red_flags: RED_FLAG_PATTERNS
            .iter()
            .filter(|(pattern, _)| pattern.is_match(text))
            .map(|(_, flag)| flag.to_string())
            .collect(),
    }
}

/// Render the confirmation message shown as soon as a file is received.
pub fn quick_summary(filename: &str, scan: &QuickScan) -> String {
    let mut summary = format!("📋 **{}** received.\n\n**Quick term scan**\n\n", filename);

    if let Some(bonus) = &scan.bonus {
        summary.push_str(&format!("• **Bonus**: {}\n", bonus));
    }
    if let Some(royalty) = &scan.royalty {
        summary.push_str(&format!("• **Royalty**: {}\n", royalty));
    }
    if let Some(acreage) = &scan.acreage {
        summary.push_str(&format!("• **Acreage**: {}\n", acreage));
    }
    if let Some(term) = &scan.primary_term {
        summary.push_str(&format!("• **Primary Term**: {}\n", term));
    }

    if !scan.red_flags.is_empty() {
        summary.push_str("\n⚠️ **Possible red flags**:\n");
        for flag in &scan.red_flags {
            summary.push_str(&format!("• {}\n", flag));
        }
    }

    if !scan.found_any_term() {
        summary.push_str(
            "No standard lease terms detected. This may be a complex document requiring manual review.\n",
        );
    }

    summary.push_str("\nFull analysis follows below.");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "This Oil and Gas Lease, made effective January 1, 2026, covers \
        160 acres situated in Kingfisher County, Oklahoma. Lessor shall receive a bonus of \
        $80,000 and a 1/4 royalty for a primary term of three (3) years. Lessee may deduct \
        post-production costs from royalties and shall pay an annual shut-in royalty in lieu \
        of production.";

    #[test]
    fn test_scan_finds_headline_terms() {
        let scan = scan_lease_text(SAMPLE);
        assert_eq!(scan.acreage.as_deref(), Some("160 acres"));
        assert_eq!(scan.royalty.as_deref(), Some("1/4"));
        assert_eq!(scan.primary_term.as_deref(), Some("3 years"));
        assert_eq!(scan.bonus.as_deref(), Some("$80,000/acre"));
    }

    #[test]
    fn test_scan_per_acre_bonus_preferred() {
        let scan = scan_lease_text("a bonus consideration of $500 per acre is payable");
        assert_eq!(scan.bonus.as_deref(), Some("$500/acre"));
    }

    #[test]
    fn test_scan_percentage_royalty() {
        let scan = scan_lease_text("Lessor reserves a royalty of 20% of gross proceeds");
        assert_eq!(scan.royalty.as_deref(), Some("20%"));
    }

    #[test]
    fn test_scan_flags_red_flag_clauses() {
        let scan = scan_lease_text(SAMPLE);
        assert!(scan
            .red_flags
            .contains(&"Broad post-production cost language".to_string()));
        assert!(scan
            .red_flags
            .contains(&"Shut-in royalty provisions".to_string()));
        assert_eq!(scan.red_flags.len(), 2);
    }

    #[test]
    fn test_scan_clean_text_has_no_flags() {
        let scan = scan_lease_text("A plain surface-use agreement for 40 acres.");
        assert!(scan.red_flags.is_empty());
    }

    #[test]
    fn test_summary_lists_found_terms() {
        let summary = quick_summary("lease.pdf", &scan_lease_text(SAMPLE));
        assert!(summary.contains("lease.pdf"));
        assert!(summary.contains("**Royalty**: 1/4"));
        assert!(summary.contains("red flags"));
    }

    #[test]
    fn test_summary_for_unrecognized_document() {
        let summary = quick_summary("scan.pdf", &scan_lease_text("An unrelated memo."));
        assert!(summary.contains("No standard lease terms detected"));
    }
}
