//! PDF text extraction.
//!
//! A pure transform over the uploaded bytes: no temp files, no external
//! binaries. Extraction is atomic: if the stream is not a parseable PDF
//! or any single page fails to decode, the whole operation fails and no
//! partial text leaves this module.

use tracing::debug;

use landai_core::{Error, Result};

/// Extract the visible text of every page, in page order.
///
/// Pages are separated by a newline; leading/trailing whitespace of the
/// final result is trimmed.
pub fn extract_pdf_text(data: &[u8]) -> Result<String> {
    if data.is_empty() {
        return Err(Error::Extraction("Uploaded document is empty".to_string()));
    }

    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::Extraction(
            "Not a valid PDF (missing %PDF header)".to_string(),
        ));
    }

    let document = lopdf::Document::load_mem(data)
        .map_err(|e| Error::Extraction(format!("Failed to parse PDF: {}", e)))?;

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(Error::Extraction("PDF contains no pages".to_string()));
    }

    let mut page_texts = Vec::with_capacity(pages.len());
    for &page_number in pages.keys() {
        let text = document.extract_text(&[page_number]).map_err(|e| {
            Error::Extraction(format!("Failed to decode page {}: {}", page_number, e))
        })?;
        page_texts.push(text);
    }

    let full_text = page_texts.join("\n").trim().to_string();
    debug!(
        subsystem = "analysis",
        component = "extract",
        op = "extract_pdf_text",
        page_count = page_texts.len(),
        text_len = full_text.len(),
        "PDF extraction complete"
    );

    Ok(full_text)
}


#[cfg(test)]
mod tests {
    use super::test_pdf::pdf_with_pages;
    use super::*;

    #[test]
    fn test_extracts_single_page_text() {
        let pdf = pdf_with_pages(&["This lease covers 160 acres in Kingfisher County."]);
        let text = extract_pdf_text(&pdf).unwrap();
        assert!(text.contains("160 acres"));
        assert!(text.contains("Kingfisher County"));
    }

    #[test]
    fn test_pages_in_order_separated_by_newline() {
        let pdf = pdf_with_pages(&["Page one terms.", "Page two terms."]);
        let text = extract_pdf_text(&pdf).unwrap();

        let first = text.find("Page one").expect("first page text present");
        let second = text.find("Page two").expect("second page text present");
        assert!(first < second);
        assert!(text[first..second].contains('\n'));
    }

    #[test]
    fn test_result_is_trimmed() {
        let pdf = pdf_with_pages(&["Trimmed."]);
        let text = extract_pdf_text(&pdf).unwrap();
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_empty_payload_rejected() {
        let err = extract_pdf_text(&[]).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_non_pdf_bytes_rejected() {
        let err = extract_pdf_text(b"MZ\x90\x00 definitely not a pdf").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_truncated_pdf_fails_atomically() {
        let mut pdf = pdf_with_pages(&["Full document."]);
        pdf.truncate(pdf.len() / 2);
        // Either the parse or the page decode fails; no partial text.
        assert!(extract_pdf_text(&pdf).is_err());
    }
}
