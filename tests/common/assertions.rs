//! Custom assertions for redaction testing.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use anyhow::Result;
use std::path::Path;

/// Extracts text from a PDF, returning an error instead of panicking.
pub fn extract_text(pdf_path: &Path) -> Result<String> {
    healthport::extract_text_from_pdf(pdf_path)
        .map_err(|e| anyhow::anyhow!("Failed to extract text: {}", e))
}

fn extract_text_or_panic(pdf_path: &Path) -> String {
    extract_text(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to extract text from '{}': {}", pdf_path.display(), e))
}

/// Asserts that a pattern has been removed from a PDF's text layer.
///
/// # Panics
/// Panics if the pattern is still found in the PDF text.
pub fn assert_redacted(pdf_path: &Path, pattern: &str) {
    let text = extract_text_or_panic(pdf_path);
    assert!(
        !text.contains(pattern),
        "Pattern '{}' should be redacted but was found in output PDF at '{}'.\nExtracted text length: {} chars",
        pattern,
        pdf_path.display(),
        text.len()
    );
}

/// Asserts that a pattern has been preserved (not redacted) in a PDF.
///
/// # Panics
/// Panics if the pattern is not found in the PDF.
pub fn assert_preserved(pdf_path: &Path, pattern: &str) {
    let text = extract_text_or_panic(pdf_path);
    assert!(
        text.contains(pattern),
        "Pattern '{}' should be preserved but was not found in PDF at '{}'",
        pattern,
        pdf_path.display()
    );
}

/// Asserts that multiple patterns are all redacted.
///
/// # Panics
/// Panics if any pattern is found in the PDF.
pub fn assert_all_redacted(pdf_path: &Path, patterns: &[&str]) {
    let text = extract_text_or_panic(pdf_path);
    let found: Vec<&str> = patterns
        .iter()
        .copied()
        .filter(|p| text.contains(p))
        .collect();

    assert!(
        found.is_empty(),
        "Patterns {:?} should be redacted but were found in '{}'",
        found,
        pdf_path.display()
    );
}

/// Asserts that the file is a structurally valid PDF.
pub fn assert_valid_pdf(pdf_path: &Path) {
    assert!(pdf_path.exists(), "PDF should exist at '{}'", pdf_path.display());
    assert!(
        lopdf::Document::load(pdf_path).is_ok(),
        "PDF at '{}' should load",
        pdf_path.display()
    );
}
