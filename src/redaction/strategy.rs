//! Redaction strategy trait and supporting types.
//!
//! This module defines the core abstraction for redaction strategies,
//! allowing for different implementations (secure, visual, etc.).

use crate::error::RedactorResult;
use regex::Regex;
use std::path::Path;

/// A class of text to be redacted from a document.
#[derive(Debug, Clone)]
pub enum RedactionTarget {
    /// Exact text match
    Literal(String),

    /// Regular expression pattern
    Regex(String),

    /// Fixed report header identifiers (scan time, sex, height, weight,
    /// dates, facility, study id, recipient)
    ClinicalIdentifiers,

    /// The patient's name, located from a `Patient:` line on an early page
    PatientName,
}

impl RedactionTarget {
    /// Targets applied to uploaded clinical reports.
    pub fn clinical_report() -> Vec<Self> {
        vec![Self::ClinicalIdentifiers, Self::PatientName]
    }
}

/// Statistics about a redaction operation.
#[derive(Debug, Clone, Default)]
pub struct RedactionResult {
    /// Number of instances redacted
    pub instances_redacted: usize,

    /// Pages processed
    pub pages_processed: usize,

    /// Pages with redactions
    pub pages_modified: usize,

    /// Whether text was physically removed (vs visually obscured)
    pub secure: bool,

    /// Whether a patient name was located and added to the pattern set
    pub patient_name_found: bool,
}

impl RedactionResult {
    /// Creates a result indicating no redactions were needed.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if any redactions were applied.
    pub fn has_redactions(&self) -> bool {
        self.instances_redacted > 0
    }
}

/// Strategy for redacting sensitive information from PDFs.
pub trait RedactionStrategy: Send + Sync {
    /// Redacts every match of `patterns` from a PDF document.
    ///
    /// Patterns are evaluated against each page's own text; every matched
    /// substring is then located on that page and covered.
    fn redact(
        &self,
        input: &Path,
        output: &Path,
        patterns: &[Regex],
    ) -> RedactorResult<RedactionResult>;

    /// Extracts text from a PDF, one string per page.
    fn extract_pages(&self, input: &Path) -> RedactorResult<Vec<String>>;

    /// Extracts the whole document's text.
    fn extract_text(&self, input: &Path) -> RedactorResult<String> {
        Ok(self.extract_pages(input)?.join("\n"))
    }

    /// Returns a human-readable name for this strategy.
    fn name(&self) -> &str;

    /// Returns whether this strategy provides secure (physical) deletion.
    fn is_secure(&self) -> bool;
}
