//! Per-document redaction state.

use super::strategy::RedactionTarget;
use crate::domain::{ClinicalIdentifierPatterns, PatientNameMatcher, PatternMatcher};
use crate::error::{RedactorError, RedactorResult};
use regex::Regex;

/// Number of leading pages searched for the patient's name.
pub const PATIENT_SCAN_PAGES: usize = 3;

/// One uploaded document moving through redaction.
///
/// A job owns the input bytes, the patient name derived from them, the
/// resolved pattern set, and eventually the output bytes. It is never
/// written anywhere while in progress.
#[derive(Debug)]
pub struct RedactionJob {
    input: Vec<u8>,
    patient_name: Option<String>,
    patterns: Vec<Regex>,
    output: Option<Vec<u8>>,
}

impl RedactionJob {
    pub fn new(input: Vec<u8>) -> Self {
        Self {
            input,
            patient_name: None,
            patterns: Vec::new(),
            output: None,
        }
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    pub fn patient_name(&self) -> Option<&str> {
        self.patient_name.as_deref()
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    pub fn output(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    /// Builds the ordered pattern set for `targets` from the document's page
    /// texts. A missing patient name is not an error.
    pub fn resolve(&mut self, targets: &[RedactionTarget], pages: &[String]) -> RedactorResult<()> {
        let mut patterns = Vec::new();

        for target in targets {
            match target {
                RedactionTarget::Literal(text) => {
                    patterns.push(compile(&regex::escape(text))?);
                }
                RedactionTarget::Regex(source) => {
                    patterns.push(compile(source)?);
                }
                RedactionTarget::ClinicalIdentifiers => {
                    patterns.extend(ClinicalIdentifierPatterns::all().iter().cloned());
                }
                RedactionTarget::PatientName => {
                    let matcher = PatientNameMatcher::new();
                    let scanned = &pages[..pages.len().min(PATIENT_SCAN_PAGES)];
                    if let Some(name) = matcher.find_in_pages(scanned) {
                        for variant in matcher.generate_variants(&name) {
                            patterns.push(compile(&regex::escape(&variant))?);
                        }
                        self.patient_name = Some(name);
                    } else {
                        tracing::debug!("No patient name in first {} pages", PATIENT_SCAN_PAGES);
                    }
                }
            }
        }

        self.patterns = patterns;
        Ok(())
    }

    /// Stores the redacted document.
    pub fn complete(&mut self, output: Vec<u8>) {
        self.output = Some(output);
    }

    pub fn into_output(self) -> Option<Vec<u8>> {
        self.output
    }
}

fn compile(source: &str) -> RedactorResult<Regex> {
    Regex::new(source).map_err(|e| RedactorError::PatternError {
        pattern: source.to_string(),
        reason: e.to_string(),
    })
}
