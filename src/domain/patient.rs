//! Patient name discovery in clinical report text.

use super::PatternMatcher;
use once_cell::sync::Lazy;
use regex::Regex;

/// Finds the patient's name from a `Patient: First Last[ Middle...]` line.
///
/// The name runs from a capitalised first word to a capitalised last word on
/// the same line as the label. Between them it may hold middle names, bare or
/// dotted initials (`A`, `A.`) and short lowercase particles (`de`, `la`,
/// `van`). Once found, the name itself and the labelled form are both
/// redaction variants, since reports repeat the bare name in headers.
#[derive(Debug, Clone, Default)]
pub struct PatientNameMatcher;

impl PatientNameMatcher {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"Patient:[ \t]*([A-Z][A-Za-z'\-]+(?:[ \t]+(?:[A-Z]\.?|[a-z]{1,3}|[A-Z][A-Za-z'\-]+))*[ \t]+[A-Z][A-Za-z'\-]+)",
            )
            .expect("Valid patient name regex")
        });
        &PATTERN
    }

    /// Scans page texts in order and returns the first patient name found.
    pub fn find_in_pages<S: AsRef<str>>(&self, pages: &[S]) -> Option<String> {
        pages
            .iter()
            .find_map(|page| self.normalize(page.as_ref()))
    }
}

impl PatternMatcher for PatientNameMatcher {
    fn pattern(&self) -> &Regex {
        Self::regex()
    }

    fn extract_all<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.pattern().find_iter(text).map(|m| m.as_str()).collect()
    }

    fn normalize(&self, text: &str) -> Option<String> {
        let caps = self.pattern().captures(text)?;
        let name = caps
            .get(1)?
            .as_str()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        Some(name)
    }

    fn generate_variants(&self, normalized: &str) -> Vec<String> {
        vec![normalized.to_string(), format!("Patient: {}", normalized)]
    }
}
