//! Domain models and business logic.
//!
//! This module holds the biomarker record model produced by the portal
//! scraper, its tabular export, and the pattern matchers that locate
//! identifying text in clinical PDF reports.

pub mod biomarker;
pub mod patient;
pub mod phi;
pub mod table;

pub use biomarker::{BiomarkerRecord, ResultFields};
pub use patient::PatientNameMatcher;
pub use phi::ClinicalIdentifierPatterns;
pub use table::BiomarkerTable;

use regex::Regex;

/// Trait for pattern matching strategies.
pub trait PatternMatcher: Send + Sync {
    fn pattern(&self) -> &Regex;
    fn extract_all<'a>(&self, text: &'a str) -> Vec<&'a str>;
    fn normalize(&self, text: &str) -> Option<String>;
    fn generate_variants(&self, normalized: &str) -> Vec<String>;
}
