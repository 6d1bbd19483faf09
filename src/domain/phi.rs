//! Fixed identifier patterns found in imaging and lab report headers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Identifying fields that every clinical report header carries.
///
/// Patterns are matched against the extracted text of one page and never
/// cross a line break, so each match can be located on the page as a single
/// run of text.
pub struct ClinicalIdentifierPatterns;

impl ClinicalIdentifierPatterns {
    /// Pattern sources in redaction order.
    pub const SOURCES: [&'static str; 11] = [
        // scan time line
        r"(?i)\bscan (?:date/)?time:[^\n]*",
        // sex field
        r"(?i)\bsex:",
        // sex values
        r"\b(?:Male|Female|MALE|FEMALE)\b",
        r"(?i)\bheight:[^\n]*",
        r"(?i)\bweight:[^\n]*",
        r"(?i)\b(?:date of birth|DOB):?",
        // ISO dates anywhere
        r"\b\d{4}-\d{2}-\d{2}\b",
        r"(?i)\bfacility:[^\n]*",
        r"(?i)\bpatient:",
        // study identifier
        r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b",
        r"(?i)\breport (?:prepared )?for:[^\n]*",
    ];

    /// Returns the compiled pattern set.
    pub fn all() -> &'static [Regex] {
        static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
            ClinicalIdentifierPatterns::SOURCES
                .iter()
                .map(|src| Regex::new(src).expect("Valid clinical identifier regex"))
                .collect()
        });
        &PATTERNS
    }
}
