//! Redaction strategies and implementations.
//!
//! This module provides a strategy pattern for different redaction approaches,
//! allowing for flexible and testable redaction implementations.

pub mod job;
pub mod secure;
pub mod strategy;

pub use job::{RedactionJob, PATIENT_SCAN_PAGES};
pub use secure::SecureRedactionStrategy;
pub use strategy::{RedactionResult, RedactionStrategy, RedactionTarget};

use crate::error::{RedactorError, RedactorResult};
use std::path::Path;
use tracing::info;

/// Redaction service coordinating strategy execution.
///
/// This service provides a high-level API for redacting documents
/// using different strategies while handling common concerns like
/// input validation and pattern resolution.
pub struct RedactionService {
    strategy: Box<dyn RedactionStrategy>,
}

impl RedactionService {
    /// Creates a new redaction service with the specified strategy.
    pub fn new(strategy: Box<dyn RedactionStrategy>) -> Self {
        Self { strategy }
    }

    /// Creates a service with secure (physical removal) redaction.
    pub fn with_secure_strategy() -> Self {
        Self::new(Box::new(SecureRedactionStrategy::default()))
    }

    /// Redacts patterns from a PDF document on disk.
    ///
    /// # Arguments
    /// * `input` - Path to input PDF
    /// * `output` - Path for output PDF
    /// * `targets` - Classes of text to redact
    ///
    /// # Returns
    /// Result containing redaction statistics
    pub fn redact(
        &self,
        input: &Path,
        output: &Path,
        targets: &[RedactionTarget],
    ) -> RedactorResult<RedactionResult> {
        if !input.exists() {
            return Err(RedactorError::Io {
                path: input.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Input file does not exist",
                ),
            });
        }

        let bytes = std::fs::read(input).map_err(|e| RedactorError::Io {
            path: input.to_path_buf(),
            source: e,
        })?;
        let mut job = RedactionJob::new(bytes);
        let result = self.run_job(&mut job, input, output, targets)?;
        Ok(result)
    }

    /// Redacts an uploaded clinical report held in memory and returns the
    /// redacted document bytes.
    pub fn redact_report(&self, input: &[u8]) -> RedactorResult<Vec<u8>> {
        let (output, _) = self.redact_bytes(input, &RedactionTarget::clinical_report())?;
        Ok(output)
    }

    /// Redacts an in-memory document against `targets`.
    pub fn redact_bytes(
        &self,
        input: &[u8],
        targets: &[RedactionTarget],
    ) -> RedactorResult<(Vec<u8>, RedactionResult)> {
        let scratch = tempfile::tempdir()?;
        let input_path = scratch.path().join("input.pdf");
        let output_path = scratch.path().join("output.pdf");

        std::fs::write(&input_path, input).map_err(|e| RedactorError::Io {
            path: input_path.clone(),
            source: e,
        })?;

        let mut job = RedactionJob::new(input.to_vec());
        let result = self.run_job(&mut job, &input_path, &output_path, targets)?;
        let output = job.into_output().unwrap_or_default();
        Ok((output, result))
    }

    /// Extracts text from a PDF for analysis.
    pub fn extract_text(&self, input: &Path) -> RedactorResult<String> {
        self.strategy.extract_text(input)
    }

    fn run_job(
        &self,
        job: &mut RedactionJob,
        input: &Path,
        output: &Path,
        targets: &[RedactionTarget],
    ) -> RedactorResult<RedactionResult> {
        if targets.is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "targets".to_string(),
                reason: "No redaction targets specified".to_string(),
            });
        }

        // Reject non-PDF uploads before MuPDF sees them
        lopdf::Document::load_mem(job.input())?;

        let pages = self.strategy.extract_pages(input)?;
        job.resolve(targets, &pages)?;

        let mut result = self.strategy.redact(input, output, job.patterns())?;
        result.patient_name_found = job.patient_name().is_some();

        let redacted = std::fs::read(output).map_err(|e| RedactorError::Io {
            path: output.to_path_buf(),
            source: e,
        })?;
        job.complete(redacted);

        info!(
            strategy = self.strategy.name(),
            pages = result.pages_processed,
            redacted = result.instances_redacted,
            patient_name_found = result.patient_name_found,
            "Redaction finished"
        );
        Ok(result)
    }
}
