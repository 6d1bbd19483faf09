//! Personal health-data import and clinical report de-identification.
//!
//! This library signs in to a biomarker portal with a headless browser,
//! extracts the rendered lab report into a flat table, and separately strips
//! identifying text from uploaded clinical PDF reports using MuPDF's
//! redaction API, which physically removes the covered content.
//!
//! # Architecture
//!
//! - [`portal`]: browser session, login flow, report extraction, orchestration
//! - [`domain`]: biomarker records, CSV table, identifier pattern matchers
//! - [`redaction`]: redaction strategies, per-document jobs, service layer
//! - [`error`]: scrape and redaction error types
//!
//! # Quick Start
//!
//! ```no_run
//! use healthport::portal::{ChromeBrowser, ConsoleProgress, Credentials, PortalConfig};
//! use healthport::ScrapeOrchestrator;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = ScrapeOrchestrator::new(ChromeBrowser::new(), PortalConfig::default());
//! let progress = ConsoleProgress::new();
//!
//! let table = orchestrator
//!     .run(Credentials::new("me@example.com", "secret"), &progress)
//!     .await?;
//! table.save_csv(std::path::Path::new("biomarkers.csv"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Redacting a report
//!
//! ```no_run
//! use healthport::RedactionService;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedactionService::with_secure_strategy();
//! let redacted = service.redact_report(&std::fs::read("report.pdf")?)?;
//! std::fs::write("report_redacted.pdf", redacted)?;
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod error;
pub mod portal;
pub mod redaction;

pub use domain::{BiomarkerRecord, BiomarkerTable, PatientNameMatcher, PatternMatcher};
pub use error::{RedactorError, RedactorResult, ScrapeError, ScrapeResult};
pub use portal::ScrapeOrchestrator;
pub use redaction::{
    RedactionJob, RedactionResult, RedactionService, RedactionStrategy, RedactionTarget,
    SecureRedactionStrategy,
};

/// Extracts all text from a PDF file with the secure strategy's extractor.
pub fn extract_text_from_pdf(path: &std::path::Path) -> RedactorResult<String> {
    SecureRedactionStrategy::new().extract_text(path)
}
