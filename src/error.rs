//! Error types for the scraping and redaction pipelines.
//!
//! Redaction errors carry structured context (paths, pages, backends) so the
//! review tooling can point at the failing document. Scrape errors are
//! classified so callers can tell a credential problem apart from a portal
//! that was merely slow to render.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Result type alias for portal scraping operations.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Error type for all redaction operations.
#[derive(Debug)]
pub enum RedactorError {
    /// Error occurred while reading or writing files
    Io { path: PathBuf, source: io::Error },

    /// Error occurred during PDF processing
    PdfProcessing {
        message: String,
        page: Option<usize>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Regex compilation error
    PatternError { pattern: String, reason: String },

    /// Text extraction failed
    TextExtraction { path: PathBuf, reason: String },

    /// Invalid configuration or parameters
    InvalidInput { parameter: String, reason: String },

    /// Backend-specific error (MuPDF, LoPDF, etc.)
    BackendError {
        backend: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl fmt::Display for RedactorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "IO error for path '{}': {}", path.display(), source)
            }
            Self::PdfProcessing { message, page, .. } => {
                if let Some(p) = page {
                    write!(f, "PDF processing error on page {}: {}", p, message)
                } else {
                    write!(f, "PDF processing error: {}", message)
                }
            }
            Self::PatternError { pattern, reason } => {
                write!(f, "Pattern error for '{}': {}", pattern, reason)
            }
            Self::TextExtraction { path, reason } => {
                write!(
                    f,
                    "Text extraction failed for '{}': {}",
                    path.display(),
                    reason
                )
            }
            Self::InvalidInput { parameter, reason } => {
                write!(f, "Invalid input for '{}': {}", parameter, reason)
            }
            Self::BackendError {
                backend, message, ..
            } => {
                write!(f, "{} backend error: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for RedactorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::PdfProcessing { source, .. } | Self::BackendError { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<io::Error> for RedactorError {
    fn from(err: io::Error) -> Self {
        Self::BackendError {
            backend: "std::io".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<lopdf::Error> for RedactorError {
    fn from(err: lopdf::Error) -> Self {
        Self::PdfProcessing {
            message: format!("Document is not a readable PDF: {}", err),
            page: None,
            source: Some(Box::new(err)),
        }
    }
}

/// Failures surfaced by the portal scraping pipeline.
///
/// Variants never embed credential values; the portal URL and CSS selectors
/// are the only request details that appear in messages.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The portal bounced the browser back to its login page after submit.
    #[error("Login failed: the portal rejected the supplied credentials")]
    LoginFailed,

    /// An expected element never appeared within its deadline.
    #[error("Portal did not render '{selector}' within {waited:?}")]
    RenderTimeout { selector: String, waited: Duration },

    /// The rendered report could not be walked as a whole.
    #[error("Biomarker extraction failed: {0}")]
    ExtractionFailed(String),

    /// The browser controller itself misbehaved (launch, navigation, input).
    #[error("Browser automation error: {0}")]
    Browser(String),

    /// The browser session was used after it had been released.
    #[error("Browser session already released")]
    SessionReleased,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Returns true for failures that are likely transient, where running the
    /// same request again can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RenderTimeout { .. } | Self::Browser(_))
    }

    /// Returns true when the user has to correct their credentials.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Self::LoginFailed)
    }
}

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(err.to_string())
    }
}
