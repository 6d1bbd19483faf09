//! Biomarker portal scraping.
//!
//! A run acquires a headless browser, signs in through the portal's login
//! form, waits for the client-rendered report, and walks it into
//! [`BiomarkerRecord`](crate::domain::BiomarkerRecord)s. The browser is
//! reached only through the [`PortalBrowser`]/[`PortalPage`] traits.

pub mod auth;
pub mod browser;
pub mod config;
pub mod credentials;
pub mod extractor;
pub mod orchestrator;
pub mod progress;
pub mod session;

pub use auth::{Authenticated, AuthenticationFlow};
pub use browser::{wait_for_selector, BrowserSession, ChromeBrowser, PortalBrowser, PortalPage};
pub use config::{BrowserSettings, PortalConfig, PortalSelectors, Timeouts};
pub use credentials::Credentials;
pub use extractor::{DomExtractor, ReportParser, ReportRow};
pub use orchestrator::ScrapeOrchestrator;
pub use progress::{
    ConsoleProgress, MonotonicProgress, ProgressBand, ProgressReporter, SilentProgress,
};
pub use session::ScrapeSession;
