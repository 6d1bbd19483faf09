//! State of one scrape invocation.

use super::browser::BrowserSession;
use super::credentials::Credentials;
use super::progress::{MonotonicProgress, ProgressReporter};
use crate::domain::BiomarkerRecord;
use tracing::debug;

/// Everything one scrape run owns: the credentials until they are scrubbed,
/// the browser until it is released, the progress channel, and the records
/// collected so far.
pub struct ScrapeSession<'a> {
    pub(crate) credentials: Option<Credentials>,
    pub(crate) browser: Option<BrowserSession>,
    pub(crate) progress: MonotonicProgress<'a>,
    pub(crate) records: Vec<BiomarkerRecord>,
}

impl<'a> ScrapeSession<'a> {
    pub fn new(credentials: Credentials, progress: &'a dyn ProgressReporter) -> Self {
        Self {
            credentials: Some(credentials),
            browser: None,
            progress: MonotonicProgress::new(progress),
            records: Vec::new(),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn progress(&self) -> u8 {
        self.progress.current()
    }

    /// Drops the credentials; their buffers are zeroed on drop.
    pub fn scrub_credentials(&mut self) {
        if self.credentials.take().is_some() {
            debug!("Credentials scrubbed");
        }
    }

    /// Scrubs credentials and releases the browser. Safe to call repeatedly.
    pub async fn finish(&mut self) {
        self.scrub_credentials();
        self.progress.report(95, "Clearing credentials");

        if let Some(browser) = self.browser.as_mut() {
            browser.release().await;
        }
        self.progress.report(98, "Browser closed");
    }

    pub fn take_records(&mut self) -> Vec<BiomarkerRecord> {
        std::mem::take(&mut self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::SilentProgress;

    #[test]
    fn test_scrub_drops_credentials() {
        let mut session = ScrapeSession::new(
            Credentials::new("ada@example.com", "analytical-engine"),
            &SilentProgress,
        );
        assert!(session.has_credentials());

        session.scrub_credentials();
        session.scrub_credentials();
        assert!(!session.has_credentials());
    }

    #[tokio::test]
    async fn test_finish_without_browser() {
        let mut session = ScrapeSession::new(
            Credentials::new("ada@example.com", "analytical-engine"),
            &SilentProgress,
        );
        assert_eq!(session.progress(), 0);

        session.finish().await;
        assert!(!session.has_credentials());
        assert_eq!(session.progress(), 98);
        assert!(session.take_records().is_empty());

        // A second finish neither regresses progress nor panics
        session.finish().await;
        assert_eq!(session.progress(), 98);
    }
}
