//! End-to-end scrape runs.

use super::auth::AuthenticationFlow;
use super::browser::{BrowserSession, PortalBrowser};
use super::config::PortalConfig;
use super::credentials::Credentials;
use super::extractor::DomExtractor;
use super::progress::ProgressReporter;
use super::session::ScrapeSession;
use crate::domain::BiomarkerTable;
use crate::error::{ScrapeError, ScrapeResult};
use tracing::{error, info};

/// Launches a browser, signs in, extracts the report, and tears everything
/// down again regardless of how the run ended.
pub struct ScrapeOrchestrator<B> {
    browser: B,
    config: PortalConfig,
}

impl<B: PortalBrowser> ScrapeOrchestrator<B> {
    pub fn new(browser: B, config: PortalConfig) -> Self {
        Self { browser, config }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Runs one scrape. Either every extracted record is returned or an
    /// error is, never a partial table.
    pub async fn run(
        &self,
        credentials: Credentials,
        progress: &dyn ProgressReporter,
    ) -> ScrapeResult<BiomarkerTable> {
        let mut session = ScrapeSession::new(credentials, progress);

        let outcome = self.drive(&mut session).await;
        session.finish().await;

        match outcome {
            Ok(()) => {
                let table = BiomarkerTable::new(session.take_records());
                session.progress.report(100, "Done");
                info!(records = table.len(), "Scrape finished");
                Ok(table)
            }
            Err(e) => {
                error!("Scrape failed: {}", e);
                Err(e)
            }
        }
    }

    async fn drive(&self, session: &mut ScrapeSession<'_>) -> ScrapeResult<()> {
        session.progress.report(5, "Launching browser");
        let browser = BrowserSession::acquire(&self.browser, &self.config.browser)
            .await?
            .with_teardown_timeout(self.config.timeouts.teardown());
        let browser = session.browser.insert(browser);
        session.progress.report(10, "Browser ready");

        session.progress.report(20, "Signing in");
        let credentials = session
            .credentials
            .as_ref()
            .ok_or_else(|| ScrapeError::Config("credentials were already scrubbed".to_string()))?;
        AuthenticationFlow::new(&self.config)
            .authenticate(browser.page()?, credentials)
            .await?;
        session.scrub_credentials();

        session.progress.report(30, "Waiting for biomarker report");
        let page = session
            .browser
            .as_mut()
            .ok_or(ScrapeError::SessionReleased)?
            .page()?;
        let records = DomExtractor::new(&self.config)
            .extract(page, &mut session.progress)
            .await?;
        session.records = records;
        Ok(())
    }
}
