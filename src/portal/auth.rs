//! Portal login.

use super::browser::{wait_for_selector, PortalPage};
use super::config::PortalConfig;
use super::credentials::Credentials;
use crate::error::{ScrapeError, ScrapeResult};
use tokio::time::sleep;
use tracing::{info, warn};

/// Proof that the page is signed in and sitting on the report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    /// Where the portal redirected after the credentials were submitted.
    pub landing_url: String,
}

/// Drives the portal's login form.
///
/// The portal gives no explicit success signal, so after submitting the flow
/// waits a fixed settle interval and inspects the URL: still being on the
/// login page means the credentials were rejected.
pub struct AuthenticationFlow<'a> {
    config: &'a PortalConfig,
}

impl<'a> AuthenticationFlow<'a> {
    pub fn new(config: &'a PortalConfig) -> Self {
        Self { config }
    }

    pub async fn authenticate(
        &self,
        page: &mut dyn PortalPage,
        credentials: &Credentials,
    ) -> ScrapeResult<Authenticated> {
        let selectors = &self.config.selectors;
        let timeouts = &self.config.timeouts;

        page.goto(&self.config.base_url).await?;
        wait_for_selector(
            page,
            &selectors.email_input,
            timeouts.login_form(),
            timeouts.poll_interval(),
        )
        .await?;

        page.type_text(&selectors.email_input, credentials.email())
            .await?;
        page.type_text(&selectors.password_input, credentials.password())
            .await?;
        page.press_enter(&selectors.password_input).await?;

        sleep(timeouts.settle()).await;

        let landing_url = page.current_url().await?;
        if landing_url.contains(&self.config.login_marker) {
            warn!("Portal stayed on the login page after submit");
            return Err(ScrapeError::LoginFailed);
        }

        info!("Signed in to portal");
        page.goto(&self.config.data_url).await?;
        Ok(Authenticated { landing_url })
    }
}
