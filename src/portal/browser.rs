//! Browser control seam and its Chromium implementation.
//!
//! The pipeline talks to the portal only through [`PortalPage`], so tests can
//! serve canned markup without launching a browser. [`ChromeBrowser`] drives a
//! real headless Chromium over the DevTools protocol.

use super::config::BrowserSettings;
use crate::error::{ScrapeError, ScrapeResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

/// Launches browser instances. Each launch yields an exclusively owned page.
#[async_trait]
pub trait PortalBrowser: Send + Sync {
    async fn launch(&self, settings: &BrowserSettings) -> ScrapeResult<Box<dyn PortalPage>>;
}

/// The operations the pipeline performs on a live page.
#[async_trait]
pub trait PortalPage: Send {
    async fn goto(&mut self, url: &str) -> ScrapeResult<()>;

    async fn current_url(&mut self) -> ScrapeResult<String>;

    /// Whether at least one element currently matches `selector`.
    async fn exists(&mut self, selector: &str) -> ScrapeResult<bool>;

    async fn type_text(&mut self, selector: &str, text: &str) -> ScrapeResult<()>;

    async fn press_enter(&mut self, selector: &str) -> ScrapeResult<()>;

    /// Serialized DOM as currently rendered, including script output.
    async fn content(&mut self) -> ScrapeResult<String>;

    /// Closes the page and terminates its browser process.
    async fn close(&mut self) -> ScrapeResult<()>;

    /// Forcibly terminates the browser process after a failed close.
    async fn kill(&mut self) -> ScrapeResult<()>;
}

/// Polls until `selector` matches or `timeout` elapses.
pub async fn wait_for_selector(
    page: &mut dyn PortalPage,
    selector: &str,
    timeout: Duration,
    poll: Duration,
) -> ScrapeResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if page.exists(selector).await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(ScrapeError::RenderTimeout {
                selector: selector.to_string(),
                waited: timeout,
            });
        }
        sleep(poll).await;
    }
}

/// Default bound on how long `release` waits for the browser to exit.
pub const DEFAULT_TEARDOWN: Duration = Duration::from_secs(10);

/// Scoped owner of one browser page.
///
/// `release` closes the page at most once and never fails; teardown errors
/// are logged. A close that outlives the teardown deadline is abandoned and
/// the process is killed. A session dropped without release still tears the
/// process down through the page's own drop.
pub struct BrowserSession {
    page: Option<Box<dyn PortalPage>>,
    teardown: Duration,
}

impl BrowserSession {
    pub async fn acquire(
        browser: &dyn PortalBrowser,
        settings: &BrowserSettings,
    ) -> ScrapeResult<Self> {
        let page = browser.launch(settings).await?;
        debug!(
            headless = settings.headless,
            width = settings.viewport_width,
            height = settings.viewport_height,
            "Browser session acquired"
        );
        Ok(Self {
            page: Some(page),
            teardown: DEFAULT_TEARDOWN,
        })
    }

    pub fn with_teardown_timeout(mut self, teardown: Duration) -> Self {
        self.teardown = teardown;
        self
    }

    pub fn page(&mut self) -> ScrapeResult<&mut (dyn PortalPage + 'static)> {
        self.page.as_deref_mut().ok_or(ScrapeError::SessionReleased)
    }

    pub fn is_released(&self) -> bool {
        self.page.is_none()
    }

    pub async fn release(&mut self) {
        let Some(mut page) = self.page.take() else {
            return;
        };
        match timeout(self.teardown, page.close()).await {
            Ok(Ok(())) => debug!("Browser session released"),
            Ok(Err(e)) => warn!("Browser teardown failed: {}", e),
            Err(_) => {
                warn!(waited = ?self.teardown, "Browser did not exit in time, killing it");
                match timeout(self.teardown, page.kill()).await {
                    Ok(Ok(())) => debug!("Browser process killed"),
                    Ok(Err(e)) => warn!("Browser kill failed: {}", e),
                    Err(_) => warn!("Browser kill timed out, leaving it to kill-on-drop"),
                }
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.page.is_some() {
            warn!("Browser session dropped without release");
        }
    }
}

/// Launches a local Chromium through chromiumoxide.
#[derive(Debug, Clone, Default)]
pub struct ChromeBrowser;

impl ChromeBrowser {
    pub fn new() -> Self {
        Self
    }

    fn config(settings: &BrowserSettings) -> ScrapeResult<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .window_size(settings.viewport_width, settings.viewport_height)
            .viewport(Viewport {
                width: settings.viewport_width,
                height: settings.viewport_height,
                ..Viewport::default()
            });

        if !settings.headless {
            builder = builder.with_head();
        }
        if !settings.sandbox {
            builder = builder.no_sandbox();
        }
        if !settings.shared_memory {
            builder = builder.arg("--disable-dev-shm-usage");
        }
        if let Some(path) = &settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| ScrapeError::Browser(format!("Failed to configure browser: {}", e)))
    }
}

#[async_trait]
impl PortalBrowser for ChromeBrowser {
    async fn launch(&self, settings: &BrowserSettings) -> ScrapeResult<Box<dyn PortalPage>> {
        let (browser, mut handler) = Browser::launch(Self::config(settings)?).await?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(e.into());
            }
        };

        Ok(Box::new(ChromePage {
            browser,
            page,
            handler_task,
        }))
    }
}

struct ChromePage {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

#[async_trait]
impl PortalPage for ChromePage {
    async fn goto(&mut self, url: &str) -> ScrapeResult<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn current_url(&mut self) -> ScrapeResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn exists(&mut self, selector: &str) -> ScrapeResult<bool> {
        Ok(!self.page.find_elements(selector).await?.is_empty())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> ScrapeResult<()> {
        self.page
            .find_element(selector)
            .await?
            .click()
            .await?
            .type_str(text)
            .await?;
        Ok(())
    }

    async fn press_enter(&mut self, selector: &str) -> ScrapeResult<()> {
        self.page
            .find_element(selector)
            .await?
            .press_key("Enter")
            .await?;
        Ok(())
    }

    async fn content(&mut self) -> ScrapeResult<String> {
        Ok(self.page.content().await?)
    }

    async fn close(&mut self) -> ScrapeResult<()> {
        self.browser.close().await?;
        self.browser.wait().await?;
        self.handler_task.abort();
        Ok(())
    }

    async fn kill(&mut self) -> ScrapeResult<()> {
        self.handler_task.abort();
        if let Some(result) = self.browser.kill().await {
            result?;
        }
        Ok(())
    }
}
