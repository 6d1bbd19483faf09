//! Scripted portal for pipeline tests.
//!
//! `FakePortal` implements the browser seam over canned markup. It records
//! every navigation, keystroke target and teardown so tests can check what the
//! pipeline did, not just what it returned.

use async_trait::async_trait;
use healthport::error::{ScrapeError, ScrapeResult};
use healthport::portal::{BrowserSettings, PortalBrowser, PortalConfig, PortalPage};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://portal.test/";
pub const DATA_URL: &str = "https://portal.test/biomarkers";
pub const HOME_URL: &str = "https://portal.test/home";
pub const LOGIN_URL: &str = "https://portal.test/login?error=1";

/// Portal configuration pointing at the fake's URLs.
pub fn test_config() -> PortalConfig {
    PortalConfig {
        base_url: BASE_URL.to_string(),
        data_url: DATA_URL.to_string(),
        ..PortalConfig::default()
    }
}

/// What happened during a run.
#[derive(Debug, Default)]
pub struct PortalLog {
    pub launches: usize,
    pub closes: usize,
    pub kills: usize,
    pub visited: Vec<String>,
    /// Selectors typed into, never the typed text.
    pub typed_into: Vec<String>,
    pub submits: usize,
}

#[derive(Debug, Clone)]
pub struct FakePortal {
    report_html: String,
    landing_url: String,
    /// The report renders on this load of the data page (1-based).
    renders_on_load: Option<usize>,
    content_fails: bool,
    launch_fails: bool,
    close_fails: bool,
    close_hangs: bool,
    log: Arc<Mutex<PortalLog>>,
}

impl FakePortal {
    pub fn new(report_html: impl Into<String>) -> Self {
        Self {
            report_html: report_html.into(),
            landing_url: HOME_URL.to_string(),
            renders_on_load: Some(1),
            content_fails: false,
            launch_fails: false,
            close_fails: false,
            close_hangs: false,
            log: Arc::new(Mutex::new(PortalLog::default())),
        }
    }

    /// URL the portal shows after the login form is submitted.
    pub fn landing_on(mut self, url: &str) -> Self {
        self.landing_url = url.to_string();
        self
    }

    pub fn rejecting_login(self) -> Self {
        self.landing_on(LOGIN_URL)
    }

    pub fn rendering_on_load(mut self, load: usize) -> Self {
        self.renders_on_load = Some(load);
        self
    }

    pub fn never_rendering(mut self) -> Self {
        self.renders_on_load = None;
        self
    }

    pub fn failing_content(mut self) -> Self {
        self.content_fails = true;
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.launch_fails = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.close_fails = true;
        self
    }

    /// Close never completes, like a browser wedged during shutdown.
    pub fn hanging_on_close(mut self) -> Self {
        self.close_hangs = true;
        self
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, PortalLog> {
        self.log.lock().unwrap()
    }
}

#[async_trait]
impl PortalBrowser for FakePortal {
    async fn launch(&self, _settings: &BrowserSettings) -> ScrapeResult<Box<dyn PortalPage>> {
        if self.launch_fails {
            return Err(ScrapeError::Browser("no chrome binary".to_string()));
        }
        self.log().launches += 1;
        Ok(Box::new(FakePage {
            portal: self.clone(),
            config: test_config(),
            url: "about:blank".to_string(),
            data_loads: 0,
        }))
    }
}

pub struct FakePage {
    portal: FakePortal,
    config: PortalConfig,
    url: String,
    data_loads: usize,
}

impl FakePage {
    fn rendered(&self) -> bool {
        self.url == DATA_URL
            && self
                .portal
                .renders_on_load
                .map_or(false, |load| self.data_loads >= load)
    }
}

#[async_trait]
impl PortalPage for FakePage {
    async fn goto(&mut self, url: &str) -> ScrapeResult<()> {
        self.url = url.to_string();
        if url == DATA_URL {
            self.data_loads += 1;
        }
        self.portal.log().visited.push(url.to_string());
        Ok(())
    }

    async fn current_url(&mut self) -> ScrapeResult<String> {
        Ok(self.url.clone())
    }

    async fn exists(&mut self, selector: &str) -> ScrapeResult<bool> {
        let selectors = &self.config.selectors;
        if selector == selectors.email_input || selector == selectors.password_input {
            return Ok(self.url == BASE_URL);
        }
        if selector == selectors.ready {
            return Ok(self.rendered());
        }
        Ok(false)
    }

    async fn type_text(&mut self, selector: &str, _text: &str) -> ScrapeResult<()> {
        self.portal.log().typed_into.push(selector.to_string());
        Ok(())
    }

    async fn press_enter(&mut self, _selector: &str) -> ScrapeResult<()> {
        self.portal.log().submits += 1;
        self.url = self.portal.landing_url.clone();
        Ok(())
    }

    async fn content(&mut self) -> ScrapeResult<String> {
        if self.portal.content_fails {
            return Err(ScrapeError::Browser("target crashed".to_string()));
        }
        Ok(self.portal.report_html.clone())
    }

    async fn close(&mut self) -> ScrapeResult<()> {
        self.portal.log().closes += 1;
        if self.portal.close_hangs {
            futures::future::pending::<()>().await;
        }
        if self.portal.close_fails {
            return Err(ScrapeError::Browser("browser already gone".to_string()));
        }
        Ok(())
    }

    async fn kill(&mut self) -> ScrapeResult<()> {
        self.portal.log().kills += 1;
        Ok(())
    }
}

/// One result block in the portal's report markup.
pub fn result_block(name: Option<&str>, values: &[&str], unit: Option<&str>) -> String {
    let mut html = String::from(r#"<div class="biomarkerResult-styled__ResultContainer-sc-7c1a">"#);
    if let Some(name) = name {
        html.push_str(&format!(
            r#"<div class="biomarkerResultRow-styled__BiomarkerName-sc-3bf584b3-1">{}</div>"#,
            name
        ));
    }
    for value in values {
        html.push_str(&format!(
            r#"<span class="biomarkerChart-styled__ResultValue-sc-51b1">{}</span>"#,
            value
        ));
    }
    if let Some(unit) = unit {
        html.push_str(&format!(
            r#"<span class="biomarkerChart-styled__UnitValue-sc-51b2">{}</span>"#,
            unit
        ));
    }
    html.push_str("</div>");
    html
}

/// A two-category report with four biomarkers.
pub fn sample_report() -> String {
    format!(
        "<html><body><main>\
         <h4>Heart</h4>{}{}\
         <h4>Thyroid</h4>{}{}\
         </main></body></html>",
        result_block(Some("LDL Cholesterol"), &["Out of range", "142", "mg/dL"], None),
        result_block(Some("HDL Cholesterol"), &["In range", "61"], Some("mg/dL")),
        result_block(Some("TSH"), &["1.9"], Some("mIU/L")),
        result_block(Some("Free T4"), &["In range", "1.2", "ng/dL"], None),
    )
}
