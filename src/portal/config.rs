//! Portal scraping configuration.
//!
//! Defaults describe the reference portal: its URLs, the CSS selectors of its
//! login form and report markup, and wait deadlines tuned to its observed
//! latency. Every value can be overridden from a TOML file.

use super::progress::ProgressBand;
use crate::error::{ScrapeError, ScrapeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Page that hosts the login form.
    pub base_url: String,
    /// Page that renders the biomarker report once signed in.
    pub data_url: String,
    /// Substring of the post-submit URL that means the login was rejected.
    pub login_marker: String,
    /// How many times the report page is loaded before a render timeout is
    /// reported. The login is not repeated.
    pub render_attempts: u32,
    pub selectors: PortalSelectors,
    pub timeouts: Timeouts,
    pub progress: ProgressBand,
    pub browser: BrowserSettings,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://my.functionhealth.com/".to_string(),
            data_url: "https://my.functionhealth.com/biomarkers".to_string(),
            login_marker: "login".to_string(),
            render_attempts: 2,
            selectors: PortalSelectors::default(),
            timeouts: Timeouts::default(),
            progress: ProgressBand::default(),
            browser: BrowserSettings::default(),
        }
    }
}

impl PortalConfig {
    /// Loads a configuration file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> ScrapeResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> ScrapeResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ScrapeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScrapeResult<()> {
        if self.render_attempts == 0 {
            return Err(ScrapeError::Config(
                "render_attempts must be at least 1".to_string(),
            ));
        }
        if self.login_marker.is_empty() {
            return Err(ScrapeError::Config("login_marker must not be empty".to_string()));
        }
        self.progress.validate()
    }
}

/// CSS selectors for the portal's login form and report markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSelectors {
    pub email_input: String,
    pub password_input: String,
    /// Element whose presence means the report has finished rendering.
    pub ready: String,
    /// Category headings interleaved with result blocks.
    pub heading: String,
    /// One biomarker's result block.
    pub record_container: String,
    pub record_name: String,
    pub result_value: String,
    pub unit_value: String,
}

impl Default for PortalSelectors {
    fn default() -> Self {
        let record_name = ".biomarkerResultRow-styled__BiomarkerName-sc-3bf584b3-1".to_string();
        Self {
            email_input: "#email".to_string(),
            password_input: "#password".to_string(),
            ready: record_name.clone(),
            heading: "h4".to_string(),
            record_container: "div[class*='biomarkerResult-styled__ResultContainer']".to_string(),
            record_name,
            result_value: "[class*='biomarkerChart-styled__ResultValue']".to_string(),
            unit_value: "[class^='biomarkerChart-styled__UnitValue']".to_string(),
        }
    }
}

/// Per-step wait deadlines, in seconds unless noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub login_form_secs: u64,
    pub settle_secs: u64,
    pub render_secs: u64,
    /// Bound on browser shutdown before the process is killed.
    pub teardown_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            login_form_secs: 10,
            settle_secs: 5,
            render_secs: 12,
            teardown_secs: 10,
            poll_interval_ms: 250,
        }
    }
}

impl Timeouts {
    pub fn login_form(&self) -> Duration {
        Duration::from_secs(self.login_form_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn render(&self) -> Duration {
        Duration::from_secs(self.render_secs)
    }

    pub fn teardown(&self) -> Duration {
        Duration::from_secs(self.teardown_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Launch settings for the automated browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    pub sandbox: bool,
    /// Whether Chrome may use /dev/shm; containers usually have too little.
    pub shared_memory: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: false,
            shared_memory: false,
            viewport_width: 1920,
            viewport_height: 1080,
            chrome_executable: None,
        }
    }
}
