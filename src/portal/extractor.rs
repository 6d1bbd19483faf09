//! Biomarker report extraction.
//!
//! The report page interleaves category headings with result blocks; a
//! block belongs to the nearest heading above it. Document order is the only
//! link between the two, so headings and blocks are selected together with a
//! single grouped selector, which yields matches in document order.

use super::browser::{wait_for_selector, PortalPage};
use super::config::{PortalConfig, PortalSelectors};
use super::progress::MonotonicProgress;
use crate::domain::{BiomarkerRecord, ResultFields};
use crate::error::{ScrapeError, ScrapeResult};
use scraper::element_ref::ElementRef;
use scraper::html::Select;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

/// Waits for the report to render and walks it into records.
pub struct DomExtractor<'a> {
    config: &'a PortalConfig,
}

impl<'a> DomExtractor<'a> {
    pub fn new(config: &'a PortalConfig) -> Self {
        Self { config }
    }

    pub async fn extract(
        &self,
        page: &mut dyn PortalPage,
        progress: &mut MonotonicProgress<'_>,
    ) -> ScrapeResult<Vec<BiomarkerRecord>> {
        let parser = ReportParser::new(&self.config.selectors)?;
        self.wait_for_report(page).await?;

        let html = page
            .content()
            .await
            .map_err(|e| ScrapeError::ExtractionFailed(format!("could not read report: {}", e)))?;

        let band = self.config.progress;
        let records = parser.parse(&html, |done, total| {
            progress.report(band.at(done, total), "Extracting biomarkers");
        })?;

        info!(records = records.len(), "Extracted biomarker report");
        Ok(records)
    }

    /// Waits for the ready selector, reloading the report page between
    /// attempts. Only render timeouts are retried.
    async fn wait_for_report(&self, page: &mut dyn PortalPage) -> ScrapeResult<()> {
        let timeouts = &self.config.timeouts;
        let attempts = self.config.render_attempts.max(1);
        let mut attempt = 1;

        loop {
            let waited = wait_for_selector(
                page,
                &self.config.selectors.ready,
                timeouts.render(),
                timeouts.poll_interval(),
            )
            .await;

            match waited {
                Ok(()) => return Ok(()),
                Err(e @ ScrapeError::RenderTimeout { .. }) if attempt < attempts => {
                    warn!(attempt, "Report not rendered, reloading: {}", e);
                    page.goto(&self.config.data_url).await?;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Walks rendered report markup into biomarker records.
pub struct ReportParser {
    items: Selector,
    heading: Selector,
    container: Selector,
    name: Selector,
    value: Selector,
    unit: Selector,
}

impl ReportParser {
    pub fn new(selectors: &PortalSelectors) -> ScrapeResult<Self> {
        Ok(Self {
            items: compile(&format!(
                "{}, {}",
                selectors.heading, selectors.record_container
            ))?,
            heading: compile(&selectors.heading)?,
            container: compile(&selectors.record_container)?,
            name: compile(&selectors.record_name)?,
            value: compile(&selectors.result_value)?,
            unit: compile(&selectors.unit_value)?,
        })
    }

    /// Parses a full report, calling `on_container(done, total)` after each
    /// result block whether or not it produced a record.
    pub fn parse<F>(&self, html: &str, mut on_container: F) -> ScrapeResult<Vec<BiomarkerRecord>>
    where
        F: FnMut(usize, usize),
    {
        let document = Html::parse_document(html);
        let total = document.select(&self.container).count();
        if total == 0 {
            return Err(ScrapeError::ExtractionFailed(
                "report contained no result blocks".to_string(),
            ));
        }

        let mut records = Vec::with_capacity(total);
        for row in self.rows(&document) {
            on_container(row.index + 1, total);
            if let Some(record) = row.record {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Lazily walks headings and result blocks in document order.
    pub fn rows<'h>(&'h self, document: &'h Html) -> ReportRows<'h> {
        ReportRows {
            parser: self,
            items: document.select(&self.items),
            category: None,
            containers: 0,
        }
    }

    fn read_record(&self, block: ElementRef<'_>, category: Option<String>) -> Option<BiomarkerRecord> {
        let name = block.select(&self.name).next().map(element_text)?;
        if name.is_empty() {
            return None;
        }

        let texts: Vec<String> = block.select(&self.value).map(element_text).collect();
        let unit = block.select(&self.unit).next().map(element_text);
        let fields = ResultFields::from_positional(&texts).with_unit_override(unit);

        Some(BiomarkerRecord::new(category, name, fields))
    }
}

/// One result block visited during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Position among result blocks, headings excluded.
    pub index: usize,
    /// `None` when the block had no name and was skipped.
    pub record: Option<BiomarkerRecord>,
}

pub struct ReportRows<'h> {
    parser: &'h ReportParser,
    items: Select<'h, 'h>,
    category: Option<String>,
    containers: usize,
}

impl<'h> Iterator for ReportRows<'h> {
    type Item = ReportRow;

    fn next(&mut self) -> Option<ReportRow> {
        for element in self.items.by_ref() {
            if self.parser.heading.matches(&element) {
                self.category = Some(element_text(element));
                continue;
            }

            let index = self.containers;
            self.containers += 1;
            let record = self.parser.read_record(element, self.category.clone());
            if record.is_none() {
                debug!(index, "Skipping result block without a name");
            }
            return Some(ReportRow { index, record });
        }
        None
    }
}

fn compile(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| {
        ScrapeError::ExtractionFailed(format!("invalid selector '{}': {}", selector, e))
    })
}

/// Visible text of an element with whitespace runs collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
