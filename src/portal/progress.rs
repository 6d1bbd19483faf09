//! Progress reporting for scrape runs.

use crate::error::{ScrapeError, ScrapeResult};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

/// Receives progress updates as a percentage and a status line.
///
/// Reporters are pushed to and never awaited, so slow consumers cannot stall
/// a scrape.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, percent: u8, status: &str);
}

impl<F> ProgressReporter for F
where
    F: Fn(u8, &str) + Send + Sync,
{
    fn report(&self, percent: u8, status: &str) {
        self(percent, status)
    }
}

/// Discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&self, _percent: u8, _status: &str) {}
}

/// Terminal progress bar for the CLI.
pub struct ConsoleProgress {
    pb: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let pb = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos:>3}% {msg}") {
            pb.set_style(style);
        }
        Self { pb }
    }

    pub fn finish(&self) {
        self.pb.finish();
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, percent: u8, status: &str) {
        self.pb.set_position(u64::from(percent));
        self.pb.set_message(status.to_string());
    }
}

/// Forwards updates while holding the reported percentage non-decreasing and
/// within 0..=100.
pub struct MonotonicProgress<'a> {
    sink: &'a dyn ProgressReporter,
    current: u8,
}

impl<'a> MonotonicProgress<'a> {
    pub fn new(sink: &'a dyn ProgressReporter) -> Self {
        Self { sink, current: 0 }
    }

    pub fn report(&mut self, percent: u8, status: &str) {
        self.current = percent.min(100).max(self.current);
        self.sink.report(self.current, status);
    }

    pub fn current(&self) -> u8 {
        self.current
    }
}

/// Percentage range that a multi-item step spreads its progress across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBand {
    pub start: u8,
    pub end: u8,
}

impl Default for ProgressBand {
    fn default() -> Self {
        Self { start: 30, end: 80 }
    }
}

impl ProgressBand {
    /// Percentage after `done` of `total` items, linear across the band.
    pub fn at(&self, done: usize, total: usize) -> u8 {
        if total == 0 {
            return self.end;
        }
        let span = usize::from(self.end.saturating_sub(self.start));
        let offset = span * done.min(total) / total;
        self.start + offset as u8
    }

    pub fn validate(&self) -> ScrapeResult<()> {
        if self.start > self.end || self.end > 100 {
            return Err(ScrapeError::Config(format!(
                "progress band {}..{} must be ordered and within 0..=100",
                self.start, self.end
            )));
        }
        Ok(())
    }
}
