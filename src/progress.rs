//! Scan progress reporting
//!
//! The scanner reports after every page; how that is shown is up to the
//! `ScanProgress` implementation handed to it.

use crate::config::PrefixFilter;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Receives running totals while a scan is in flight
pub trait ScanProgress {
    /// A filter is about to be walked across `pages` pages
    fn filter_started(&mut self, _filter: &PrefixFilter, _pages: u32) {}

    /// Page `page` of `filter` was counted; `cumulative` is the filter's total so far
    fn page_counted(&mut self, filter: &PrefixFilter, page: u32, cumulative: u64);

    /// All pages of `filter` were counted
    fn filter_finished(&mut self, _filter: &PrefixFilter, _total: u64) {}
}

/// Discards every update
#[derive(Debug, Default)]
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn page_counted(&mut self, _filter: &PrefixFilter, _page: u32, _cumulative: u64) {}
}

/// Writes updates as tracing events
#[derive(Debug, Default)]
pub struct LogProgress;

impl ScanProgress for LogProgress {
    fn filter_started(&mut self, filter: &PrefixFilter, pages: u32) {
        tracing::info!("{}: scanning {} page(s)", filter.name, pages);
    }

    fn page_counted(&mut self, filter: &PrefixFilter, page: u32, cumulative: u64) {
        tracing::info!("{}: page {} done, {} threads so far", filter.name, page, cumulative);
    }

    fn filter_finished(&mut self, filter: &PrefixFilter, total: u64) {
        tracing::info!("{}: {} threads", filter.name, total);
    }
}

/// One terminal progress bar per filter, labelled with the running total
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
    hidden: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            bar: None,
            hidden: false,
        }
    }

    /// Tracks state without drawing anything
    pub fn hidden() -> Self {
        Self {
            bar: None,
            hidden: true,
        }
    }

    /// Position of the current bar, if one is active
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }

    fn create_bar(&self, pages: u32) -> ProgressBar {
        let target = if self.hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };

        let bar = ProgressBar::with_draw_target(Some(u64::from(pages)), target);
        bar.set_style(
            ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} pages ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanProgress for ConsoleProgress {
    fn filter_started(&mut self, filter: &PrefixFilter, pages: u32) {
        let bar = self.create_bar(pages);
        bar.set_message(format!("{}: 0", filter.name));
        self.bar = Some(bar);
    }

    fn page_counted(&mut self, filter: &PrefixFilter, _page: u32, cumulative: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
            bar.set_message(format!("{}: {}", filter.name, cumulative));
        }
    }

    fn filter_finished(&mut self, filter: &PrefixFilter, total: u64) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("{}: {}", filter.name, total));
        }
    }
}
