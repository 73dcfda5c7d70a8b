//! Listing page analysis
//!
//! A category listing page carries two things the scanner needs:
//! - the pagination control (`div.PageNav`), whose last link is the highest page
//! - the thread list, inside either the sticky or the latest threads container
//!
//! Both are located by the forum's fixed class names. Anything else on the page
//! is ignored.

use crate::crawler::document::Document;
use crate::{PageError, PageResult};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::ops::RangeInclusive;

static PAGE_NAV: Lazy<Selector> = Lazy::new(|| selector("div.PageNav"));
static PAGE_LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
static STICKY_THREADS: Lazy<Selector> = Lazy::new(|| selector("div.stickyThreads"));
static LATEST_THREADS: Lazy<Selector> =
    Lazy::new(|| selector("div.latestThreads._insertLoadedContent"));
static THREAD_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^thread-[0-9]+$").expect("thread id pattern is valid"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Which thread container a page exposes
#[derive(Debug, Clone, Copy)]
pub enum ThreadContainer<'a> {
    Sticky(ElementRef<'a>),
    Latest(ElementRef<'a>),
    Missing,
}

impl<'a> ThreadContainer<'a> {
    pub fn element(&self) -> Option<ElementRef<'a>> {
        match self {
            ThreadContainer::Sticky(element) | ThreadContainer::Latest(element) => Some(*element),
            ThreadContainer::Missing => None,
        }
    }
}

/// Read-only queries over one listing page
#[derive(Debug, Clone, Copy)]
pub struct PageAnalyzer<'a> {
    document: &'a Document,
}

impl<'a> PageAnalyzer<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Total number of listing pages
    ///
    /// Returns 1 when the page has no pagination control. Otherwise the text of
    /// the control's last link must be a positive integer.
    ///
    /// # Errors
    ///
    /// * `PageError::PageCount` - The last link is missing or not a page number
    pub fn page_count(&self) -> PageResult<u32> {
        let Some(navigation) = self.document.html().select(&PAGE_NAV).next() else {
            return Ok(1);
        };

        let text = navigation
            .select(&PAGE_LINK)
            .last()
            .map(|link| link.text().collect::<String>())
            .unwrap_or_default();
        let text = text.trim();

        match text.parse::<u32>() {
            Ok(count) if count >= 1 => Ok(count),
            _ => Err(PageError::PageCount {
                text: text.to_string(),
            }),
        }
    }

    /// Page indexes to visit, always starting at 1
    pub fn page_indexes(&self) -> PageResult<RangeInclusive<u32>> {
        Ok(1..=self.page_count()?)
    }

    /// Locates the thread container, preferring the sticky one
    pub fn thread_container(&self) -> ThreadContainer<'a> {
        let html = self.document.html();

        if let Some(sticky) = html.select(&STICKY_THREADS).next() {
            ThreadContainer::Sticky(sticky)
        } else if let Some(latest) = html.select(&LATEST_THREADS).next() {
            ThreadContainer::Latest(latest)
        } else {
            ThreadContainer::Missing
        }
    }

    /// Thread elements of the page, in document order
    ///
    /// The iterator walks the already-parsed tree; calling this again starts a
    /// fresh walk over the same nodes.
    ///
    /// # Errors
    ///
    /// * `PageError::Structure` - Neither thread container is present
    pub fn threads(&self) -> PageResult<impl Iterator<Item = ElementRef<'a>> + 'a> {
        let container = self
            .thread_container()
            .element()
            .ok_or(PageError::Structure)?;

        Ok(container
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(is_thread))
    }

    /// Number of thread elements on the page
    pub fn thread_count(&self) -> PageResult<usize> {
        Ok(self.threads()?.count())
    }
}

fn is_thread(element: &ElementRef<'_>) -> bool {
    element
        .value()
        .id()
        .is_some_and(|id| THREAD_ID.is_match(id))
}
