//! Category scanner - per-prefix thread counting
//!
//! For every prefix filter the scanner:
//! 1. Fetches the filtered category index and reads its page count
//! 2. Fetches `page-1` through `page-N` in order
//! 3. Adds up the thread count of each page
//!
//! Filters and pages are processed strictly one after another. The first
//! fetch or layout error aborts the whole scan.

use crate::config::{Config, PrefixFilter};
use crate::crawler::fetcher::{build_http_client, QueryParams, Website};
use crate::crawler::page::PageAnalyzer;
use crate::crawler::user_agent::UserAgentPool;
use crate::progress::ScanProgress;
use crate::token::AuthToken;
use crate::CensusError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::BTreeMap;
use url::Url;

/// Thread total for one prefix filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTally {
    pub name: String,
    pub prefix_id: u32,
    /// Listing pages visited
    pub pages: u32,
    /// Threads counted across those pages
    pub threads: u64,
}

/// Per-filter totals, in the order the filters were scanned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    tallies: Vec<PrefixTally>,
}

impl ScanResult {
    /// Thread total of the named filter
    pub fn get(&self, name: &str) -> Option<u64> {
        self.tallies
            .iter()
            .find(|tally| tally.name == name)
            .map(|tally| tally.threads)
    }

    pub fn tallies(&self) -> &[PrefixTally] {
        &self.tallies
    }

    /// Sum over all filters
    pub fn total_threads(&self) -> u64 {
        self.tallies.iter().map(|tally| tally.threads).sum()
    }

    /// Appends the total of one more filter
    pub fn push(&mut self, tally: PrefixTally) {
        self.tallies.push(tally);
    }
}

/// A finished scan with its timing
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub category_id: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub result: ScanResult,
}

impl ScanReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Walks a category once per prefix filter
#[derive(Debug)]
pub struct CategoryScanner {
    config: Config,
    client: Client,
    agents: UserAgentPool,
    base_url: Url,
}

impl CategoryScanner {
    /// Creates a scanner for an already validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CategoryScanner)` - Ready to scan
    /// * `Err(CensusError)` - The base URL is unusable or the HTTP client failed to build
    pub fn new(config: Config) -> Result<Self, CensusError> {
        let base_url = Url::parse(&config.forum.base_url)?;
        let client = build_http_client()?;
        let agents = UserAgentPool::new(config.http.user_agents.clone());

        Ok(Self {
            config,
            client,
            agents,
            base_url,
        })
    }

    /// Scans the configured category with the configured prefixes
    pub async fn run(
        &self,
        token: &AuthToken,
        progress: &mut dyn ScanProgress,
    ) -> Result<ScanReport, CensusError> {
        let category_id = self.config.forum.category_id;
        let started_at = Utc::now();

        tracing::info!(
            "Scanning category {} with {} prefix(es)",
            category_id,
            self.config.prefixes.len()
        );

        let result = self
            .scan(category_id, &self.config.prefixes, token, progress)
            .await?;

        Ok(ScanReport {
            category_id,
            started_at,
            finished_at: Utc::now(),
            result,
        })
    }

    /// Counts the threads of `category_id` once per filter
    ///
    /// Any error aborts the scan; no partial result is returned.
    pub async fn scan(
        &self,
        category_id: u32,
        filters: &[PrefixFilter],
        token: &AuthToken,
        progress: &mut dyn ScanProgress,
    ) -> Result<ScanResult, CensusError> {
        let mut result = ScanResult::default();

        for filter in filters {
            let tally = self.scan_filter(category_id, filter, token, progress).await?;
            result.push(tally);
        }

        Ok(result)
    }

    async fn scan_filter(
        &self,
        category_id: u32,
        filter: &PrefixFilter,
        token: &AuthToken,
        progress: &mut dyn ScanProgress,
    ) -> Result<PrefixTally, CensusError> {
        let params = self.filter_params(filter);
        let category_url = self.category_url(category_id, None);

        let index = self.website(category_url, token, &params);
        let page_indexes = PageAnalyzer::new(index.document().await?)
            .page_indexes()
            .map_err(|source| CensusError::Page {
                url: index.url().to_string(),
                source,
            })?;
        let pages = *page_indexes.end();

        tracing::debug!("{}: {} page(s) to scan", filter.name, pages);
        progress.filter_started(filter, pages);

        let mut threads: u64 = 0;
        for page_index in page_indexes {
            let page_url = self.category_url(category_id, Some(page_index));
            let website = self.website(page_url, token, &params);

            let count = PageAnalyzer::new(website.document().await?)
                .thread_count()
                .map_err(|source| CensusError::Page {
                    url: website.url().to_string(),
                    source,
                })?;

            threads += count as u64;
            tracing::debug!(
                "{}: page {}/{} has {} threads ({} total)",
                filter.name,
                page_index,
                pages,
                count,
                threads
            );
            progress.page_counted(filter, page_index, threads);
        }

        progress.filter_finished(filter, threads);
        tracing::debug!("{}: {} threads across {} page(s)", filter.name, threads, pages);

        Ok(PrefixTally {
            name: filter.name.clone(),
            prefix_id: filter.id,
            pages,
            threads,
        })
    }

    /// `state=<state>&prefix_id[]=<id>`
    fn filter_params(&self, filter: &PrefixFilter) -> QueryParams {
        vec![
            ("state".to_string(), self.config.forum.thread_state.clone()),
            ("prefix_id[]".to_string(), filter.id.to_string()),
        ]
    }

    /// `<base>/forums/<category>` or `<base>/forums/<category>/page-<n>`
    fn category_url(&self, category_id: u32, page: Option<u32>) -> Url {
        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();

        let path = match page {
            Some(page) => format!("{}/forums/{}/page-{}", base_path, category_id, page),
            None => format!("{}/forums/{}", base_path, category_id),
        };
        url.set_path(&path);
        url
    }

    fn website(&self, url: Url, token: &AuthToken, params: &QueryParams) -> Website {
        let cookies = BTreeMap::from([(
            self.config.auth.cookie_name.clone(),
            token.as_str().to_string(),
        )]);

        Website::new(self.client.clone(), url, &self.agents)
            .with_cookies(cookies)
            .with_params(params.clone())
            .with_headers(self.config.http.headers.clone())
    }
}
