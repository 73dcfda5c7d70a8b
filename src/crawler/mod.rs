//! Crawler module for listing page fetching and counting
//!
//! This module contains the core scanning logic, including:
//! - HTTP fetching with a randomized User-Agent
//! - Parsed document handling
//! - Pagination and thread extraction from listing pages
//! - Per-prefix scan coordination

mod document;
mod fetcher;
mod page;
mod scanner;
mod user_agent;

pub use document::Document;
pub use fetcher::{build_http_client, QueryParams, Website};
pub use page::{PageAnalyzer, ThreadContainer};
pub use scanner::{CategoryScanner, PrefixTally, ScanReport, ScanResult};
pub use user_agent::UserAgentPool;

use crate::config::Config;
use crate::progress::ScanProgress;
use crate::token::AuthToken;
use crate::CensusError;

/// Runs a complete scan
///
/// This is the main entry point for counting threads. It will:
/// 1. Build the HTTP client and User-Agent pool
/// 2. Walk every page of the category once per configured prefix
/// 3. Return the per-prefix totals with timing
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `token` - Session token sent as the auth cookie
/// * `progress` - Receives a running total after every page
///
/// # Returns
///
/// * `Ok(ScanReport)` - All prefixes were scanned
/// * `Err(CensusError)` - The first fetch or layout error encountered
pub async fn scan(
    config: Config,
    token: &AuthToken,
    progress: &mut dyn ScanProgress,
) -> Result<ScanReport, CensusError> {
    CategoryScanner::new(config)?.run(token, progress).await
}
