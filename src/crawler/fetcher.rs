//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scanner:
//! - Building the shared HTTP client
//! - Decorating each GET with a random User-Agent, cookies and query parameters
//! - Memoizing the response body and its parsed document per page
//! - Error classification
//!
//! There is no retry logic. A failed request is reported once and the caller
//! decides what to do with it.

use crate::crawler::document::Document;
use crate::crawler::user_agent::UserAgentPool;
use crate::{FetchError, FetchResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, USER_AGENT};
use reqwest::Client;
use std::cell::OnceCell;
use std::collections::BTreeMap;
use url::Url;

/// Ordered query parameters; keys may repeat (`prefix_id[]`)
pub type QueryParams = Vec<(String, String)>;

/// Builds the HTTP client shared by every page request
///
/// The client keeps no cookie store, so no session state leaks from one
/// request into the next. User-Agent is set per request, not here.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder().gzip(true).brotli(true).build()
}

/// A single listing page, fetched lazily and at most once
///
/// # Example
///
/// ```no_run
/// use prefix_census::crawler::{build_http_client, UserAgentPool, Website};
/// use url::Url;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = build_http_client()?;
/// let agents = UserAgentPool::default();
/// let page = Website::new(client, Url::parse("https://zelenka.guru/forums/663")?, &agents)
///     .with_params(vec![("state".into(), "active".into())]);
///
/// let document = page.document().await?;
/// # let _ = document;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Website {
    client: Client,
    url: Url,
    user_agent: String,
    cookies: BTreeMap<String, String>,
    params: QueryParams,
    headers: BTreeMap<String, String>,
    markup: tokio::sync::OnceCell<String>,
    document: OnceCell<Document>,
}

impl Website {
    /// Creates a page handle; no request is sent until the body is needed
    pub fn new(client: Client, url: Url, agents: &UserAgentPool) -> Self {
        Self {
            client,
            url,
            user_agent: agents.random().to_string(),
            cookies: BTreeMap::new(),
            params: Vec::new(),
            headers: BTreeMap::new(),
            markup: tokio::sync::OnceCell::new(),
            document: OnceCell::new(),
        }
    }

    pub fn with_cookies(mut self, cookies: BTreeMap<String, String>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Extra headers; these replace the random User-Agent on collision
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw response body, fetched on first access
    pub async fn markup(&self) -> FetchResult<&str> {
        let markup = self.markup.get_or_try_init(|| self.fetch()).await?;
        Ok(markup.as_str())
    }

    /// Parsed response body, built on first access
    pub async fn document(&self) -> FetchResult<&Document> {
        if let Some(document) = self.document.get() {
            return Ok(document);
        }

        let markup = self.markup().await?;
        Ok(self.document.get_or_init(|| Document::parse(markup)))
    }

    /// Assembles the header set: random User-Agent, Cookie, then caller headers
    fn request_headers(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            USER_AGENT,
            header_value(USER_AGENT.as_str(), &self.user_agent)?,
        );

        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ");
            headers.insert(COOKIE, header_value(COOKIE.as_str(), &cookie)?);
        }

        for (name, value) in &self.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            headers.insert(header_name, header_value(name, value)?);
        }

        Ok(headers)
    }

    /// Sends the GET and reads the body as text
    async fn fetch(&self) -> FetchResult<String> {
        let url = self.url.to_string();
        let headers = self.request_headers()?;

        tracing::debug!("GET {} {:?}", url, self.params);

        let response = self
            .client
            .get(self.url.clone())
            .headers(headers)
            .query(&self.params)
            .send()
            .await
            .map_err(|e| classify_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Body {
                url: url.clone(),
                source,
            })?;

        tracing::trace!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Maps a transport error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            source: error,
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}
