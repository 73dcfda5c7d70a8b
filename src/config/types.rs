use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Prefix-Census
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub forum: ForumConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(rename = "prefix", default = "default_prefixes")]
    pub prefixes: Vec<PrefixFilter>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forum: ForumConfig::default(),
            auth: AuthConfig::default(),
            http: HttpConfig::default(),
            prefixes: default_prefixes(),
        }
    }
}

/// Which forum and category to scan
#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// Scheme and host of the forum, e.g. `https://zelenka.guru`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Numeric id of the category under `/forums/<id>`
    #[serde(rename = "category-id", default = "default_category_id")]
    pub category_id: u32,

    /// Value of the `state` query parameter
    #[serde(rename = "thread-state", default = "default_thread_state")]
    pub thread_state: String,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            category_id: default_category_id(),
            thread_state: default_thread_state(),
        }
    }
}

/// Authentication cookie settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Name of the cookie carrying the token
    #[serde(rename = "cookie-name", default = "default_cookie_name")]
    pub cookie_name: String,

    /// File whose first line is the token
    #[serde(rename = "token-path", default = "default_token_path")]
    pub token_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            token_path: default_token_path(),
        }
    }
}

/// Request decoration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Browser signatures to pick from; the built-in pool is used when empty
    #[serde(rename = "user-agents", default)]
    pub user_agents: Vec<String>,

    /// Extra headers sent with every request. These win over the random User-Agent.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// One forum tag used to filter the category listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrefixFilter {
    /// Display name
    pub name: String,

    /// Forum-side prefix id
    pub id: u32,
}

impl PrefixFilter {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

fn default_base_url() -> String {
    "https://zelenka.guru".to_string()
}

fn default_category_id() -> u32 {
    663
}

fn default_thread_state() -> String {
    "active".to_string()
}

fn default_cookie_name() -> String {
    "dfuid".to_string()
}

fn default_token_path() -> String {
    "bin/authorisation/auth_token.txt".to_string()
}

/// The six skill-level prefixes of the default category, in report order
pub fn default_prefixes() -> Vec<PrefixFilter> {
    vec![
        PrefixFilter::new("Новичок", 464),
        PrefixFilter::new("Любитель", 217),
        PrefixFilter::new("Художник", 404),
        PrefixFilter::new("Полупрофи", 216),
        PrefixFilter::new("Профи", 215),
        PrefixFilter::new("Студия", 496),
    ]
}
