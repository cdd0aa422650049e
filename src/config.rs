//! Runtime configuration read from the environment.

use crate::catalog::pokeapi::DEFAULT_API_BASE_URL;
use crate::catalog::DEFAULT_CATALOG_LIMIT;
use crate::dex::DEFAULT_PAGE_SIZE;
use crate::guess::DEFAULT_GUESS_SECONDS;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Where creature data comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CatalogKind {
    /// Records compiled into the binary (or `ARENA_CATALOG_FILE`).
    #[default]
    Bundled,
    /// The public REST API.
    Remote,
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bundled" | "local" => Ok(CatalogKind::Bundled),
            "remote" | "pokeapi" => Ok(CatalogKind::Remote),
            other => Err(format!("unknown catalog kind '{}'", other)),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    pub catalog: CatalogKind,
    pub catalog_file: Option<PathBuf>,
    pub api_base_url: String,
    pub catalog_limit: u16,
    pub page_size: usize,
    pub guess_seconds: u32,
    pub http_timeout: Duration,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogKind::Bundled,
            catalog_file: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            guess_seconds: DEFAULT_GUESS_SECONDS,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl ArenaConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_CATALOG` - `bundled` (default) or `remote`
    /// - `ARENA_CATALOG_FILE` - RON catalog to serve instead of the compiled one
    /// - `ARENA_API_BASE_URL` - REST base URL (default: https://pokeapi.co/api/v2)
    /// - `ARENA_CATALOG_LIMIT` - number of creatures (default: 151)
    /// - `ARENA_PAGE_SIZE` - dex entries per page (default: 20, min 1)
    /// - `ARENA_GUESS_SECONDS` - guessing-game countdown (default: 15, min 1)
    /// - `ARENA_HTTP_TIMEOUT_SECS` - REST request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(kind) = read_var::<CatalogKind, _>(&lookup, "ARENA_CATALOG") {
            config.catalog = kind;
        }
        if let Some(path) = lookup("ARENA_CATALOG_FILE").filter(|p| !p.trim().is_empty()) {
            config.catalog_file = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup("ARENA_API_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(limit) = read_var::<u16, _>(&lookup, "ARENA_CATALOG_LIMIT") {
            config.catalog_limit = limit.max(1);
        }
        if let Some(size) = read_var::<usize, _>(&lookup, "ARENA_PAGE_SIZE") {
            config.page_size = size.max(1);
        }
        if let Some(seconds) = read_var::<u32, _>(&lookup, "ARENA_GUESS_SECONDS") {
            config.guess_seconds = seconds.max(1);
        }
        if let Some(seconds) = read_var::<u64, _>(&lookup, "ARENA_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(seconds.max(1));
        }

        config
    }
}

fn read_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)?.trim().parse().ok()
}
