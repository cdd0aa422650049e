//! Read-only creature catalog.
//!
//! `CatalogSource` is the seam between the battle/dex features and wherever
//! the creature data comes from: the records compiled into the binary
//! (`BundledCatalog`) or the public REST API (`PokeApiCatalog`).

pub mod bundled;
pub mod pokeapi;

use crate::config::{ArenaConfig, CatalogKind};
use crate::errors::{CatalogError, CatalogResult};
use async_trait::async_trait;
use futures::future::try_join_all;
use schema::{CatalogEntry, Combatant, CreatureRecord, SpeciesDetails};
use std::fmt;
use std::sync::Arc;

pub use bundled::BundledCatalog;
pub use pokeapi::PokeApiCatalog;

/// Number of creatures in the catalog the application works with.
pub const DEFAULT_CATALOG_LIMIT: u16 = 151;

/// Lookup key for a creature: dex number or lowercase name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    Id(u16),
    Name(String),
}

impl CatalogKey {
    /// Parse user input. All digits is an id, anything else a name.
    /// Returns `None` for blank input.
    pub fn parse(input: &str) -> Option<CatalogKey> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = trimmed.parse::<u16>() {
                return Some(CatalogKey::Id(id));
            }
        }
        Some(CatalogKey::Name(trimmed.to_lowercase()))
    }

    /// The path segment used by the REST source (`25` or `pikachu`).
    ///
    /// `None` when the name holds anything but lowercase ASCII letters,
    /// digits and dashes; no catalog name does.
    pub fn path_segment(&self) -> Option<String> {
        match self {
            CatalogKey::Id(id) => Some(id.to_string()),
            CatalogKey::Name(name) if is_slug(name) => Some(name.clone()),
            CatalogKey::Name(_) => None,
        }
    }
}

fn is_slug(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKey::Id(id) => write!(f, "#{}", id),
            CatalogKey::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u16> for CatalogKey {
    fn from(id: u16) -> Self {
        CatalogKey::Id(id)
    }
}

impl From<&str> for CatalogKey {
    fn from(name: &str) -> Self {
        CatalogKey::Name(name.trim().to_lowercase())
    }
}

/// Read-only provider of creature records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short label for logs.
    fn source_name(&self) -> &'static str;

    /// The first `limit` entries, in dex order.
    async fn list(&self, limit: usize) -> CatalogResult<Vec<CatalogEntry>>;

    async fn fetch_record(&self, key: &CatalogKey) -> CatalogResult<CreatureRecord>;

    /// Species lore and evolution line. Sources without lore return `None`.
    async fn fetch_species(&self, _key: &CatalogKey) -> CatalogResult<Option<SpeciesDetails>> {
        Ok(None)
    }

    async fn fetch_combatant(&self, key: &CatalogKey) -> CatalogResult<Combatant> {
        let record = self.fetch_record(key).await?;
        Ok(Combatant::from(&record))
    }

    /// Full records for the first `limit` entries. Details are fetched concurrently.
    async fn fetch_all(&self, limit: usize) -> CatalogResult<Vec<CreatureRecord>> {
        let entries = self.list(limit).await?;
        let keys: Vec<CatalogKey> = entries
            .iter()
            .map(|entry| CatalogKey::Name(entry.name.clone()))
            .collect();
        try_join_all(keys.iter().map(|key| self.fetch_record(key))).await
    }
}

/// Build the catalog the configuration asks for.
pub fn from_config(config: &ArenaConfig) -> CatalogResult<Arc<dyn CatalogSource>> {
    match config.catalog {
        CatalogKind::Bundled => match &config.catalog_file {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|e| {
                    CatalogError::Unavailable(format!("cannot read {}: {}", path.display(), e))
                })?;
                let catalog = BundledCatalog::from_ron_str(&source)?;
                Ok(Arc::new(catalog.with_limit(usize::from(config.catalog_limit))))
            }
            None => Ok(Arc::new(
                BundledCatalog::new().with_limit(usize::from(config.catalog_limit)),
            )),
        },
        CatalogKind::Remote => Ok(Arc::new(
            PokeApiCatalog::new(&config.api_base_url, config.http_timeout)?
                .with_limit(config.catalog_limit),
        )),
    }
}
