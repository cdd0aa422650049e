use crate::catalog::{CatalogKey, CatalogSource};
use crate::errors::{CatalogError, CatalogResult};
use async_trait::async_trait;
use schema::{sprite_url, CatalogEntry, CreatureRecord, CreatureType, StatBlock};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

// Include the generated catalog blob and name index
include!(concat!(env!("OUT_DIR"), "/generated_catalog.rs"));

// Decoded once, on first use
static COMPILED_CATALOG: LazyLock<Result<Vec<CreatureRecord>, CatalogError>> =
    LazyLock::new(get_compiled_catalog);

fn get_compiled_catalog() -> Result<Vec<CreatureRecord>, CatalogError> {
    postcard::from_bytes(CATALOG_BLOB)
        .map_err(|e| CatalogError::MalformedData(format!("bundled catalog: {}", e)))
}

/// Row format of `data/catalog.ron` and of catalog files given at runtime.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: u16,
    name: String,
    types: Vec<CreatureType>,
    stats: StatBlock,
    #[serde(default)]
    height: u16,
    #[serde(default)]
    weight: u16,
    #[serde(default)]
    abilities: Vec<String>,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Clone)]
enum Storage {
    Compiled,
    Custom {
        records: Vec<CreatureRecord>,
        by_name: HashMap<String, usize>,
    },
}

/// Catalog served from memory: the records compiled into the binary, or a
/// RON catalog file loaded at startup.
#[derive(Debug, Clone)]
pub struct BundledCatalog {
    storage: Storage,
    limit: usize,
}

impl Default for BundledCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BundledCatalog {
    /// The catalog compiled in from `data/catalog.ron`.
    pub fn new() -> Self {
        Self {
            storage: Storage::Compiled,
            limit: usize::MAX,
        }
    }

    /// Serve only the first `limit` records; later ones are not found.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Build a catalog from records already in memory. Names are matched lowercase.
    pub fn from_records(records: Vec<CreatureRecord>) -> CatalogResult<Self> {
        let mut by_name = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(CatalogError::MalformedData(format!(
                    "record #{} has an empty name",
                    record.id
                )));
            }
            if by_name.insert(record.name.to_lowercase(), position).is_some() {
                return Err(CatalogError::MalformedData(format!(
                    "duplicate creature name {}",
                    record.name
                )));
            }
        }
        Ok(Self {
            storage: Storage::Custom { records, by_name },
            limit: usize::MAX,
        })
    }

    /// Parse a catalog in the `data/catalog.ron` row format.
    pub fn from_ron_str(source: &str) -> CatalogResult<Self> {
        let rows: Vec<CatalogRow> = ron::from_str(source)
            .map_err(|e| CatalogError::MalformedData(format!("catalog file: {}", e)))?;
        let records = rows
            .into_iter()
            .map(|row| CreatureRecord {
                id: row.id,
                image: row.image.unwrap_or_else(|| sprite_url(row.id)),
                name: row.name.to_lowercase(),
                types: row.types,
                stats: row.stats,
                height: row.height,
                weight: row.weight,
                abilities: row.abilities,
            })
            .collect();
        Self::from_records(records)
    }

    /// All records in dex order, up to the limit.
    pub fn records(&self) -> CatalogResult<&[CreatureRecord]> {
        let records: &[CreatureRecord] = match &self.storage {
            Storage::Compiled => COMPILED_CATALOG.as_ref().map_err(Clone::clone)?,
            Storage::Custom { records, .. } => records,
        };
        Ok(&records[..records.len().min(self.limit)])
    }

    fn position_of_name(&self, name: &str) -> Option<usize> {
        match &self.storage {
            Storage::Compiled => CATALOG_NAME_INDEX.get(name).copied(),
            Storage::Custom { by_name, .. } => by_name.get(name).copied(),
        }
    }

    pub fn get(&self, key: &CatalogKey) -> CatalogResult<&CreatureRecord> {
        let records = self.records()?;
        let found = match key {
            CatalogKey::Id(id) => records.iter().find(|record| record.id == *id),
            CatalogKey::Name(name) => self
                .position_of_name(&name.to_lowercase())
                .and_then(|position| records.get(position)),
        };
        found.ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }
}

#[async_trait]
impl CatalogSource for BundledCatalog {
    fn source_name(&self) -> &'static str {
        "bundled"
    }

    async fn list(&self, limit: usize) -> CatalogResult<Vec<CatalogEntry>> {
        Ok(self
            .records()?
            .iter()
            .take(limit)
            .map(CatalogEntry::from)
            .collect())
    }

    async fn fetch_record(&self, key: &CatalogKey) -> CatalogResult<CreatureRecord> {
        debug!(key = %key, "bundled catalog lookup");
        self.get(key).cloned()
    }

    async fn fetch_all(&self, limit: usize) -> CatalogResult<Vec<CreatureRecord>> {
        Ok(self.records()?.iter().take(limit).cloned().collect())
    }
}
