//! HTTP catalog backed by the public PokeAPI REST service.

use crate::catalog::{CatalogKey, CatalogSource, DEFAULT_CATALOG_LIMIT};
use crate::errors::{CatalogError, CatalogResult};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use schema::{
    sprite_url, CatalogEntry, CreatureRecord, CreatureType, EvolutionStage, SpeciesDetails,
    StatBlock,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListPayload {
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct SpritesPayload {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatPayload {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct TypeSlotPayload {
    slot: u8,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct AbilitySlotPayload {
    slot: u8,
    ability: NamedResource,
}

#[derive(Debug, Deserialize)]
struct PokemonPayload {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    #[serde(default)]
    abilities: Vec<AbilitySlotPayload>,
    sprites: SpritesPayload,
    stats: Vec<StatPayload>,
    types: Vec<TypeSlotPayload>,
}

#[derive(Debug, Deserialize)]
struct FlavorTextPayload {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Debug, Deserialize)]
struct ApiLink {
    url: String,
}

#[derive(Debug, Deserialize)]
struct SpeciesPayload {
    id: u16,
    name: String,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextPayload>,
    habitat: Option<NamedResource>,
    /// Eighths female, -1 for genderless.
    gender_rate: i8,
    capture_rate: u8,
    #[serde(default)]
    egg_groups: Vec<NamedResource>,
    evolution_chain: Option<ApiLink>,
}

#[derive(Debug, Deserialize)]
struct EvolutionDetailPayload {
    min_level: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct ChainLinkPayload {
    species: NamedResource,
    #[serde(default)]
    evolution_details: Vec<EvolutionDetailPayload>,
    #[serde(default)]
    evolves_to: Vec<ChainLinkPayload>,
}

#[derive(Debug, Deserialize)]
struct EvolutionChainPayload {
    chain: ChainLinkPayload,
}

/// Catalog client for `{base_url}/pokemon` and `{base_url}/pokemon-species`.
///
/// Only dex numbers `1..=limit` are served. Names go into the URL as a
/// single escaped path segment and must be lowercase slugs.
pub struct PokeApiCatalog {
    base_url: Url,
    http_client: reqwest::Client,
    limit: u16,
}

impl PokeApiCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> CatalogResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(format!("cannot build HTTP client: {}", e)))?;
        Self::with_client(base_url, http_client)
    }

    pub fn with_client(base_url: &str, http_client: reqwest::Client) -> CatalogResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| CatalogError::Unavailable(format!("invalid API base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::Unavailable(format!(
                "API base URL {} cannot take a path",
                base_url
            )));
        }
        Ok(Self {
            base_url,
            http_client,
            limit: DEFAULT_CATALOG_LIMIT,
        })
    }

    /// Serve only dex numbers `1..=limit`.
    pub fn with_limit(mut self, limit: u16) -> Self {
        self.limit = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL with `segments` appended, each percent-encoded as one segment.
    fn endpoint(&self, segments: &[&str]) -> CatalogResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CatalogError::Unavailable(format!("API base URL {} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments.iter().copied());
        Ok(url)
    }

    fn in_range(&self, id: u16) -> bool {
        (1..=self.limit).contains(&id)
    }

    /// The path segment for `key`, or `NotFound` without touching the network.
    fn segment_for(&self, key: &CatalogKey) -> CatalogResult<String> {
        if let CatalogKey::Id(id) = key {
            if !self.in_range(*id) {
                return Err(CatalogError::NotFound(key.to_string()));
            }
        }
        key.path_segment().ok_or_else(|| {
            debug!(key = %key, "rejecting name that is not a catalog slug");
            CatalogError::NotFound(key.to_string())
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, key: &str) -> CatalogResult<T> {
        debug!(url = %url, "fetching from PokeAPI");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            warn!(url = %url, %status, "PokeAPI request failed");
            return Err(CatalogError::Unavailable(format!(
                "{} answered with status {}",
                url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("cannot read body of {}: {}", url, e)))?;

        serde_json::from_str(&body)
            .map_err(|e| CatalogError::MalformedData(format!("{}: {}", url, e)))
    }

    /// Follow the species' chain link. Links leaving the API host are refused.
    async fn fetch_evolution_chain(&self, link: &ApiLink) -> CatalogResult<Vec<EvolutionStage>> {
        let url = Url::parse(&link.url)
            .map_err(|e| CatalogError::MalformedData(format!("evolution chain link {}: {}", link.url, e)))?;
        if url.origin() != self.base_url.origin() {
            return Err(CatalogError::MalformedData(format!(
                "evolution chain link {} leaves {}",
                url, self.base_url
            )));
        }
        let payload: EvolutionChainPayload = self.get_json(url, "evolution chain").await?;
        let mut stages = Vec::new();
        flatten_chain(&payload.chain, &mut stages);
        Ok(stages)
    }
}

#[async_trait]
impl CatalogSource for PokeApiCatalog {
    fn source_name(&self) -> &'static str {
        "pokeapi"
    }

    async fn list(&self, limit: usize) -> CatalogResult<Vec<CatalogEntry>> {
        let limit = limit.min(usize::from(self.limit));
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut url = self.endpoint(&["pokemon"])?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        let payload: ListPayload = self.get_json(url, "pokemon list").await?;
        Ok(entries_from_list(payload))
    }

    async fn fetch_record(&self, key: &CatalogKey) -> CatalogResult<CreatureRecord> {
        let segment = self.segment_for(key)?;
        let url = self.endpoint(&["pokemon", &segment])?;
        let payload: PokemonPayload = self.get_json(url, &key.to_string()).await?;
        let record = record_from_payload(payload)?;
        if !self.in_range(record.id) {
            debug!(key = %key, id = record.id, "record beyond catalog limit");
            return Err(CatalogError::NotFound(key.to_string()));
        }
        Ok(record)
    }

    async fn fetch_species(&self, key: &CatalogKey) -> CatalogResult<Option<SpeciesDetails>> {
        let segment = self.segment_for(key)?;
        let url = self.endpoint(&["pokemon-species", &segment])?;
        let payload: SpeciesPayload = self.get_json(url, &key.to_string()).await?;
        if !self.in_range(payload.id) {
            return Err(CatalogError::NotFound(key.to_string()));
        }
        let evolution_chain = match &payload.evolution_chain {
            Some(link) => self.fetch_evolution_chain(link).await?,
            None => Vec::new(),
        };
        debug!(species = %payload.name, stages = evolution_chain.len(), "species fetched");
        Ok(Some(species_from_payload(payload, evolution_chain)))
    }
}

/// Trailing number of a resource URL such as `.../pokemon/25/`.
fn id_from_resource_url(url: &str) -> Option<u16> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<u16>().ok())
}

/// Listing results carry the id only inside the resource URL.
fn entries_from_list(payload: ListPayload) -> Vec<CatalogEntry> {
    payload
        .results
        .into_iter()
        .enumerate()
        .map(|(position, resource)| {
            let id = id_from_resource_url(&resource.url)
                .unwrap_or_else(|| u16::try_from(position + 1).unwrap_or(u16::MAX));
            CatalogEntry {
                id,
                name: resource.name,
            }
        })
        .collect()
}

fn record_from_payload(payload: PokemonPayload) -> CatalogResult<CreatureRecord> {
    let mut stats = StatBlock::default();
    let mut seen = 0u8;
    for entry in &payload.stats {
        let target = match entry.stat.name.as_str() {
            "hp" => &mut stats.hp,
            "attack" => &mut stats.attack,
            "defense" => &mut stats.defense,
            "special-attack" => &mut stats.special_attack,
            "special-defense" => &mut stats.special_defense,
            "speed" => &mut stats.speed,
            _ => continue,
        };
        *target = entry.base_stat;
        seen += 1;
    }
    if seen < 6 {
        return Err(CatalogError::MalformedData(format!(
            "{} is missing base stats",
            payload.name
        )));
    }

    let mut slots: Vec<&TypeSlotPayload> = payload.types.iter().collect();
    slots.sort_by_key(|slot| slot.slot);
    let types = slots
        .into_iter()
        .map(|slot| {
            CreatureType::from_str(&slot.kind.name).map_err(|_| {
                CatalogError::MalformedData(format!(
                    "{} has unknown type {}",
                    payload.name, slot.kind.name
                ))
            })
        })
        .collect::<CatalogResult<Vec<_>>>()?;

    let mut abilities: Vec<&AbilitySlotPayload> = payload.abilities.iter().collect();
    abilities.sort_by_key(|slot| slot.slot);
    let abilities = abilities
        .into_iter()
        .map(|slot| slot.ability.name.clone())
        .collect();

    Ok(CreatureRecord {
        id: payload.id,
        image: payload
            .sprites
            .front_default
            .unwrap_or_else(|| sprite_url(payload.id)),
        name: payload.name,
        types,
        stats,
        height: payload.height,
        weight: payload.weight,
        abilities,
    })
}

/// Depth first, so a line reads base form first and branches in API order.
fn flatten_chain(link: &ChainLinkPayload, stages: &mut Vec<EvolutionStage>) {
    stages.push(EvolutionStage {
        id: id_from_resource_url(&link.species.url),
        name: link.species.name.clone(),
        min_level: link
            .evolution_details
            .iter()
            .find_map(|detail| detail.min_level),
    });
    for next in &link.evolves_to {
        flatten_chain(next, stages);
    }
}

fn species_from_payload(payload: SpeciesPayload, evolution_chain: Vec<EvolutionStage>) -> SpeciesDetails {
    // Game text wraps with \n and \u{c}; collapse to single spaces.
    let flavor_text = payload
        .flavor_text_entries
        .iter()
        .find(|entry| entry.language.name == "en")
        .map(|entry| entry.flavor_text.split_whitespace().collect::<Vec<_>>().join(" "));

    SpeciesDetails {
        flavor_text,
        habitat: payload.habitat.map(|habitat| habitat.name),
        gender_rate: u8::try_from(payload.gender_rate).ok(),
        capture_rate: payload.capture_rate,
        egg_groups: payload.egg_groups.into_iter().map(|group| group.name).collect(),
        evolution_chain,
    }
}
