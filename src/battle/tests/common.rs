use crate::battle::engine;
use crate::battle::state::BattleState;
use crate::catalog::{CatalogKey, CatalogSource};
use crate::errors::{ArenaResult, CatalogError, CatalogResult};
use async_trait::async_trait;
use schema::{sprite_url, BaseStats, CatalogEntry, Combatant, CreatureRecord, CreatureType, StatBlock};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A builder for test combatants with round default stats.
///
/// # Example
/// ```
/// let fast = TestCombatantBuilder::new("jolteon").with_speed(130).build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    stats: BaseStats,
}

impl TestCombatantBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stats: BaseStats {
                hp: 50,
                attack: 50,
                defense: 50,
                speed: 50,
            },
        }
    }

    pub fn with_hp(mut self, hp: u16) -> Self {
        self.stats.hp = hp;
        self
    }

    pub fn with_attack(mut self, attack: u16) -> Self {
        self.stats.attack = attack;
        self
    }

    pub fn with_defense(mut self, defense: u16) -> Self {
        self.stats.defense = defense;
        self
    }

    pub fn with_speed(mut self, speed: u16) -> Self {
        self.stats.speed = speed;
        self
    }

    pub fn build(self) -> Combatant {
        Combatant::new(self.name, self.stats)
    }

    /// A catalog record carrying the same battle stats.
    pub fn build_record(self, id: u16) -> CreatureRecord {
        CreatureRecord {
            id,
            image: sprite_url(id),
            name: self.name,
            types: vec![CreatureType::Normal],
            stats: StatBlock {
                hp: self.stats.hp,
                attack: self.stats.attack,
                defense: self.stats.defense,
                special_attack: 50,
                special_defense: 50,
                speed: self.stats.speed,
            },
            height: 10,
            weight: 100,
            abilities: vec!["run-away".to_string()],
        }
    }
}

/// The two combatants used by the scripted battle tests.
///
/// A hits B for 40, B hits A for 25. A moves first and wins on its third attack.
pub fn scripted_pair() -> (Combatant, Combatant) {
    let first = TestCombatantBuilder::new("alpha")
        .with_hp(50)
        .with_attack(50)
        .with_defense(30)
        .with_speed(60)
        .build();
    let second = TestCombatantBuilder::new("beta")
        .with_hp(45)
        .with_attack(40)
        .with_defense(20)
        .with_speed(40)
        .build();
    (first, second)
}

/// Starts a battle, panicking if the pair is rejected.
pub fn create_test_battle(first: Combatant, second: Combatant) -> BattleState {
    assert_ok(engine::initialize(first, second))
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: ArenaResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

/// In-memory catalog that counts how often it is asked for records.
pub struct StubCatalog {
    records: Vec<CreatureRecord>,
    fetches: AtomicUsize,
}

impl StubCatalog {
    pub fn new(records: Vec<CreatureRecord>) -> Self {
        Self {
            records,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StubCatalog {
    fn source_name(&self) -> &'static str {
        "stub"
    }

    async fn list(&self, limit: usize) -> CatalogResult<Vec<CatalogEntry>> {
        Ok(self.records.iter().take(limit).map(CatalogEntry::from).collect())
    }

    async fn fetch_record(&self, key: &CatalogKey) -> CatalogResult<CreatureRecord> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.records
            .iter()
            .find(|record| match key {
                CatalogKey::Id(id) => record.id == *id,
                CatalogKey::Name(name) => record.name == *name,
            })
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }
}

/// Catalog whose every request fails as if the network were down.
pub struct OfflineCatalog;

#[async_trait]
impl CatalogSource for OfflineCatalog {
    fn source_name(&self) -> &'static str {
        "offline"
    }

    async fn list(&self, _limit: usize) -> CatalogResult<Vec<CatalogEntry>> {
        Err(CatalogError::Unavailable("connection refused".to_string()))
    }

    async fn fetch_record(&self, _key: &CatalogKey) -> CatalogResult<CreatureRecord> {
        Err(CatalogError::Unavailable("connection refused".to_string()))
    }
}
