use crate::CreatureType;
use serde::{Deserialize, Serialize};

/// Sprite host used by the REST source for `sprites.front_default`.
pub const SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Front sprite URL for a dex number.
pub fn sprite_url(id: u16) -> String {
    format!("{}/{}.png", SPRITE_BASE_URL, id)
}

/// The four stats the battle simulator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
}

/// Full six-stat block as published by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatBlock {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl StatBlock {
    /// Stat names paired with values, in catalog order.
    pub fn named(&self) -> [(&'static str, u16); 6] {
        [
            ("hp", self.hp),
            ("attack", self.attack),
            ("defense", self.defense),
            ("special-attack", self.special_attack),
            ("special-defense", self.special_defense),
            ("speed", self.speed),
        ]
    }

    pub fn total(&self) -> u32 {
        self.named().iter().map(|(_, value)| u32::from(*value)).sum()
    }

    pub fn battle_stats(&self) -> BaseStats {
        BaseStats {
            hp: self.hp,
            attack: self.attack,
            defense: self.defense,
            speed: self.speed,
        }
    }
}

/// One catalog entry with everything the list, detail and compare views show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: u16,
    pub name: String,
    pub image: String,
    pub types: Vec<CreatureType>,
    pub stats: StatBlock,
    /// Decimetres.
    pub height: u16,
    /// Hectograms.
    pub weight: u16,
    /// Ability names in slot order, hidden ability last.
    pub abilities: Vec<String>,
}

impl CreatureRecord {
    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }
}

/// One step of an evolution line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub id: Option<u16>,
    pub name: String,
    /// Level the previous stage evolves at, when evolution is level based.
    pub min_level: Option<u8>,
}

impl EvolutionStage {
    pub fn image(&self) -> Option<String> {
        self.id.map(sprite_url)
    }
}

/// Species lore that only the REST source publishes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpeciesDetails {
    pub flavor_text: Option<String>,
    pub habitat: Option<String>,
    /// Female share in eighths; `None` for genderless species.
    pub gender_rate: Option<u8>,
    pub capture_rate: u8,
    pub egg_groups: Vec<String>,
    /// The whole line this species belongs to, base form first.
    pub evolution_chain: Vec<EvolutionStage>,
}

impl SpeciesDetails {
    /// Percentage of females, `None` when genderless.
    pub fn female_percent(&self) -> Option<f64> {
        self.gender_rate.map(|eighths| f64::from(eighths) * 12.5)
    }

    /// Capture rate as a percentage of the best possible rate (255).
    pub fn capture_percent(&self) -> f64 {
        f64::from(self.capture_rate) / 255.0 * 100.0
    }
}

/// Name/id pair as returned by the catalog listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u16,
    pub name: String,
}

/// Immutable battle input: a named creature and its battle stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub image: String,
    pub base_stats: BaseStats,
}

impl Combatant {
    pub fn new(name: impl Into<String>, base_stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            image: String::new(),
            base_stats,
        }
    }

    /// HP pool at the start of a battle. Doubled to lengthen battles.
    pub fn max_hp(&self) -> u32 {
        u32::from(self.base_stats.hp) * 2
    }
}

impl From<&CreatureRecord> for Combatant {
    fn from(record: &CreatureRecord) -> Self {
        Self {
            name: record.name.clone(),
            image: record.image.clone(),
            base_stats: record.stats.battle_stats(),
        }
    }
}

impl From<&CreatureRecord> for CatalogEntry {
    fn from(record: &CreatureRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bulbasaur() -> CreatureRecord {
        CreatureRecord {
            id: 1,
            name: "bulbasaur".to_string(),
            image: sprite_url(1),
            types: vec![CreatureType::Grass, CreatureType::Poison],
            stats: StatBlock {
                hp: 45,
                attack: 49,
                defense: 49,
                special_attack: 65,
                special_defense: 65,
                speed: 45,
            },
            height: 7,
            weight: 69,
            abilities: vec!["overgrow".to_string(), "chlorophyll".to_string()],
        }
    }

    #[test]
    fn test_stat_total_sums_all_six() {
        assert_eq!(bulbasaur().stats.total(), 318);
    }

    #[test]
    fn test_combatant_from_record_keeps_battle_stats() {
        let combatant = Combatant::from(&bulbasaur());
        assert_eq!(combatant.name, "bulbasaur");
        assert_eq!(
            combatant.base_stats,
            BaseStats { hp: 45, attack: 49, defense: 49, speed: 45 }
        );
        assert_eq!(combatant.max_hp(), 90);
        assert!(combatant.image.ends_with("/1.png"));
    }

    #[test]
    fn test_record_units() {
        let record = bulbasaur();
        assert_eq!(record.height_m(), 0.7);
        assert_eq!(record.weight_kg(), 6.9);
    }

    #[test]
    fn test_species_ratios() {
        let species = SpeciesDetails {
            gender_rate: Some(1),
            capture_rate: 45,
            ..SpeciesDetails::default()
        };
        assert_eq!(species.female_percent(), Some(12.5));
        assert!((species.capture_percent() - 17.647).abs() < 0.001);

        let genderless = SpeciesDetails::default();
        assert_eq!(genderless.female_percent(), None);
    }

    #[test]
    fn test_evolution_stage_image() {
        let stage = EvolutionStage {
            id: Some(2),
            name: "ivysaur".to_string(),
            min_level: Some(16),
        };
        assert_eq!(stage.image(), Some(sprite_url(2)));
    }

    #[test]
    fn test_record_survives_postcard() {
        let record = bulbasaur();
        let bytes = postcard::to_allocvec(&vec![record.clone()]).expect("encode");
        let decoded: Vec<CreatureRecord> = postcard::from_bytes(&bytes).expect("decode");
        assert_eq!(decoded, vec![record]);
    }
}
