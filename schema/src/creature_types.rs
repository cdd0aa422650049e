use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Elemental type tag attached to every creature.
///
/// String conversions use the lowercase tag names the REST source uses
/// (`"grass"`, `"psychic"`, ...); parsing is case-insensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CreatureType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl CreatureType {
    /// All type tags in the order the REST source lists them.
    pub fn all() -> impl Iterator<Item = CreatureType> {
        <CreatureType as strum::IntoEnumIterator>::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_type_names_are_lowercase() {
        assert_eq!(CreatureType::Psychic.to_string(), "psychic");
        assert_eq!(CreatureType::Fairy.as_ref(), "fairy");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(CreatureType::from_str("GRASS"), Ok(CreatureType::Grass));
        assert_eq!(CreatureType::from_str("Electric"), Ok(CreatureType::Electric));
        assert!(CreatureType::from_str("stellar").is_err());
    }

    #[test]
    fn test_all_lists_eighteen_tags() {
        assert_eq!(CreatureType::all().count(), 18);
        assert_eq!(CreatureType::all().next(), Some(CreatureType::Normal));
    }
}
