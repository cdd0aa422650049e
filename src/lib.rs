//! Pokedex Arena
//!
//! A creature catalog of the first 151 creatures with search, stat comparison,
//! a guessing game and a deterministic turn-based battle simulator. The
//! catalog is compiled in at build time or fetched from the public REST API.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod dex;
pub mod errors;
pub mod guess;
pub mod logging;
pub mod mcp_interface;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, CatalogEntry, Combatant, CreatureRecord, CreatureType, EvolutionStage, SpeciesDetails,
    StatBlock,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::{attack, initialize, reset};
pub use battle::runner::{BattleInfo, BattleRunner};
pub use battle::state::{BattleEvent, BattlePhase, BattleState, Slot};

// Catalog access.
pub use catalog::{BundledCatalog, CatalogKey, CatalogSource, PokeApiCatalog};

// Crate-specific error and result types.
pub use errors::{
    ArenaError, ArenaResult, BattleStateError, CatalogError, CatalogResult, GuessError,
    SelectionError,
};
