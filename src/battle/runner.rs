use crate::battle::engine;
use crate::battle::state::{BattleEvent, BattlePhase, BattleState, Slot};
use crate::catalog::{CatalogKey, CatalogSource};
use crate::errors::{ArenaResult, SelectionError};
use schema::Combatant;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// A battle session: picks combatants from a catalog and drives the simulator.
///
/// Presentation layers own one runner per user and call it in sequence.
pub struct BattleRunner {
    catalog: Arc<dyn CatalogSource>,
    battle_state: BattleState,
}

/// Information about the current battle for rendering
#[derive(Debug, Clone, Serialize)]
pub struct BattleInfo {
    pub phase: BattlePhase,
    pub turn: Slot,
    pub combatants: Vec<CombatantInfo>,
    /// Newest first.
    pub log: Vec<String>,
    pub winner: Option<String>,
}

/// Information about one side of the battle
#[derive(Debug, Clone, Serialize)]
pub struct CombatantInfo {
    pub slot: Slot,
    pub name: String,
    pub image: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub hp_fraction: f64,
    pub is_turn: bool,
}

/// Result of one attack
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub events: Vec<BattleEvent>,
    pub phase: BattlePhase,
    pub battle_ended: bool,
    pub winner: Option<Slot>,
}

impl BattleRunner {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            catalog,
            battle_state: engine::reset(),
        }
    }

    /// Fetch both creatures and start a new battle between them.
    ///
    /// Blank or identical keys are rejected before the catalog is asked.
    /// A failed fetch leaves the current battle untouched.
    pub async fn select(&mut self, first: &str, second: &str) -> ArenaResult<BattleInfo> {
        let first_key = CatalogKey::parse(first).ok_or(SelectionError::MissingCombatant(Slot::A))?;
        let second_key = CatalogKey::parse(second).ok_or(SelectionError::MissingCombatant(Slot::B))?;
        if first_key == second_key {
            return Err(SelectionError::DuplicateCombatant(first_key.to_string()).into());
        }

        debug!(
            source = self.catalog.source_name(),
            first = %first_key,
            second = %second_key,
            "fetching combatants"
        );
        let fetched = tokio::try_join!(
            self.catalog.fetch_combatant(&first_key),
            self.catalog.fetch_combatant(&second_key)
        );
        let (first_combatant, second_combatant) = match fetched {
            Ok(pair) => pair,
            Err(err) => {
                warn!("cannot start battle: {}", err);
                return Err(err.into());
            }
        };

        self.start_with(first_combatant, second_combatant)?;
        Ok(self.battle_info())
    }

    /// Start a battle from combatants the caller already has.
    pub fn start_with(&mut self, first: Combatant, second: Combatant) -> ArenaResult<()> {
        self.battle_state = engine::initialize(first, second)?;
        Ok(())
    }

    /// Resolve the next attack.
    pub fn attack(&mut self) -> ArenaResult<ExecutionResult> {
        let bus = engine::attack(&mut self.battle_state)?;
        Ok(ExecutionResult {
            events: bus.into_events(),
            phase: self.battle_state.phase(),
            battle_ended: self.is_battle_ended(),
            winner: self.get_winner(),
        })
    }

    /// Attack until someone wins or `limit` attacks have been made.
    pub fn run_to_completion(&mut self, limit: usize) -> ArenaResult<Vec<ExecutionResult>> {
        let mut results = Vec::new();
        while !self.is_battle_ended() && results.len() < limit {
            results.push(self.attack()?);
        }
        Ok(results)
    }

    pub fn reset(&mut self) {
        self.battle_state = engine::reset();
    }

    pub fn state(&self) -> &BattleState {
        &self.battle_state
    }

    pub fn is_battle_ended(&self) -> bool {
        self.battle_state.is_finished()
    }

    pub fn get_winner(&self) -> Option<Slot> {
        self.battle_state.winner()
    }

    /// Get current battle information for rendering
    pub fn battle_info(&self) -> BattleInfo {
        battle_info(&self.battle_state)
    }
}

pub fn battle_info(state: &BattleState) -> BattleInfo {
    let combatants = [Slot::A, Slot::B]
        .into_iter()
        .filter_map(|slot| {
            state.combatant(slot).map(|combatant| CombatantInfo {
                slot,
                name: combatant.name.clone(),
                image: combatant.image.clone(),
                current_hp: state.current_hp(slot),
                max_hp: state.max_hp(slot),
                hp_fraction: state.hp_fraction(slot),
                is_turn: state.phase() == BattlePhase::InProgress && state.turn() == slot,
            })
        })
        .collect();

    let winner = state
        .winner()
        .and_then(|slot| state.combatant(slot))
        .map(|combatant| combatant.name.clone());

    BattleInfo {
        phase: state.phase(),
        turn: state.turn(),
        combatants,
        log: state.log_lines(),
        winner,
    }
}
