//! Battle transitions: `initialize`, `attack` and `reset`.
//!
//! Each function validates and computes everything it needs before touching
//! state, so a rejected call leaves the caller's state exactly as it was.

use crate::battle::calculators::{calculate_attack_outcome, first_to_act};
use crate::battle::commands::execute_command_batch;
use crate::battle::state::{BattleEvent, BattleState, EventBus, Slot};
use crate::errors::{ArenaResult, SelectionError};
use schema::Combatant;
use tracing::{debug, info, warn};

/// Check that two names can face each other: both present and not the same creature.
pub fn validate_selection(first: &str, second: &str) -> Result<(), SelectionError> {
    let first = first.trim();
    let second = second.trim();
    if first.is_empty() {
        return Err(SelectionError::MissingCombatant(Slot::A));
    }
    if second.is_empty() {
        return Err(SelectionError::MissingCombatant(Slot::B));
    }
    if first.eq_ignore_ascii_case(second) {
        return Err(SelectionError::DuplicateCombatant(first.to_lowercase()));
    }
    Ok(())
}

/// Start a battle between two distinct combatants.
///
/// Both HP pools start at twice the base HP and the faster combatant acts
/// first, with ties going to slot A.
pub fn initialize(first: Combatant, second: Combatant) -> ArenaResult<BattleState> {
    if let Err(err) = validate_selection(&first.name, &second.name) {
        warn!(first = %first.name, second = %second.name, "rejected battle selection: {}", err);
        return Err(err.into());
    }

    let turn = first_to_act(&first.base_stats, &second.base_stats);
    info!(first = %first.name, second = %second.name, turn = %turn, "battle started");
    Ok(BattleState::new(first, second, turn))
}

/// The event announcing who acts first, for presentation layers that show it.
pub fn opening_event(state: &BattleState) -> Option<BattleEvent> {
    let combatant = state.combatant(state.turn())?;
    Some(BattleEvent::BattleStarted {
        first: state.turn(),
        first_name: combatant.name.clone(),
    })
}

/// Resolve one attack by the combatant whose turn it is.
///
/// Fails with `IllegalState` when no battle is selected or it already has a
/// winner; the state is not touched in that case.
pub fn attack(state: &mut BattleState) -> ArenaResult<EventBus> {
    let commands = match calculate_attack_outcome(state) {
        Ok(commands) => commands,
        Err(err) => {
            warn!("attack rejected: {}", err);
            return Err(err);
        }
    };

    let mut bus = EventBus::new();
    execute_command_batch(commands, state, &mut bus);

    for event in bus.events() {
        match event {
            BattleEvent::Attacked { damage, remaining_hp, .. } => {
                debug!(damage, remaining_hp, "{}", event);
            }
            BattleEvent::BattleEnded { winner, winner_name } => {
                info!(winner = %winner, name = %winner_name, "battle finished");
            }
            _ => {}
        }
    }

    Ok(bus)
}

/// The "no battle selected" state. Always succeeds.
pub fn reset() -> BattleState {
    BattleState::default()
}
