use crate::battle::state::{BattleEvent, BattleState, EventBus, Slot};

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleCommand {
    /// Reduce the target's HP, clamped at zero.
    DealDamage { target: Slot, amount: u32 },
    SetTurn(Slot),
    SetWinner(Slot),
    /// Prepend to the battle log and emit.
    LogEvent(BattleEvent),
    /// Emit without logging.
    EmitEvent(BattleEvent),
}

/// Apply one command to the state.
///
/// Commands come from `calculators`, which has already validated the phase,
/// so applying them cannot fail.
pub fn execute_command(command: BattleCommand, state: &mut BattleState, bus: &mut EventBus) {
    match command {
        BattleCommand::DealDamage { target, amount } => {
            let hp = &mut state.current_hp[target.to_index()];
            *hp = hp.saturating_sub(amount);
        }
        BattleCommand::SetTurn(slot) => {
            state.turn = slot;
        }
        BattleCommand::SetWinner(slot) => {
            debug_assert!(state.winner.is_none(), "winner is set exactly once");
            state.winner = Some(slot);
        }
        BattleCommand::LogEvent(event) => {
            state.log.push_front(event.clone());
            bus.push(event);
        }
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
        }
    }
}

pub fn execute_command_batch(commands: Vec<BattleCommand>, state: &mut BattleState, bus: &mut EventBus) {
    for command in commands {
        execute_command(command, state, bus);
    }
}
