use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, BattleState, Slot};
use crate::errors::{ArenaResult, BattleStateError};
use schema::BaseStats;

/// Every attack deals at least this much damage, so battles always end.
pub const MIN_DAMAGE: u32 = 5;

/// `max(5, floor(attack - defense / 2))`.
///
/// For non-negative integers `floor(a - d / 2) == a - ceil(d / 2)`, which keeps
/// the halved defense exact without going through floating point.
pub fn calculate_damage(attack: u16, defense: u16) -> u32 {
    let raw = i64::from(attack) - (i64::from(defense) + 1) / 2;
    match u32::try_from(raw) {
        Ok(damage) => damage.max(MIN_DAMAGE),
        Err(_) => MIN_DAMAGE,
    }
}

/// The faster combatant acts first; ties go to slot A.
pub fn first_to_act(first: &BaseStats, second: &BaseStats) -> Slot {
    if first.speed >= second.speed {
        Slot::A
    } else {
        Slot::B
    }
}

/// Calculate the commands for the acting combatant's attack.
///
/// Reads the state only; nothing is applied until the commands are executed.
pub fn calculate_attack_outcome(state: &BattleState) -> ArenaResult<Vec<BattleCommand>> {
    let pair = match &state.combatants {
        Some(pair) => pair,
        None => return Err(BattleStateError::NoBattleInProgress.into()),
    };
    if let Some(winner) = state.winner {
        return Err(BattleStateError::BattleFinished { winner }.into());
    }

    let attacker_slot = state.turn;
    let defender_slot = attacker_slot.opponent();
    let attacker = &pair[attacker_slot.to_index()];
    let defender = &pair[defender_slot.to_index()];

    let damage = calculate_damage(attacker.base_stats.attack, defender.base_stats.defense);
    let remaining_hp = state.current_hp(defender_slot).saturating_sub(damage);

    let mut commands = vec![
        BattleCommand::DealDamage {
            target: defender_slot,
            amount: damage,
        },
        BattleCommand::LogEvent(BattleEvent::Attacked {
            attacker: attacker_slot,
            attacker_name: attacker.name.clone(),
            defender_name: defender.name.clone(),
            damage,
            remaining_hp,
        }),
    ];

    if remaining_hp == 0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::CombatantFainted {
            slot: defender_slot,
            name: defender.name.clone(),
        }));
        commands.push(BattleCommand::SetWinner(attacker_slot));
        commands.push(BattleCommand::EmitEvent(BattleEvent::BattleEnded {
            winner: attacker_slot,
            winner_name: attacker.name.clone(),
        }));
    } else {
        commands.push(BattleCommand::SetTurn(defender_slot));
    }

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ArenaError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::Combatant;

    #[rstest]
    #[case(100, 40, 80)]
    #[case(1, 1000, 5)]
    #[case(50, 45, 27)]
    #[case(10, 11, 5)]
    #[case(12, 11, 6)]
    #[case(50, 20, 40)]
    #[case(40, 30, 25)]
    #[case(0, 0, 5)]
    #[case(255, 0, 255)]
    fn test_damage_formula(#[case] attack: u16, #[case] defense: u16, #[case] expected: u32) {
        assert_eq!(calculate_damage(attack, defense), expected);
    }

    #[test]
    fn test_damage_matches_real_valued_formula() {
        for attack in 0..=300u16 {
            for defense in (0..=300u16).step_by(7) {
                let exact = (f64::from(attack) - f64::from(defense) / 2.0).floor();
                let expected = exact.max(f64::from(MIN_DAMAGE)) as u32;
                assert_eq!(
                    calculate_damage(attack, defense),
                    expected,
                    "attack {} defense {}",
                    attack,
                    defense
                );
            }
        }
    }

    #[test]
    fn test_first_to_act() {
        let fast = BaseStats { hp: 1, attack: 1, defense: 1, speed: 90 };
        let slow = BaseStats { hp: 1, attack: 1, defense: 1, speed: 40 };
        assert_eq!(first_to_act(&fast, &slow), Slot::A);
        assert_eq!(first_to_act(&slow, &fast), Slot::B);
        assert_eq!(first_to_act(&slow, &slow), Slot::A);
    }

    #[test]
    fn test_outcome_rejected_without_combatants() {
        let state = BattleState::default();
        assert_eq!(
            calculate_attack_outcome(&state).unwrap_err(),
            ArenaError::IllegalState(BattleStateError::NoBattleInProgress)
        );
    }

    #[test]
    fn test_lethal_outcome_sets_winner_instead_of_turn() {
        let striker = Combatant::new("machamp", BaseStats { hp: 90, attack: 130, defense: 80, speed: 55 });
        let target = Combatant::new("magikarp", BaseStats { hp: 20, attack: 10, defense: 55, speed: 80 });
        let mut state = BattleState::new(striker, target, Slot::A);
        state.current_hp[1] = 40;

        let commands = calculate_attack_outcome(&state).expect("battle is in progress");
        assert!(commands
            .iter()
            .any(|c| matches!(c, BattleCommand::SetWinner(Slot::A))));
        assert!(!commands
            .iter()
            .any(|c| matches!(c, BattleCommand::SetTurn(_))));
    }
}
