#[cfg(test)]
mod tests {
    use crate::battle::engine::{attack, initialize};
    use crate::battle::state::{BattleEvent, BattlePhase, Slot};
    use crate::battle::tests::common::{
        TestCombatantBuilder, assert_ok, create_test_battle, scripted_pair,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initialize_sets_doubled_hp_and_faster_first() {
        let slow = TestCombatantBuilder::new("slowbro").with_hp(95).with_speed(30).build();
        let fast = TestCombatantBuilder::new("jolteon").with_hp(65).with_speed(130).build();

        let state = assert_ok(initialize(slow, fast));

        assert_eq!(state.phase(), BattlePhase::InProgress);
        assert_eq!(state.current_hp(Slot::A), 190);
        assert_eq!(state.current_hp(Slot::B), 130);
        assert_eq!(state.max_hp(Slot::A), 190);
        assert_eq!(state.turn(), Slot::B);
        assert_eq!(state.winner(), None);
        assert_eq!(state.log().count(), 0);
    }

    #[test]
    fn test_speed_tie_goes_to_slot_a() {
        let first = TestCombatantBuilder::new("nidoran-f").with_speed(41).build();
        let second = TestCombatantBuilder::new("nidoran-m").with_speed(41).build();

        let state = create_test_battle(first, second);

        assert_eq!(state.turn(), Slot::A);
    }

    #[test]
    fn test_single_attack_damages_defender_and_passes_turn() {
        let (first, second) = scripted_pair();
        let mut state = create_test_battle(first, second);

        let bus = assert_ok(attack(&mut state));

        assert_eq!(state.current_hp(Slot::B), 50);
        assert_eq!(state.current_hp(Slot::A), 100);
        assert_eq!(state.turn(), Slot::B);
        assert_eq!(
            bus.events(),
            &[BattleEvent::Attacked {
                attacker: Slot::A,
                attacker_name: "alpha".to_string(),
                defender_name: "beta".to_string(),
                damage: 40,
                remaining_hp: 50,
            }]
        );
        assert_eq!(state.log_lines(), vec!["ALPHA attacked BETA for 40 damage!"]);
    }

    #[test]
    fn test_scripted_battle_runs_to_victory() {
        let (first, second) = scripted_pair();
        let mut state = create_test_battle(first, second);

        let expected_hp = [(100, 50), (75, 50), (75, 10), (50, 10), (50, 0)];
        for (attack_number, (hp_a, hp_b)) in expected_hp.into_iter().enumerate() {
            assert!(!state.is_finished(), "finished early at attack {}", attack_number);
            assert_ok(attack(&mut state));
            assert_eq!(state.current_hp(Slot::A), hp_a);
            assert_eq!(state.current_hp(Slot::B), hp_b);
        }

        assert_eq!(state.phase(), BattlePhase::Finished);
        assert_eq!(state.winner(), Some(Slot::A));
        assert_eq!(
            state.log_lines(),
            vec![
                "ALPHA attacked BETA for 40 damage!",
                "BETA attacked ALPHA for 25 damage!",
                "ALPHA attacked BETA for 40 damage!",
                "BETA attacked ALPHA for 25 damage!",
                "ALPHA attacked BETA for 40 damage!",
            ]
        );
    }

    #[test]
    fn test_lethal_attack_emits_faint_and_victory() {
        let (first, second) = scripted_pair();
        let mut state = create_test_battle(first, second);
        for _ in 0..4 {
            assert_ok(attack(&mut state));
        }

        let bus = assert_ok(attack(&mut state));

        assert_eq!(bus.len(), 3);
        assert_eq!(
            bus.events()[1],
            BattleEvent::CombatantFainted {
                slot: Slot::B,
                name: "beta".to_string()
            }
        );
        assert_eq!(bus.events()[2].format(), "ALPHA WINS!");
        // Only attacks are kept in the log.
        assert_eq!(state.log().count(), 5);
    }

    #[test]
    fn test_overkill_clamps_hp_at_zero() {
        let glass = TestCombatantBuilder::new("magikarp").with_hp(10).with_defense(0).build();
        let hitter = TestCombatantBuilder::new("machamp")
            .with_attack(130)
            .with_speed(200)
            .build();
        let mut state = create_test_battle(glass, hitter);

        let bus = assert_ok(attack(&mut state));

        assert_eq!(state.current_hp(Slot::A), 0);
        assert_eq!(state.winner(), Some(Slot::B));
        assert_eq!(
            bus.events()[0],
            BattleEvent::Attacked {
                attacker: Slot::B,
                attacker_name: "machamp".to_string(),
                defender_name: "magikarp".to_string(),
                damage: 130,
                remaining_hp: 0,
            }
        );
    }

    #[test]
    fn test_minimum_damage_against_walls() {
        let wall = TestCombatantBuilder::new("shuckle").with_defense(230).with_speed(5).build();
        let weak = TestCombatantBuilder::new("caterpie").with_attack(30).with_speed(45).build();
        let mut state = create_test_battle(wall, weak);

        assert_ok(attack(&mut state));

        assert_eq!(state.current_hp(Slot::A), 95);
    }
}
