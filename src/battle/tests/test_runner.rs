#[cfg(test)]
mod tests {
    use crate::battle::runner::BattleRunner;
    use crate::battle::state::{BattlePhase, Slot};
    use crate::battle::tests::common::{
        OfflineCatalog, StubCatalog, TestCombatantBuilder, assert_ok, scripted_pair,
    };
    use crate::catalog::{BundledCatalog, CatalogSource};
    use crate::errors::{ArenaError, BattleStateError, CatalogError, SelectionError};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn stub_catalog() -> Arc<StubCatalog> {
        Arc::new(StubCatalog::new(vec![
            TestCombatantBuilder::new("alpha")
                .with_hp(50)
                .with_attack(50)
                .with_defense(30)
                .with_speed(60)
                .build_record(1),
            TestCombatantBuilder::new("beta")
                .with_hp(45)
                .with_attack(40)
                .with_defense(20)
                .with_speed(40)
                .build_record(2),
        ]))
    }

    #[tokio::test]
    async fn test_select_starts_battle_from_catalog() {
        let mut runner = BattleRunner::new(Arc::new(BundledCatalog::new()));

        let info = assert_ok(runner.select("Pikachu", "7").await);

        assert_eq!(info.phase, BattlePhase::InProgress);
        assert_eq!(info.combatants.len(), 2);
        assert_eq!(info.combatants[0].name, "pikachu");
        assert_eq!(info.combatants[1].name, "squirtle");
        // pikachu (speed 90) outruns squirtle (speed 43)
        assert_eq!(info.turn, Slot::A);
        assert!(info.combatants[0].is_turn);
        assert!(!info.combatants[1].is_turn);
        assert_eq!(info.combatants[0].hp_fraction, 1.0);
    }

    #[tokio::test]
    async fn test_duplicate_keys_never_reach_catalog() {
        let catalog = stub_catalog();
        let mut runner = BattleRunner::new(catalog.clone());

        let result = runner.select("alpha", " ALPHA ").await;

        assert_eq!(
            result.unwrap_err(),
            ArenaError::InvalidSelection(SelectionError::DuplicateCombatant("alpha".to_string()))
        );
        assert_eq!(catalog.fetch_count(), 0);
        assert_eq!(runner.state().phase(), BattlePhase::Unselected);
    }

    #[tokio::test]
    async fn test_blank_key_is_missing_combatant() {
        let catalog = stub_catalog();
        let mut runner = BattleRunner::new(catalog.clone());

        let result = runner.select("", "beta").await;

        assert_eq!(
            result.unwrap_err(),
            ArenaError::InvalidSelection(SelectionError::MissingCombatant(Slot::A))
        );
        assert_eq!(catalog.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_creature_keeps_current_battle() {
        let mut runner = BattleRunner::new(stub_catalog());
        assert_ok(runner.select("alpha", "beta").await);
        assert_ok(runner.attack());
        let before = runner.state().clone();

        let result = runner.select("alpha", "gamma").await;

        assert_eq!(
            result.unwrap_err(),
            ArenaError::UpstreamUnavailable(CatalogError::NotFound("gamma".to_string()))
        );
        assert_eq!(runner.state(), &before);
    }

    #[tokio::test]
    async fn test_offline_catalog_reports_upstream_unavailable() {
        let mut runner = BattleRunner::new(Arc::new(OfflineCatalog));

        let result = runner.select("mew", "mewtwo").await;

        assert!(matches!(
            result,
            Err(ArenaError::UpstreamUnavailable(CatalogError::Unavailable(_)))
        ));
        assert_eq!(runner.state().phase(), BattlePhase::Unselected);
    }

    #[tokio::test]
    async fn test_default_fetch_all_resolves_listed_names() {
        let catalog = stub_catalog();

        let records = catalog.fetch_all(10).await.expect("stub holds both");

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(catalog.fetch_count(), 2);

        let first_only = catalog.fetch_all(1).await.expect("stub holds alpha");
        assert_eq!(first_only.len(), 1);
        assert_eq!(catalog.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_default_fetch_all_propagates_listing_failure() {
        assert_eq!(
            OfflineCatalog.fetch_all(151).await.unwrap_err(),
            CatalogError::Unavailable("connection refused".to_string())
        );
        assert_eq!(OfflineCatalog.fetch_species(&1u16.into()).await, Ok(None));
    }

    #[tokio::test]
    async fn test_run_to_completion_through_runner() {
        let mut runner = BattleRunner::new(stub_catalog());
        assert_ok(runner.select("alpha", "beta").await);

        let results = assert_ok(runner.run_to_completion(100));

        assert_eq!(results.len(), 5);
        let last = results.last().expect("at least one attack");
        assert!(last.battle_ended);
        assert_eq!(last.winner, Some(Slot::A));
        assert_eq!(last.phase, BattlePhase::Finished);
        assert!(runner.is_battle_ended());

        let info = runner.battle_info();
        assert_eq!(info.winner, Some("alpha".to_string()));
        assert_eq!(info.log.len(), 5);
        assert!(info.combatants.iter().all(|c| !c.is_turn));
        assert_eq!(info.combatants[1].hp_fraction, 0.0);
        assert_eq!(info.combatants[0].hp_fraction, 0.5);
    }

    #[test]
    fn test_attack_after_finish_and_reset() {
        let mut runner = BattleRunner::new(Arc::new(OfflineCatalog));
        let (first, second) = scripted_pair();
        assert_ok(runner.start_with(first, second));
        assert_ok(runner.run_to_completion(100));

        assert_eq!(
            runner.attack().unwrap_err(),
            ArenaError::IllegalState(BattleStateError::BattleFinished { winner: Slot::A })
        );

        runner.reset();
        assert_eq!(runner.state().phase(), BattlePhase::Unselected);
        assert_eq!(runner.get_winner(), None);
        assert_eq!(
            runner.attack().unwrap_err(),
            ArenaError::IllegalState(BattleStateError::NoBattleInProgress)
        );
    }

    #[test]
    fn test_run_to_completion_respects_limit() {
        let mut runner = BattleRunner::new(Arc::new(OfflineCatalog));
        let (first, second) = scripted_pair();
        assert_ok(runner.start_with(first, second));

        let results = assert_ok(runner.run_to_completion(2));

        assert_eq!(results.len(), 2);
        assert!(!runner.is_battle_ended());
        assert_eq!(runner.state().current_hp(Slot::A), 75);
    }
}
