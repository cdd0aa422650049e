//! Text rendering shared by the CLI and the MCP server.
//!
//! Both front ends speak plain text, so every view of the domain types is
//! formatted here once.

use crate::battle::engine::opening_event;
use crate::battle::runner::{BattleInfo, BattleRunner, ExecutionResult};
use crate::battle::state::BattlePhase;
use crate::catalog::{CatalogKey, CatalogSource};
use crate::compare::{CompareOutcome, Comparison};
use crate::dex::DexPage;
use crate::errors::{ArenaError, ArenaResult, CatalogError};
use schema::{CreatureRecord, CreatureType, SpeciesDetails};
use tracing::warn;

const HP_BAR_WIDTH: usize = 20;

/// Health bar such as `[##########----------]` for a fraction in `[0, 1]`.
pub fn hp_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * HP_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(HP_BAR_WIDTH - filled)
    )
}

/// Both combatants with their health, plus the attack log (newest first).
pub fn display_battle_status(info: &BattleInfo) -> String {
    if info.phase == BattlePhase::Unselected {
        return "No battle in progress. Pick two creatures to start one.".to_string();
    }

    let mut output = String::new();
    for combatant in &info.combatants {
        let marker = if combatant.is_turn { " <- to move" } else { "" };
        output.push_str(&format!(
            "{}: {} {} {}/{}{}\n",
            combatant.slot,
            combatant.name.to_uppercase(),
            hp_bar(combatant.hp_fraction),
            combatant.current_hp,
            combatant.max_hp,
            marker
        ));
    }

    if !info.log.is_empty() {
        output.push_str("\nBattle log:\n");
        for line in &info.log {
            output.push_str(&format!("  {}\n", line));
        }
    }
    output
}

/// Gets the current battle status as a formatted string
pub fn get_battle_status_summary(info: &BattleInfo) -> String {
    let mut output = String::new();
    match (info.phase, &info.winner) {
        (BattlePhase::Finished, Some(name)) => {
            output.push_str(&format!("Battle Over - {} WINS!\n", name.to_uppercase()));
        }
        (BattlePhase::InProgress, _) => output.push_str("Battle in Progress\n"),
        _ => {}
    }
    output.push_str(&display_battle_status(info));
    output
}

/// The events of one attack, one per line.
pub fn format_attack_result(result: &ExecutionResult) -> String {
    let mut output = String::new();
    for event in &result.events {
        output.push_str(&format!("{}\n", event));
    }
    output
}

/// Starts a battle and describes it, or explains why the pair was refused.
///
/// Bad picks (blank, identical or unknown creatures) are answers for the
/// player, not failures; only an unreachable or broken catalog is an error.
pub async fn handle_start_battle_command(
    runner: &mut BattleRunner,
    first: &str,
    second: &str,
) -> ArenaResult<String> {
    match runner.select(first, second).await {
        Ok(info) => {
            let mut text = String::new();
            if let Some(event) = opening_event(runner.state()) {
                text.push_str(&format!("{}\n\n", event));
            }
            text.push_str(&display_battle_status(&info));
            Ok(text)
        }
        Err(ArenaError::InvalidSelection(err)) => Ok(format!("Error: {}", err)),
        Err(ArenaError::UpstreamUnavailable(CatalogError::NotFound(key))) => {
            Ok(format!("Error: The creature '{}' was not found.", key))
        }
        Err(err) => Err(err),
    }
}

/// Name, number, types, body data and all six base stats of one creature,
/// followed by species lore when the catalog has it.
pub fn display_creature_details(record: &CreatureRecord, species: Option<&SpeciesDetails>) -> String {
    let types: Vec<String> = record.types.iter().map(|t| t.to_string()).collect();
    let mut output = format!(
        "--- #{:03} {} ---\nTypes: {}\nHeight: {:.1} m  Weight: {:.1} kg\n",
        record.id,
        record.name.to_uppercase(),
        types.join(", "),
        record.height_m(),
        record.weight_kg()
    );
    if !record.abilities.is_empty() {
        output.push_str(&format!("Abilities: {}\n", record.abilities.join(", ")));
    }
    output.push_str(&format!("Image: {}\n", record.image));
    for (stat, value) in record.stats.named() {
        output.push_str(&format!("  {:<16}{:>4}\n", stat, value));
    }
    output.push_str(&format!("  {:<16}{:>4}\n", "total", record.stats.total()));

    if let Some(species) = species {
        output.push_str(&display_species(species));
    }
    output
}

fn display_species(species: &SpeciesDetails) -> String {
    let mut output = String::new();
    if let Some(text) = &species.flavor_text {
        output.push_str(&format!("\n\"{}\"\n\n", text));
    }
    if let Some(habitat) = &species.habitat {
        output.push_str(&format!("Habitat: {}\n", habitat));
    }
    match species.female_percent() {
        Some(female) => output.push_str(&format!(
            "Gender: {:.1}% female, {:.1}% male\n",
            female,
            100.0 - female
        )),
        None => output.push_str("Gender: genderless\n"),
    }
    if !species.egg_groups.is_empty() {
        output.push_str(&format!("Egg groups: {}\n", species.egg_groups.join(", ")));
    }
    output.push_str(&format!("Catch rate: {:.1}%\n", species.capture_percent()));

    if species.evolution_chain.len() > 1 {
        let stages: Vec<String> = species
            .evolution_chain
            .iter()
            .map(|stage| match stage.min_level {
                Some(level) => format!("{} (Lv. {})", stage.name, level),
                None => stage.name.clone(),
            })
            .collect();
        output.push_str(&format!("Evolution: {}\n", stages.join(" -> ")));
    }
    output
}

/// Species lore for a record already fetched. Failures are logged and
/// leave the detail view without lore.
pub async fn fetch_species_details(
    catalog: &dyn CatalogSource,
    record: &CreatureRecord,
) -> Option<SpeciesDetails> {
    match catalog.fetch_species(&CatalogKey::Id(record.id)).await {
        Ok(species) => species,
        Err(err) => {
            warn!(creature = %record.name, %err, "species details unavailable");
            None
        }
    }
}

/// Handles a creature lookup by name or dex number
pub async fn handle_lookup_creature_command(catalog: &dyn CatalogSource, input: &str) -> String {
    let key = match CatalogKey::parse(input) {
        Some(key) => key,
        None => return "Which creature do you want to look up? (e.g., 'pikachu' or '25')".to_string(),
    };

    match catalog.fetch_record(&key).await {
        Ok(record) => {
            let species = fetch_species_details(catalog, &record).await;
            display_creature_details(&record, species.as_ref())
        }
        Err(CatalogError::NotFound(_)) => format!("The creature '{}' was not found.", key),
        Err(err) => format!("Could not look up '{}': {}", key, err),
    }
}

/// Stat rows side by side followed by the verdict.
pub fn display_comparison(comparison: &Comparison) -> String {
    let first = comparison.first.name.to_uppercase();
    let second = comparison.second.name.to_uppercase();
    let mut output = format!("{:<16}{:>12}{:>12}\n", "", first, second);

    for row in &comparison.rows {
        let (left, right) = match row.leader {
            CompareOutcome::First => ("*", " "),
            CompareOutcome::Second => (" ", "*"),
            CompareOutcome::Draw => (" ", " "),
        };
        output.push_str(&format!(
            "{:<16}{:>11}{}{:>11}{}\n",
            row.stat, row.first, left, row.second, right
        ));
    }
    output.push_str(&format!(
        "{:<16}{:>11} {:>11} \n\n{}\n",
        "total", comparison.first_total, comparison.second_total,
        comparison.verdict()
    ));
    output
}

/// One listing page with its position, e.g. `Page 2 of 8`.
pub fn display_dex_page(page: &DexPage<'_>) -> String {
    if page.entries.is_empty() {
        return "No creatures match.\n".to_string();
    }

    let mut output = String::new();
    for record in &page.entries {
        let types: Vec<String> = record.types.iter().map(|t| t.to_string()).collect();
        output.push_str(&format!(
            "#{:03} {:<12} {}\n",
            record.id,
            record.name,
            types.join("/")
        ));
    }
    output.push_str(&format!(
        "\nPage {} of {} ({} matches)\n",
        page.page, page.total_pages, page.total_matches
    ));
    output
}

/// Returns formatted text listing the type filters
pub fn get_available_types_display() -> String {
    let names: Vec<String> = CreatureType::all().map(|t| t.to_string()).collect();
    format!("Available types: {}\n", names.join(", "))
}
