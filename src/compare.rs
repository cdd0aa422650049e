//! Head-to-head comparison of two creatures by base stat total.

use crate::battle::engine::validate_selection;
use crate::battle::state::Slot;
use crate::catalog::{CatalogKey, CatalogSource};
use crate::errors::{ArenaResult, SelectionError};
use schema::CreatureRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOutcome {
    First,
    Second,
    Draw,
}

impl CompareOutcome {
    fn of<T: Ord>(first: T, second: T) -> Self {
        match first.cmp(&second) {
            std::cmp::Ordering::Greater => CompareOutcome::First,
            std::cmp::Ordering::Less => CompareOutcome::Second,
            std::cmp::Ordering::Equal => CompareOutcome::Draw,
        }
    }
}

/// One stat side by side, e.g. `special-attack 65 vs 50`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRow {
    pub stat: &'static str,
    pub first: u16,
    pub second: u16,
    pub leader: CompareOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: CreatureRecord,
    pub second: CreatureRecord,
    pub rows: Vec<StatRow>,
    pub first_total: u32,
    pub second_total: u32,
    pub outcome: CompareOutcome,
}

impl Comparison {
    pub fn winner(&self) -> Option<&CreatureRecord> {
        match self.outcome {
            CompareOutcome::First => Some(&self.first),
            CompareOutcome::Second => Some(&self.second),
            CompareOutcome::Draw => None,
        }
    }

    pub fn verdict(&self) -> String {
        match self.winner() {
            Some(record) => format!("{} wins the battle!", record.name.to_uppercase()),
            None => "It's a draw! Both are equally strong!".to_string(),
        }
    }
}

/// Compare two distinct records. The higher sum of all six base stats wins.
pub fn compare(first: &CreatureRecord, second: &CreatureRecord) -> Result<Comparison, SelectionError> {
    validate_selection(&first.name, &second.name)?;

    let rows = first
        .stats
        .named()
        .into_iter()
        .zip(second.stats.named())
        .map(|((stat, a), (_, b))| StatRow {
            stat,
            first: a,
            second: b,
            leader: CompareOutcome::of(a, b),
        })
        .collect();

    let first_total = first.stats.total();
    let second_total = second.stats.total();

    Ok(Comparison {
        first: first.clone(),
        second: second.clone(),
        rows,
        first_total,
        second_total,
        outcome: CompareOutcome::of(first_total, second_total),
    })
}

/// Look both creatures up and compare them. Equal or blank keys are rejected
/// before the catalog is asked.
pub async fn compare_by_key(
    catalog: &dyn CatalogSource,
    first: &str,
    second: &str,
) -> ArenaResult<Comparison> {
    let first_key = CatalogKey::parse(first).ok_or(SelectionError::MissingCombatant(Slot::A))?;
    let second_key = CatalogKey::parse(second).ok_or(SelectionError::MissingCombatant(Slot::B))?;
    if first_key == second_key {
        return Err(SelectionError::DuplicateCombatant(first_key.to_string()).into());
    }

    let (first_record, second_record) = tokio::try_join!(
        catalog.fetch_record(&first_key),
        catalog.fetch_record(&second_key)
    )?;

    Ok(compare(&first_record, &second_record)?)
}
