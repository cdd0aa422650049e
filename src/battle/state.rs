use schema::Combatant;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// One of the two sides of a battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    A,
    B,
}

impl Slot {
    pub fn to_index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }

    pub fn opponent(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::A => write!(f, "A"),
            Slot::B => write!(f, "B"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    Unselected,
    InProgress,
    Finished,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    BattleStarted {
        first: Slot,
        first_name: String,
    },
    Attacked {
        attacker: Slot,
        attacker_name: String,
        defender_name: String,
        damage: u32,
        remaining_hp: u32,
    },
    CombatantFainted {
        slot: Slot,
        name: String,
    },
    BattleEnded {
        winner: Slot,
        winner_name: String,
    },
}

impl BattleEvent {
    /// Formats the event into the line shown to the user.
    pub fn format(&self) -> String {
        match self {
            BattleEvent::BattleStarted { first_name, .. } => {
                format!("{} moves first!", first_name.to_uppercase())
            }
            BattleEvent::Attacked {
                attacker_name,
                defender_name,
                damage,
                ..
            } => format!(
                "{} attacked {} for {} damage!",
                attacker_name.to_uppercase(),
                defender_name.to_uppercase(),
                damage
            ),
            BattleEvent::CombatantFainted { name, .. } => {
                format!("{} fainted!", name.to_uppercase())
            }
            BattleEvent::BattleEnded { winner_name, .. } => {
                format!("{} WINS!", winner_name.to_uppercase())
            }
        }
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Events produced by a single transition, in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {}", event)?;
        }
        Ok(())
    }
}

/// The complete state of one battle.
///
/// Only the functions in `battle::engine` change it. A default value is the
/// "no battle selected" state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct BattleState {
    pub(crate) combatants: Option<[Combatant; 2]>,
    pub(crate) current_hp: [u32; 2],
    pub(crate) turn: Slot,
    /// Newest entry first.
    pub(crate) log: VecDeque<BattleEvent>,
    pub(crate) winner: Option<Slot>,
}

impl BattleState {
    pub(crate) fn new(first: Combatant, second: Combatant, turn: Slot) -> Self {
        let current_hp = [first.max_hp(), second.max_hp()];
        Self {
            combatants: Some([first, second]),
            current_hp,
            turn,
            log: VecDeque::new(),
            winner: None,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        match (&self.combatants, self.winner) {
            (None, _) => BattlePhase::Unselected,
            (Some(_), None) => BattlePhase::InProgress,
            (Some(_), Some(_)) => BattlePhase::Finished,
        }
    }

    pub fn combatant(&self, slot: Slot) -> Option<&Combatant> {
        self.combatants
            .as_ref()
            .map(|pair| &pair[slot.to_index()])
    }

    pub fn current_hp(&self, slot: Slot) -> u32 {
        self.current_hp[slot.to_index()]
    }

    pub fn max_hp(&self, slot: Slot) -> u32 {
        self.combatant(slot).map(Combatant::max_hp).unwrap_or(0)
    }

    /// Remaining health as a fraction of the starting pool, for health bars.
    pub fn hp_fraction(&self, slot: Slot) -> f64 {
        match self.max_hp(slot) {
            0 => 0.0,
            max => f64::from(self.current_hp(slot)) / f64::from(max),
        }
    }

    pub fn turn(&self) -> Slot {
        self.turn
    }

    pub fn winner(&self) -> Option<Slot> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Attack records, newest first.
    pub fn log(&self) -> impl Iterator<Item = &BattleEvent> {
        self.log.iter()
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.log.iter().map(BattleEvent::format).collect()
    }
}
