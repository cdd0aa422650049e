use crate::battle::state::Slot;
use std::fmt;

/// Main error type for the Pokedex Arena crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// The requested pair of combatants cannot start a battle
    InvalidSelection(SelectionError),
    /// The operation is not allowed in the current battle phase
    IllegalState(BattleStateError),
    /// Combatant data could not be obtained from the catalog
    UpstreamUnavailable(CatalogError),
    /// The guessing game rejected the request
    Guess(GuessError),
}

/// Errors raised while validating a combatant pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// No combatant (or an empty name) was given for the slot
    MissingCombatant(Slot),
    /// Both slots name the same creature
    DuplicateCombatant(String),
}

/// Errors related to the battle lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleStateError {
    /// No combatants have been selected
    NoBattleInProgress,
    /// The battle already has a winner
    BattleFinished { winner: Slot },
}

/// Errors reported by a catalog source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog has no creature under this name or id
    NotFound(String),
    /// The catalog could not be reached or answered with a failure
    Unavailable(String),
    /// The catalog answered with data that could not be decoded
    MalformedData(String),
}

/// Errors related to the guessing game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessError {
    /// No creature has been drawn yet
    NoRoundInProgress,
    /// The current creature was already guessed
    AlreadySolved,
    /// The submitted guess was blank
    EmptyGuess,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::InvalidSelection(err) => write!(f, "Invalid selection: {}", err),
            ArenaError::IllegalState(err) => write!(f, "Illegal state: {}", err),
            ArenaError::UpstreamUnavailable(err) => write!(f, "Upstream unavailable: {}", err),
            ArenaError::Guess(err) => write!(f, "Guess error: {}", err),
        }
    }
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::MissingCombatant(slot) => {
                write!(f, "No combatant selected for slot {}", slot)
            }
            SelectionError::DuplicateCombatant(name) => {
                write!(f, "Cannot battle {} against itself", name)
            }
        }
    }
}

impl fmt::Display for BattleStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleStateError::NoBattleInProgress => write!(f, "No battle in progress"),
            BattleStateError::BattleFinished { winner } => {
                write!(f, "Battle already won by slot {}", winner)
            }
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(key) => write!(f, "Creature not found: {}", key),
            CatalogError::Unavailable(details) => write!(f, "Catalog unavailable: {}", details),
            CatalogError::MalformedData(details) => write!(f, "Malformed catalog data: {}", details),
        }
    }
}

impl fmt::Display for GuessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuessError::NoRoundInProgress => write!(f, "No creature to guess yet"),
            GuessError::AlreadySolved => write!(f, "This creature was already guessed"),
            GuessError::EmptyGuess => write!(f, "Guess must not be empty"),
        }
    }
}

impl std::error::Error for ArenaError {}
impl std::error::Error for SelectionError {}
impl std::error::Error for BattleStateError {}
impl std::error::Error for CatalogError {}
impl std::error::Error for GuessError {}

impl From<SelectionError> for ArenaError {
    fn from(err: SelectionError) -> Self {
        ArenaError::InvalidSelection(err)
    }
}

impl From<BattleStateError> for ArenaError {
    fn from(err: BattleStateError) -> Self {
        ArenaError::IllegalState(err)
    }
}

impl From<CatalogError> for ArenaError {
    fn from(err: CatalogError) -> Self {
        ArenaError::UpstreamUnavailable(err)
    }
}

impl From<GuessError> for ArenaError {
    fn from(err: GuessError) -> Self {
        ArenaError::Guess(err)
    }
}

/// Type alias for Results using ArenaError
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
