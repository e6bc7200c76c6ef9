use crate::action::ActionType;
use crate::player::PlayerId;
use crate::{Phase, Role};

/// How a rejected command should be read by the room layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// Repeats something already recorded, e.g. a second pass in the same window.
    Duplicate,
    /// Was legal at some point but the game has moved on.
    Stale,
    /// Never legal for this sender in this state.
    Illegal,
}

impl RejectionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Duplicate => "duplicate",
            Self::Stale => "stale",
            Self::Illegal => "illegal",
        }
    }
}

/// Why `try_transition` refused a command. `transition` turns every one of these into a no-op.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("the game is over")]
    GameOver,

    #[error("command not accepted during {actual:?}")]
    WrongPhase { actual: Phase },

    #[error("{0} is not seated in this game")]
    UnknownPlayer(PlayerId),

    #[error("{0} has been eliminated")]
    Eliminated(PlayerId),

    #[error("it is not {player}'s turn, {current} is acting")]
    NotYourTurn { player: PlayerId, current: PlayerId },

    #[error("{player} has {available} coins but {action} costs {needed}")]
    InsufficientCoins {
        player: PlayerId,
        action: ActionType,
        needed: u8,
        available: u8,
    },

    #[error("{player} holds {coins} coins and must coup")]
    MustCoup { player: PlayerId, coins: u8 },

    #[error("{0} needs a target")]
    MissingTarget(ActionType),

    #[error("{0} does not take a target")]
    UnexpectedTarget(ActionType),

    #[error("{0} cannot target themselves")]
    SelfTarget(PlayerId),

    #[error("the deck holds {available} cards but an exchange draws {needed}")]
    DeckExhausted { available: usize, needed: usize },

    #[error("{0} is not eligible to respond in this window")]
    NotEligible(PlayerId),

    #[error("{0} already passed in this window")]
    AlreadyPassed(PlayerId),

    #[error("{0} makes no claim that can be challenged")]
    NotChallengeable(ActionType),

    #[error("{0} cannot be blocked")]
    NotBlockable(ActionType),

    #[error("{player} is not the target of {action} and cannot block it")]
    NotTarget { player: PlayerId, action: ActionType },

    #[error("{role} does not block {action}")]
    InvalidBlockRole { role: Role, action: ActionType },

    #[error("{0} does not owe a card")]
    NotVictim(PlayerId),

    #[error("card index {index} is out of range for a hand of {hand_size}")]
    CardIndexOutOfRange { index: usize, hand_size: usize },

    #[error("{0} is not exchanging cards")]
    NotExchanger(PlayerId),

    #[error("cannot return cards {indices:?} from a hand of {hand_size}")]
    InvalidExchangeSelection { indices: [usize; 2], hand_size: usize },

    #[error("game state is inconsistent: {0}")]
    Inconsistent(&'static str),
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::AlreadyPassed(_) => RejectionKind::Duplicate,
            Rejection::GameOver | Rejection::WrongPhase { .. } => RejectionKind::Stale,
            _ => RejectionKind::Illegal,
        }
    }
}

/// Reasons a game can't be dealt.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("at least {min} players are needed, got {got}")]
    TooFewPlayers { min: usize, got: usize },

    #[error("at most {max} players fit the deck, got {got}")]
    TooManyPlayers { max: usize, got: usize },

    #[error("player id {0} is used more than once")]
    DuplicatePlayer(PlayerId),
}
