//! Structured game history.
//!
//! Entries only carry ids, roles and amounts. Turning them into text (and
//! localising that text) is left to whoever renders the game.

use serde::{Deserialize, Serialize};
use crate::action::ActionType;
use crate::player::PlayerId;
use crate::Role;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LogEntry {
    GameStarted {
        player_ids: Vec<PlayerId>,
    },
    Income {
        player_id: PlayerId,
        amount: u8,
    },
    CoupLaunched {
        player_id: PlayerId,
        target_id: PlayerId,
    },
    ActionAttempted {
        player_id: PlayerId,
        action: ActionType,
        target_id: Option<PlayerId>,
    },
    Passed {
        player_id: PlayerId,
    },
    // coins moved by a resolved action; for steals `from_id` is the victim
    CoinsGained {
        player_id: PlayerId,
        action: ActionType,
        amount: u8,
        from_id: Option<PlayerId>,
    },
    ActionSucceeded {
        player_id: PlayerId,
        action: ActionType,
        target_id: Option<PlayerId>,
    },
    BlockDeclared {
        blocker_id: PlayerId,
        role: Role,
        action: ActionType,
        source_id: PlayerId,
    },
    BlockSucceeded {
        blocker_id: PlayerId,
        role: Role,
        action: ActionType,
    },
    ChallengeStarted {
        challenger_id: PlayerId,
        claimant_id: PlayerId,
        role: Role,
    },
    ChallengeSucceeded {
        challenger_id: PlayerId,
        claimant_id: PlayerId,
        role: Role,
    },
    ChallengeFailed {
        challenger_id: PlayerId,
        claimant_id: PlayerId,
        role: Role,
    },
    // the proven card went back into the deck and a fresh one was dealt
    CardReplaced {
        player_id: PlayerId,
        role: Role,
    },
    CardLost {
        player_id: PlayerId,
        role: Role,
    },
    PlayerEliminated {
        player_id: PlayerId,
    },
    ExchangeStarted {
        player_id: PlayerId,
        drawn: usize,
    },
    ExchangeCompleted {
        player_id: PlayerId,
    },
    GameOver {
        winner_id: PlayerId,
    },
}
