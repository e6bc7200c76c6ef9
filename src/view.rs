//! What one seat is allowed to see.
//!
//! The engine keeps full information. A room hands each member the view for
//! their own id instead of the raw state.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use crate::action::PendingAction;
use crate::log::LogEntry;
use crate::player::PlayerId;
use crate::{Coup, Phase, Role};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "visibility", content = "cards", rename_all = "snake_case")]
pub enum Hand {
    Visible(Vec<Role>),
    // only the number of face down cards
    Hidden(usize),
}

impl Hand {
    pub fn len(&self) -> usize {
        match self {
            Hand::Visible(cards) => cards.len(),
            Hand::Hidden(count) => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub coins: u8,
    pub hand: Hand,
    pub lost_cards: Vec<Role>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// `None` for spectators.
    pub viewer_id: Option<PlayerId>,
    pub room_id: String,
    pub host_id: PlayerId,
    pub phase: Phase,
    pub turn: usize,
    pub turn_index: usize,
    pub deck_size: usize,
    pub seats: Vec<SeatView>,
    pub pending_action: Option<PendingAction>,
    pub passed_responder_ids: BTreeSet<PlayerId>,
    pub victim_id: Option<PlayerId>,
    pub exchange_player_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub logs: Vec<LogEntry>,
}

impl PlayerView {
    pub fn seat(&self, player_id: PlayerId) -> Option<&SeatView> {
        self.seats.iter().find(|seat| seat.id == player_id)
    }
}

impl Coup {
    pub fn view_for(&self, viewer_id: Option<PlayerId>) -> PlayerView {
        let seats = self.players.iter().map(|player| {
            let hand = if Some(player.id) == viewer_id {
                Hand::Visible(player.cards.clone())
            } else {
                Hand::Hidden(player.cards.len())
            };

            SeatView {
                id: player.id,
                name: player.name.clone(),
                coins: player.coins,
                hand,
                lost_cards: player.lost_cards.clone(),
            }
        }).collect();

        PlayerView {
            viewer_id,
            room_id: self.room_id.clone(),
            host_id: self.host_id,
            phase: self.phase,
            turn: self.turn,
            turn_index: self.turn_index,
            deck_size: self.deck.len(),
            seats,
            pending_action: self.pending_action,
            passed_responder_ids: self.passed_responder_ids.clone(),
            victim_id: self.victim_id,
            exchange_player_id: self.exchange_player_id,
            winner_id: self.winner_id,
            logs: self.logs.clone(),
        }
    }
}
