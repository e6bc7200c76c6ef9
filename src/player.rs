use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::Role;

/// Stable identifier handed out by the room layer; never reused within a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl Display for PlayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub coins: u8,
    // hidden hand, addressed by index for discards and exchange returns
    pub cards: Vec<Role>,
    // revealed influence, append only
    pub lost_cards: Vec<Role>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, coins: u8, cards: Vec<Role>) -> Self {
        Self {
            id,
            name: name.into(),
            coins,
            cards,
            lost_cards: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.cards.is_empty()
    }

    /// Index of a card in hand matching `role`, if the player actually holds it.
    pub fn find_role(&self, role: Role) -> Option<usize> {
        self.cards.iter().position(|&card| card == role)
    }

    /// Flips the card at `card_idx` face up. Returns the revealed role.
    pub fn lose_card(&mut self, card_idx: usize) -> Option<Role> {
        if card_idx >= self.cards.len() {
            return None;
        }

        let card = self.cards.remove(card_idx);
        self.lost_cards.push(card);
        Some(card)
    }
}

#[cfg(test)]
mod tests {
    use crate::Role::{Captain, Duke};
    use super::*;

    #[test]
    fn losing_cards_moves_them_face_up() {
        let mut player = Player::new(PlayerId(3), "ana", 2, vec![Duke, Captain]);
        assert!(player.is_alive());
        assert_eq!(player.find_role(Captain), Some(1));

        assert_eq!(player.lose_card(0), Some(Duke));
        assert_eq!(player.cards, vec![Captain]);
        assert_eq!(player.lost_cards, vec![Duke]);

        assert_eq!(player.lose_card(1), None);
        assert_eq!(player.lose_card(0), Some(Captain));
        assert!(!player.is_alive());
        assert_eq!(player.find_role(Captain), None);
    }

    #[test]
    fn display() {
        assert_eq!(PlayerId(12).to_string(), "P12");
    }
}
