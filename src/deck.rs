use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::{Role, ROLE_VARIANTS};

/// Copies of each role in a fresh deck.
pub const COPIES_PER_ROLE: usize = 3;

/// The court deck. The end of the vector is the top of the deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Role>,
}

impl Deck {
    /// The full 15 card composition, unshuffled.
    pub fn standard() -> Self {
        let cards = ROLE_VARIANTS.iter()
            .flat_map(|&card| std::iter::repeat(card).take(COPIES_PER_ROLE))
            .collect();

        Self { cards }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle(rng);
        deck
    }

    /// Uniform Fisher-Yates permutation of the whole deck.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        tracing::trace!(size = self.cards.len(), "deck shuffled");
    }

    pub fn draw(&mut self) -> Option<Role> {
        self.cards.pop()
    }

    /// Puts cards back and reshuffles everything, so returned roles can't be tracked.
    pub fn return_cards<I, R>(&mut self, cards: I, rng: &mut R)
    where
        I: IntoIterator<Item = Role>,
        R: Rng + ?Sized,
    {
        self.cards.extend(cards);
        self.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Role] {
        &self.cards
    }

    // pulls a specific role out of the deck so tests can rig hands without breaking conservation
    #[cfg(test)]
    pub(crate) fn take(&mut self, role: Role) -> Option<Role> {
        let idx = self.cards.iter().position(|&card| card == role)?;
        Some(self.cards.remove(idx))
    }
}
