pub mod action;
pub mod deck;
pub mod error;
pub mod log;
pub mod player;
pub mod rules;
pub mod sim;
pub mod validate;
pub mod view;
pub mod window;

pub use action::{ActionType, BlockClaim, Command, PendingAction};
pub use deck::Deck;
pub use error::{Rejection, RejectionKind, SetupError};
pub use log::LogEntry;
pub use player::{Player, PlayerId};
pub use rules::Rules;
pub use view::{Hand, PlayerView, SeatView};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::validate::EXCHANGE_DRAW;
use crate::window::{eligible_responders, is_unanimous};
use crate::Role::{Ambassador, Assassin, Captain, Contessa, Duke};

pub const MIN_PLAYERS: usize = 2;
// 15 cards, two per seat, and an exchange still needs two in the deck
pub const MAX_PLAYERS: usize = 6;
pub const STARTING_HAND: usize = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

pub static ROLE_VARIANTS: [Role; 5] = [
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
];

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    ActionSelection,
    ChallengeWindow,
    BlockResponse,
    LoseCard,
    ExchangeSelect,
    GameOver,
}

/// Effect parked behind a forced discard, resumed once that discard resolves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "playerId", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Continuation {
    // a second discard, e.g. the assassination behind a failed challenge
    LoseCard(PlayerId),
    // a proven ambassador still gets to exchange
    Exchange(PlayerId),
}

/// Authoritative state of one game. Transitions never mutate in place; each
/// accepted command yields a new snapshot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coup {
    room_id: String,
    host_id: PlayerId,
    rules: Rules,
    // completed turns
    turn: usize,
    turn_index: usize,
    deck: Deck,
    players: Vec<Player>,

    phase: Phase,
    pending_action: Option<PendingAction>,
    passed_responder_ids: BTreeSet<PlayerId>,
    victim_id: Option<PlayerId>,
    exchange_player_id: Option<PlayerId>,
    continuations: Vec<Continuation>,
    winner_id: Option<PlayerId>,

    logs: Vec<LogEntry>,
}

impl Display for Coup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("T {} | P {} | {:?}\n", self.turn, self.turn_index, self.phase))?;
        for (player_idx, player) in self.players.iter().enumerate() {
            f.write_fmt(format_args!("\tP {player_idx}: ${} | {:?} | lost {:?}\n", player.coins, player.cards, player.lost_cards))?;
        }
        Ok(())
    }
}

impl Coup {
    /// Shuffles a fresh deck and deals two cards and the starting coins to every seat.
    ///
    /// Seats keep the given order for the whole game. The requested host is
    /// kept when seated, otherwise the first seat hosts.
    pub fn initialize<R: Rng + ?Sized>(
        room_id: impl Into<String>,
        seats: Vec<(PlayerId, String)>,
        requested_host_id: PlayerId,
        rules: Rules,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        if seats.len() < MIN_PLAYERS {
            return Err(SetupError::TooFewPlayers { min: MIN_PLAYERS, got: seats.len() });
        }
        if seats.len() > MAX_PLAYERS {
            return Err(SetupError::TooManyPlayers { max: MAX_PLAYERS, got: seats.len() });
        }

        let mut seen = BTreeSet::new();
        for (id, _) in seats.iter() {
            if !seen.insert(*id) {
                return Err(SetupError::DuplicatePlayer(*id));
            }
        }

        let host_id = if seen.contains(&requested_host_id) {
            requested_host_id
        } else {
            seats[0].0
        };

        let mut deck = Deck::shuffled(rng);
        let players: Vec<Player> = seats.into_iter().map(|(id, name)| {
            let cards = (0..STARTING_HAND).filter_map(|_| deck.draw()).collect();
            Player::new(id, name, rules.starting_coins, cards)
        }).collect();

        let room_id = room_id.into();
        let player_ids = players.iter().map(|player| player.id).collect();
        tracing::info!(room = %room_id, players = players.len(), host = %host_id, "game started");

        Ok(Self {
            room_id,
            host_id,
            rules,
            turn: 0,
            turn_index: 0,
            deck,
            players,
            phase: Phase::ActionSelection,
            pending_action: None,
            passed_responder_ids: BTreeSet::new(),
            victim_id: None,
            exchange_player_id: None,
            continuations: Vec::new(),
            winner_id: None,
            logs: vec![LogEntry::GameStarted { player_ids }],
        })
    }

    /// A game with default rules and seats `P0..P{n-1}`.
    pub fn new<R: Rng + ?Sized>(num_players: usize, rng: &mut R) -> Result<Self, SetupError> {
        let seats = (0..num_players)
            .map(|idx| (PlayerId(idx as u32), format!("Player {idx}")))
            .collect();

        Self::initialize("local", seats, PlayerId(0), Rules::default(), rng)
    }

    /// Applies `command`, or returns an identical copy of the state when the
    /// command is illegal, stale or a duplicate.
    pub fn transition<R: Rng + ?Sized>(&self, command: &Command, rng: &mut R) -> Coup {
        match self.try_transition(command, rng) {
            Ok(game) => game,
            Err(rejection) => {
                tracing::debug!(
                    room = %self.room_id,
                    %command,
                    %rejection,
                    kind = rejection.kind().as_str(),
                    "command ignored"
                );
                self.clone()
            }
        }
    }

    /// Same as [`Coup::transition`] but says why a command had no effect.
    pub fn try_transition<R: Rng + ?Sized>(&self, command: &Command, rng: &mut R) -> Result<Coup, Rejection> {
        self.validate(command)?;

        let mut game = self.clone();
        game.apply(command, rng)?;

        tracing::debug!(room = %game.room_id, %command, phase = ?game.phase, "command applied");
        Ok(game)
    }

    fn apply<R: Rng + ?Sized>(&mut self, command: &Command, rng: &mut R) -> Result<(), Rejection> {
        match *command {
            Command::SubmitAction { player_id, action_type, target_id } => {
                self.declare(player_id, action_type, target_id)
            }
            Command::Pass { player_id } => self.pass(player_id),
            Command::Block { player_id, role } => self.block(player_id, role),
            Command::Challenge { player_id } => self.challenge(player_id, rng),
            Command::LoseCard { player_id, card_index } => self.lose_card(player_id, card_index),
            Command::ExchangeReturn { player_id, card_indices } => {
                self.exchange_return(player_id, card_indices, rng)
            }
        }
    }

    fn declare(&mut self, player_id: PlayerId, action: ActionType, target_id: Option<PlayerId>) -> Result<(), Rejection> {
        let cost = self.rules.cost_of(action);
        let actor = self.player_mut(player_id)?;
        actor.coins = actor.coins
            .checked_sub(cost)
            .ok_or(Rejection::Inconsistent("declared an action the actor cannot pay for"))?;

        match action {
            // income is not a claim, it just happens
            ActionType::Income => {
                let amount = self.rules.income;
                self.credit(player_id, amount)?;
                self.logs.push(LogEntry::Income { player_id, amount });
                self.next_turn();
            }
            // neither is a coup
            ActionType::Coup => {
                let target_id = target_id.ok_or(Rejection::MissingTarget(action))?;
                self.logs.push(LogEntry::CoupLaunched { player_id, target_id });
                self.demand_card(target_id);
            }
            _ => {
                self.logs.push(LogEntry::ActionAttempted { player_id, action, target_id });
                self.pending_action = Some(PendingAction {
                    action,
                    source_id: player_id,
                    target_id,
                    blocked_by: None,
                });
                self.open_window(Phase::ChallengeWindow);
            }
        }

        Ok(())
    }

    fn pass(&mut self, player_id: PlayerId) -> Result<(), Rejection> {
        self.passed_responder_ids.insert(player_id);
        self.logs.push(LogEntry::Passed { player_id });

        let pending = self.pending()?;
        let eligible = eligible_responders(&self.players, &pending);
        if !is_unanimous(&eligible, &self.passed_responder_ids) {
            return Ok(());
        }

        match pending.blocked_by {
            Some(block) => {
                self.logs.push(LogEntry::BlockSucceeded {
                    blocker_id: block.blocker_id,
                    role: block.role,
                    action: pending.action,
                });
                self.next_turn();
                Ok(())
            }
            None => {
                let next = self.resolve_effect(&pending)?;
                match next {
                    Some(continuation) => self.resume(continuation),
                    None => {
                        self.next_turn();
                        Ok(())
                    }
                }
            }
        }
    }

    fn block(&mut self, player_id: PlayerId, role: Option<Role>) -> Result<(), Rejection> {
        let mut pending = self.pending()?;
        let role = role
            .or_else(|| pending.action.blocking_roles().first().copied())
            .ok_or(Rejection::NotBlockable(pending.action))?;

        pending.blocked_by = Some(BlockClaim { blocker_id: player_id, role });
        self.pending_action = Some(pending);
        self.logs.push(LogEntry::BlockDeclared {
            blocker_id: player_id,
            role,
            action: pending.action,
            source_id: pending.source_id,
        });
        self.open_window(Phase::BlockResponse);

        Ok(())
    }

    fn challenge<R: Rng + ?Sized>(&mut self, challenger_id: PlayerId, rng: &mut R) -> Result<(), Rejection> {
        let pending = self.pending()?;
        let (claimant_id, role) = pending.contested_claim().ok_or(Rejection::NotChallengeable(pending.action))?;
        self.logs.push(LogEntry::ChallengeStarted { challenger_id, claimant_id, role });

        let proof = self.player(claimant_id)?.find_role(role);
        match (proof, pending.blocked_by) {
            // the action's claim holds: the actor swaps the card, the challenger pays and the action goes ahead
            (Some(card_idx), None) => {
                self.reveal_and_replace(claimant_id, card_idx, rng)?;
                self.logs.push(LogEntry::ChallengeFailed { challenger_id, claimant_id, role });
                let next = self.resolve_effect(&pending)?;
                self.continuations.extend(next);
                self.demand_card(challenger_id);
            }
            // the block's claim holds: the block stands and the actor pays, whoever challenged
            (Some(card_idx), Some(block)) => {
                self.reveal_and_replace(claimant_id, card_idx, rng)?;
                self.logs.push(LogEntry::ChallengeFailed { challenger_id, claimant_id, role });
                self.logs.push(LogEntry::BlockSucceeded {
                    blocker_id: block.blocker_id,
                    role: block.role,
                    action: pending.action,
                });
                self.demand_card(pending.source_id);
            }
            // caught bluffing the action: it never happens
            (None, None) => {
                self.logs.push(LogEntry::ChallengeSucceeded { challenger_id, claimant_id, role });
                self.demand_card(claimant_id);
            }
            // caught bluffing the block: the blocker pays, then the action goes ahead
            (None, Some(_)) => {
                self.logs.push(LogEntry::ChallengeSucceeded { challenger_id, claimant_id, role });
                let next = self.resolve_effect(&pending)?;
                self.continuations.extend(next);
                self.demand_card(claimant_id);
            }
        }

        Ok(())
    }

    fn lose_card(&mut self, player_id: PlayerId, card_index: usize) -> Result<(), Rejection> {
        let victim = self.player_mut(player_id)?;
        let hand_size = victim.cards.len();
        let role = victim
            .lose_card(card_index)
            .ok_or(Rejection::CardIndexOutOfRange { index: card_index, hand_size })?;
        let eliminated = !victim.is_alive();

        self.victim_id = None;
        self.logs.push(LogEntry::CardLost { player_id, role });

        if eliminated {
            self.logs.push(LogEntry::PlayerEliminated { player_id });
            if self.check_winner() {
                return Ok(());
            }
        }

        match self.continuations.pop() {
            Some(continuation) => self.resume(continuation),
            None => {
                self.next_turn();
                Ok(())
            }
        }
    }

    fn exchange_return<R: Rng + ?Sized>(&mut self, player_id: PlayerId, card_indices: [usize; 2], rng: &mut R) -> Result<(), Rejection> {
        let player = self.player_mut(player_id)?;
        let hand_size = player.cards.len();
        let [first, second] = card_indices;
        let (low, high) = if first < second { (first, second) } else { (second, first) };
        if low == high || high >= hand_size {
            return Err(Rejection::InvalidExchangeSelection { indices: card_indices, hand_size });
        }

        // remove the higher index first so the lower one still points at the same card
        let returned = [player.cards.remove(high), player.cards.remove(low)];
        self.deck.return_cards(returned, rng);

        self.logs.push(LogEntry::ExchangeCompleted { player_id });
        self.next_turn();

        Ok(())
    }

    /// Applies an uncontested (or successfully defended) action. Returns what has
    /// to happen before the turn can end, if anything.
    fn resolve_effect(&mut self, pending: &PendingAction) -> Result<Option<Continuation>, Rejection> {
        let source_id = pending.source_id;
        self.logs.push(LogEntry::ActionSucceeded {
            player_id: source_id,
            action: pending.action,
            target_id: pending.target_id,
        });

        let next = match pending.action {
            ActionType::ForeignAid | ActionType::Tax => {
                let amount = if pending.action == ActionType::Tax { self.rules.tax } else { self.rules.foreign_aid };
                self.credit(source_id, amount)?;
                self.logs.push(LogEntry::CoinsGained { player_id: source_id, action: pending.action, amount, from_id: None });
                None
            }
            ActionType::Steal => {
                let target_id = pending.target_id.ok_or(Rejection::MissingTarget(pending.action))?;
                let steal_limit = self.rules.steal_limit;

                // never more than the target has
                let target = self.player_mut(target_id)?;
                let amount = target.coins.min(steal_limit);
                target.coins -= amount;

                self.credit(source_id, amount)?;
                self.logs.push(LogEntry::CoinsGained {
                    player_id: source_id,
                    action: pending.action,
                    amount,
                    from_id: Some(target_id),
                });
                None
            }
            ActionType::Assassinate => {
                let target_id = pending.target_id.ok_or(Rejection::MissingTarget(pending.action))?;
                Some(Continuation::LoseCard(target_id))
            }
            ActionType::Exchange => Some(Continuation::Exchange(source_id)),
            ActionType::Income | ActionType::Coup => None,
        };

        Ok(next)
    }

    fn resume(&mut self, continuation: Continuation) -> Result<(), Rejection> {
        match continuation {
            Continuation::LoseCard(victim_id) => {
                // the victim may already be out, e.g. a lying contessa who was also the target
                if self.player(victim_id)?.is_alive() {
                    self.demand_card(victim_id);
                } else {
                    self.next_turn();
                }
            }
            Continuation::Exchange(player_id) => {
                if self.player(player_id)?.is_alive() {
                    self.start_exchange(player_id)?;
                } else {
                    self.next_turn();
                }
            }
        }

        Ok(())
    }

    fn start_exchange(&mut self, player_id: PlayerId) -> Result<(), Rejection> {
        let drawn: Vec<Role> = (0..EXCHANGE_DRAW).filter_map(|_| self.deck.draw()).collect();
        let count = drawn.len();
        self.player_mut(player_id)?.cards.extend(drawn);

        self.close_window();
        self.exchange_player_id = Some(player_id);
        self.phase = Phase::ExchangeSelect;
        self.logs.push(LogEntry::ExchangeStarted { player_id, drawn: count });

        Ok(())
    }

    // proven card goes back into the deck, the claimant gets a fresh one in the same slot
    fn reveal_and_replace<R: Rng + ?Sized>(&mut self, player_id: PlayerId, card_idx: usize, rng: &mut R) -> Result<(), Rejection> {
        let player = self.player_mut(player_id)?;
        if card_idx >= player.cards.len() {
            return Err(Rejection::Inconsistent("revealed card is not in hand"));
        }

        let card = player.cards.remove(card_idx);
        self.deck.return_cards([card], rng);
        let replacement = self.deck
            .draw()
            .ok_or(Rejection::Inconsistent("deck empty right after a card was returned"))?;
        self.player_mut(player_id)?.cards.insert(card_idx, replacement);

        self.logs.push(LogEntry::CardReplaced { player_id, role: card });
        Ok(())
    }

    fn demand_card(&mut self, victim_id: PlayerId) {
        self.close_window();
        self.victim_id = Some(victim_id);
        self.phase = Phase::LoseCard;
    }

    fn open_window(&mut self, phase: Phase) {
        self.passed_responder_ids.clear();
        self.phase = phase;
    }

    fn close_window(&mut self) {
        self.pending_action = None;
        self.passed_responder_ids.clear();
    }

    fn credit(&mut self, player_id: PlayerId, amount: u8) -> Result<(), Rejection> {
        let player = self.player_mut(player_id)?;
        player.coins = player.coins.saturating_add(amount);
        Ok(())
    }

    /// Ends the game if exactly one player still holds influence.
    fn check_winner(&mut self) -> bool {
        let mut living = self.players.iter().filter(|player| player.is_alive());
        let (Some(winner), None) = (living.next(), living.next()) else {
            return false;
        };
        let winner_id = winner.id;

        self.close_window();
        self.victim_id = None;
        self.exchange_player_id = None;
        self.continuations.clear();
        self.winner_id = Some(winner_id);
        self.phase = Phase::GameOver;
        self.logs.push(LogEntry::GameOver { winner_id });

        tracing::info!(room = %self.room_id, winner = %winner_id, turns = self.turn, "game over");
        true
    }

    fn next_turn(&mut self) {
        self.close_window();
        self.victim_id = None;
        self.exchange_player_id = None;
        self.continuations.clear();
        self.phase = Phase::ActionSelection;
        self.turn += 1;
        self.turn_index = self.next_living_player();
    }

    fn next_living_player(&self) -> usize {
        let len = self.players.len();

        (1..=len)
            .map(|n| (self.turn_index + n) % len)
            .find(|&idx| self.players[idx].is_alive())
            .unwrap_or(self.turn_index)
    }

    fn pending(&self) -> Result<PendingAction, Rejection> {
        self.pending_action.ok_or(Rejection::Inconsistent("no pending action"))
    }

    fn player_mut(&mut self, player_id: PlayerId) -> Result<&mut Player, Rejection> {
        self.players.iter_mut()
            .find(|player| player.id == player_id)
            .ok_or(Rejection::UnknownPlayer(player_id))
    }

    pub fn current_player(&self) -> Result<&Player, Rejection> {
        self.players.get(self.turn_index).ok_or(Rejection::Inconsistent("turn index out of range"))
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn host_id(&self) -> PlayerId {
        self.host_id
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_by_id(&self, player_id: PlayerId) -> Option<&Player> {
        self.player(player_id).ok()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending_action.as_ref()
    }

    pub fn passed_responder_ids(&self) -> &BTreeSet<PlayerId> {
        &self.passed_responder_ids
    }

    pub fn victim_id(&self) -> Option<PlayerId> {
        self.victim_id
    }

    pub fn exchange_player_id(&self) -> Option<PlayerId> {
        self.exchange_player_id
    }

    pub fn continuations(&self) -> &[Continuation] {
        &self.continuations
    }

    /// Player who will exchange once the pending discard resolves.
    pub fn deferred_exchange_source_id(&self) -> Option<PlayerId> {
        self.continuations.iter().find_map(|continuation| match *continuation {
            Continuation::Exchange(player_id) => Some(player_id),
            Continuation::LoseCard(_) => None,
        })
    }

    /// Player who owes a second card once the pending discard resolves.
    pub fn deferred_lose_card_victim_id(&self) -> Option<PlayerId> {
        self.continuations.iter().find_map(|continuation| match *continuation {
            Continuation::LoseCard(player_id) => Some(player_id),
            Continuation::Exchange(_) => None,
        })
    }

    pub fn winner_id(&self) -> Option<PlayerId> {
        self.winner_id
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Per role count over deck, hands and revealed cards. Always three of each.
    pub fn card_census(&self) -> BTreeMap<Role, usize> {
        let mut census: BTreeMap<Role, usize> = ROLE_VARIANTS.iter().map(|&role| (role, 0)).collect();
        let cards = self.deck.cards().iter()
            .chain(self.players.iter().flat_map(|player| player.cards.iter().chain(player.lost_cards.iter())));

        for role in cards {
            *census.entry(*role).or_insert(0) += 1;
        }

        census
    }
}
