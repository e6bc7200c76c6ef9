//! Command validation. Everything here is read only: a command either passes
//! or comes back with the reason it would have been a no-op.

use crate::action::{ActionType, Command, PendingAction, ACTION_VARIANTS};
use crate::error::Rejection;
use crate::player::{Player, PlayerId};
use crate::window::eligible_responders;
use crate::{Coup, Phase, ROLE_VARIANTS};

impl Coup {
    pub fn validate(&self, command: &Command) -> Result<(), Rejection> {
        if self.phase == Phase::GameOver {
            return Err(Rejection::GameOver);
        }

        match *command {
            Command::SubmitAction { player_id, action_type, target_id } => {
                self.validate_action(player_id, action_type, target_id)
            }
            Command::Pass { player_id } => {
                self.expect_window()?;
                self.validate_responder(player_id).map(|_| ())
            }
            Command::Challenge { player_id } => {
                self.expect_window()?;
                let pending = self.validate_responder(player_id)?;
                match pending.contested_claim() {
                    Some(_) => Ok(()),
                    None => Err(Rejection::NotChallengeable(pending.action)),
                }
            }
            Command::Block { player_id, role } => {
                self.expect_phase(Phase::ChallengeWindow)?;
                let pending = self.validate_responder(player_id)?;
                let blocking_roles = pending.action.blocking_roles();
                let Some(&default_role) = blocking_roles.first() else {
                    return Err(Rejection::NotBlockable(pending.action));
                };

                if pending.action.block_restricted_to_target() && pending.target_id != Some(player_id) {
                    return Err(Rejection::NotTarget { player: player_id, action: pending.action });
                }

                let role = role.unwrap_or(default_role);
                if !blocking_roles.contains(&role) {
                    return Err(Rejection::InvalidBlockRole { role, action: pending.action });
                }

                Ok(())
            }
            Command::LoseCard { player_id, card_index } => {
                self.expect_phase(Phase::LoseCard)?;
                if self.victim_id != Some(player_id) {
                    return Err(Rejection::NotVictim(player_id));
                }

                let victim = self.player(player_id)?;
                if card_index >= victim.cards.len() {
                    return Err(Rejection::CardIndexOutOfRange { index: card_index, hand_size: victim.cards.len() });
                }

                Ok(())
            }
            Command::ExchangeReturn { player_id, card_indices } => {
                self.expect_phase(Phase::ExchangeSelect)?;
                if self.exchange_player_id != Some(player_id) {
                    return Err(Rejection::NotExchanger(player_id));
                }

                let hand_size = self.player(player_id)?.cards.len();
                let [first, second] = card_indices;
                if first == second || first >= hand_size || second >= hand_size {
                    return Err(Rejection::InvalidExchangeSelection { indices: card_indices, hand_size });
                }

                Ok(())
            }
        }
    }

    fn validate_action(&self, player_id: PlayerId, action: ActionType, target_id: Option<PlayerId>) -> Result<(), Rejection> {
        self.expect_phase(Phase::ActionSelection)?;

        let actor = self.current_player()?;
        if actor.id != player_id {
            return Err(Rejection::NotYourTurn { player: player_id, current: actor.id });
        }
        if !actor.is_alive() {
            return Err(Rejection::Eliminated(player_id));
        }

        if action != ActionType::Coup && self.rules.must_coup(actor.coins) {
            return Err(Rejection::MustCoup { player: player_id, coins: actor.coins });
        }

        let needed = self.rules.cost_of(action);
        if actor.coins < needed {
            return Err(Rejection::InsufficientCoins { player: player_id, action, needed, available: actor.coins });
        }

        match (action.is_targeted(), target_id) {
            (true, None) => return Err(Rejection::MissingTarget(action)),
            (true, Some(target_id)) if target_id == player_id => return Err(Rejection::SelfTarget(player_id)),
            (true, Some(target_id)) => {
                self.living_player(target_id)?;
            }
            (false, Some(_)) => return Err(Rejection::UnexpectedTarget(action)),
            (false, None) => {}
        }

        if action == ActionType::Exchange && self.deck.len() < EXCHANGE_DRAW {
            return Err(Rejection::DeckExhausted { available: self.deck.len(), needed: EXCHANGE_DRAW });
        }

        Ok(())
    }

    fn validate_responder(&self, player_id: PlayerId) -> Result<&PendingAction, Rejection> {
        let pending = self.pending_action.as_ref()
            .ok_or(Rejection::Inconsistent("response window without a pending action"))?;

        self.living_player(player_id)?;

        if self.passed_responder_ids.contains(&player_id) {
            return Err(Rejection::AlreadyPassed(player_id));
        }
        if !eligible_responders(&self.players, pending).contains(&player_id) {
            return Err(Rejection::NotEligible(player_id));
        }

        Ok(pending)
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), Rejection> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(Rejection::WrongPhase { actual: self.phase })
        }
    }

    fn expect_window(&self) -> Result<(), Rejection> {
        match self.phase {
            Phase::ChallengeWindow | Phase::BlockResponse => Ok(()),
            actual => Err(Rejection::WrongPhase { actual }),
        }
    }

    pub(crate) fn player(&self, player_id: PlayerId) -> Result<&Player, Rejection> {
        self.players.iter()
            .find(|player| player.id == player_id)
            .ok_or(Rejection::UnknownPlayer(player_id))
    }

    fn living_player(&self, player_id: PlayerId) -> Result<&Player, Rejection> {
        let player = self.player(player_id)?;
        if player.is_alive() {
            Ok(player)
        } else {
            Err(Rejection::Eliminated(player_id))
        }
    }

    /// Every command `transition` would accept right now, from any player.
    pub fn legal_commands(&self) -> Vec<Command> {
        self.candidate_commands()
            .into_iter()
            .filter(|command| self.validate(command).is_ok())
            .collect()
    }

    // superset of the legal commands for the current phase
    fn candidate_commands(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.players.len() * 4);

        match self.phase {
            Phase::ActionSelection => {
                if let Some(actor) = self.players.get(self.turn_index) {
                    for &action_type in ACTION_VARIANTS.iter() {
                        if action_type.is_targeted() {
                            for target in self.players.iter() {
                                commands.push(Command::SubmitAction {
                                    player_id: actor.id,
                                    action_type,
                                    target_id: Some(target.id),
                                });
                            }
                        } else {
                            commands.push(Command::SubmitAction { player_id: actor.id, action_type, target_id: None });
                        }
                    }
                }
            }
            Phase::ChallengeWindow | Phase::BlockResponse => {
                for player in self.players.iter() {
                    commands.push(Command::Pass { player_id: player.id });
                    commands.push(Command::Challenge { player_id: player.id });
                    for &role in ROLE_VARIANTS.iter() {
                        commands.push(Command::Block { player_id: player.id, role: Some(role) });
                    }
                }
            }
            Phase::LoseCard => {
                if let Some(victim) = self.victim_id.and_then(|id| self.player(id).ok()) {
                    for card_index in 0..victim.cards.len() {
                        commands.push(Command::LoseCard { player_id: victim.id, card_index });
                    }
                }
            }
            Phase::ExchangeSelect => {
                if let Some(player) = self.exchange_player_id.and_then(|id| self.player(id).ok()) {
                    for first in 0..player.cards.len() {
                        for second in first + 1..player.cards.len() {
                            commands.push(Command::ExchangeReturn { player_id: player.id, card_indices: [first, second] });
                        }
                    }
                }
            }
            Phase::GameOver => {}
        }

        commands
    }
}

/// Cards an ambassador draws before choosing what to keep.
pub const EXCHANGE_DRAW: usize = 2;
