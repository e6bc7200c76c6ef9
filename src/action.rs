use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::player::PlayerId;
use crate::Role::{self, Ambassador, Assassin, Captain, Contessa, Duke};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Income,
    ForeignAid,
    Tax,
    Assassinate,
    Steal,
    Exchange,
    Coup,
}

pub static ACTION_VARIANTS: [ActionType; 7] = [
    ActionType::Income,
    ActionType::ForeignAid,
    ActionType::Tax,
    ActionType::Assassinate,
    ActionType::Steal,
    ActionType::Exchange,
    ActionType::Coup,
];

impl ActionType {
    /// The role an actor implicitly claims by choosing this action.
    pub fn claimed_role(self) -> Option<Role> {
        match self {
            ActionType::Tax => Some(Duke),
            ActionType::Assassinate => Some(Assassin),
            ActionType::Steal => Some(Captain),
            ActionType::Exchange => Some(Ambassador),
            ActionType::Income | ActionType::ForeignAid | ActionType::Coup => None,
        }
    }

    /// Roles that may be claimed to block this action. The first one is the default.
    pub fn blocking_roles(self) -> &'static [Role] {
        match self {
            ActionType::ForeignAid => &[Duke],
            ActionType::Assassinate => &[Contessa],
            ActionType::Steal => &[Captain, Ambassador],
            ActionType::Income | ActionType::Tax | ActionType::Exchange | ActionType::Coup => &[],
        }
    }

    pub fn is_targeted(self) -> bool {
        matches!(self, ActionType::Assassinate | ActionType::Steal | ActionType::Coup)
    }

    /// Only the target of these actions may block them; anyone may block foreign aid.
    pub fn block_restricted_to_target(self) -> bool {
        matches!(self, ActionType::Assassinate | ActionType::Steal)
    }

    /// Income and coup resolve on the spot, everything else goes through a response window.
    pub fn opens_window(self) -> bool {
        !matches!(self, ActionType::Income | ActionType::Coup)
    }
}

impl Display for ActionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionType::Income => "Income",
            ActionType::ForeignAid => "Foreign Aid",
            ActionType::Tax => "Tax",
            ActionType::Assassinate => "Assassinate",
            ActionType::Steal => "Steal",
            ActionType::Exchange => "Exchange",
            ActionType::Coup => "Coup",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockClaim {
    pub blocker_id: PlayerId,
    pub role: Role,
}

/// The single claim currently open to responses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAction {
    #[serde(rename = "type")]
    pub action: ActionType,
    pub source_id: PlayerId,
    pub target_id: Option<PlayerId>,
    pub blocked_by: Option<BlockClaim>,
}

impl PendingAction {
    /// The player whose claim is currently being contested, and the role they claim.
    pub fn contested_claim(&self) -> Option<(PlayerId, Role)> {
        match self.blocked_by {
            Some(block) => Some((block.blocker_id, block.role)),
            None => self.action.claimed_role().map(|role| (self.source_id, role)),
        }
    }
}

/// Everything a client can ask the engine to do.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, Hash)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum Command {
    SubmitAction {
        player_id: PlayerId,
        action_type: ActionType,
        target_id: Option<PlayerId>,
    },
    Pass {
        player_id: PlayerId,
    },
    Block {
        player_id: PlayerId,
        role: Option<Role>,
    },
    Challenge {
        player_id: PlayerId,
    },
    LoseCard {
        player_id: PlayerId,
        card_index: usize,
    },
    ExchangeReturn {
        player_id: PlayerId,
        card_indices: [usize; 2],
    },
}

impl Command {
    pub fn player_id(&self) -> PlayerId {
        match *self {
            Command::SubmitAction { player_id, .. }
            | Command::Pass { player_id }
            | Command::Block { player_id, .. }
            | Command::Challenge { player_id }
            | Command::LoseCard { player_id, .. }
            | Command::ExchangeReturn { player_id, .. } => player_id,
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::SubmitAction { player_id, action_type, target_id: Some(target_id) } => {
                f.write_fmt(format_args!("{player_id} declares {action_type} on {target_id}"))
            }
            Command::SubmitAction { player_id, action_type, target_id: None } => {
                f.write_fmt(format_args!("{player_id} declares {action_type}"))
            }
            Command::Pass { player_id } => {
                f.write_fmt(format_args!("{player_id} passes"))
            }
            Command::Block { player_id, role: Some(role) } => {
                f.write_fmt(format_args!("{player_id} blocks with {role}"))
            }
            Command::Block { player_id, role: None } => {
                f.write_fmt(format_args!("{player_id} blocks"))
            }
            Command::Challenge { player_id } => {
                f.write_fmt(format_args!("{player_id} challenges"))
            }
            Command::LoseCard { player_id, card_index } => {
                f.write_fmt(format_args!("{player_id} loses card {card_index}"))
            }
            Command::ExchangeReturn { player_id, card_indices: [first, second] } => {
                f.write_fmt(format_args!("{player_id} returns cards {first} and {second}"))
            }
        }
    }
}
