//! Response windows: who may answer a claim, and when everyone has let it through.

use std::collections::BTreeSet;
use crate::action::PendingAction;
use crate::player::{Player, PlayerId};

/// Living players other than `excluded`, in seat order starting just after them.
pub fn other_living_players(players: &[Player], excluded: PlayerId) -> Vec<PlayerId> {
    let start = players.iter().position(|player| player.id == excluded).unwrap_or(0);

    (1..players.len())
        .map(|n| &players[(start + n) % players.len()])
        .filter(|player| player.is_alive() && player.id != excluded)
        .map(|player| player.id)
        .collect()
}

/// The claimant whose claim the window is about; everyone else alive may respond.
pub fn window_owner(pending: &PendingAction) -> PlayerId {
    match pending.blocked_by {
        Some(block) => block.blocker_id,
        None => pending.source_id,
    }
}

pub fn eligible_responders(players: &[Player], pending: &PendingAction) -> Vec<PlayerId> {
    other_living_players(players, window_owner(pending))
}

/// True once every eligible responder has passed. A single challenge or block never gets here.
pub fn is_unanimous(eligible: &[PlayerId], passed: &BTreeSet<PlayerId>) -> bool {
    eligible.iter().all(|id| passed.contains(id))
}

#[cfg(test)]
mod tests {
    use crate::action::{ActionType, BlockClaim};
    use crate::Role::{Captain, Duke};
    use super::*;

    fn table(alive: &[bool]) -> Vec<Player> {
        alive.iter().enumerate().map(|(idx, &alive)| {
            let cards = if alive { vec![Duke] } else { vec![] };
            Player::new(PlayerId(idx as u32), format!("p{idx}"), 2, cards)
        }).collect()
    }

    #[test]
    fn other_players_wrap_in_seat_order() {
        let players = table(&[true, true, true, true]);
        assert_eq!(other_living_players(&players, PlayerId(1)), vec![PlayerId(2), PlayerId(3), PlayerId(0)]);
        assert_eq!(other_living_players(&players, PlayerId(0)), vec![PlayerId(1), PlayerId(2), PlayerId(3)]);
    }

    #[test]
    fn dead_players_never_respond() {
        let players = table(&[true, false, true, true]);
        assert_eq!(other_living_players(&players, PlayerId(3)), vec![PlayerId(0), PlayerId(2)]);
    }

    #[test]
    fn block_window_excludes_the_blocker_not_the_actor() {
        let players = table(&[true, true, true]);
        let mut pending = PendingAction {
            action: ActionType::Steal,
            source_id: PlayerId(0),
            target_id: Some(PlayerId(2)),
            blocked_by: None,
        };
        assert_eq!(eligible_responders(&players, &pending), vec![PlayerId(1), PlayerId(2)]);

        pending.blocked_by = Some(BlockClaim { blocker_id: PlayerId(2), role: Captain });
        assert_eq!(eligible_responders(&players, &pending), vec![PlayerId(0), PlayerId(1)]);
    }

    #[test]
    fn unanimity_needs_every_responder() {
        let eligible = vec![PlayerId(1), PlayerId(2), PlayerId(3)];
        let mut passed = BTreeSet::new();
        passed.insert(PlayerId(1));
        passed.insert(PlayerId(3));
        assert!(!is_unanimous(&eligible, &passed));

        passed.insert(PlayerId(2));
        assert!(is_unanimous(&eligible, &passed));
    }
}
