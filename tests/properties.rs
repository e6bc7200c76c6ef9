//! Invariants checked over seeded random games.

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use coup_engine::{ActionType, Command, Coup, Phase, PlayerId, Rejection, RejectionKind, Role, ROLE_VARIANTS};

fn check_invariants(game: &Coup) -> Result<(), TestCaseError> {
    let census = game.card_census();
    prop_assert!(census.values().all(|&count| count == 3), "cards created or destroyed: {:?}", census);

    let in_window = matches!(game.phase(), Phase::ChallengeWindow | Phase::BlockResponse);
    prop_assert_eq!(game.pending_action().is_some(), in_window);
    prop_assert!(in_window || game.passed_responder_ids().is_empty());
    prop_assert!(game.continuations().len() <= 1);
    prop_assert_eq!(game.victim_id().is_some(), game.phase() == Phase::LoseCard);
    prop_assert_eq!(game.exchange_player_id().is_some(), game.phase() == Phase::ExchangeSelect);
    prop_assert_eq!(game.winner_id().is_some(), game.phase() == Phase::GameOver);

    let living = game.players().iter().filter(|player| player.is_alive()).count();
    if game.phase() == Phase::GameOver {
        prop_assert_eq!(living, 1);
    } else {
        prop_assert!(living >= 2);
        prop_assert!(game.current_player().map(|player| player.is_alive()).unwrap_or(false));
    }

    if let Some(victim) = game.victim_id().and_then(|id| game.player_by_id(id)) {
        prop_assert!(victim.is_alive());
    }

    Ok(())
}

// every command shape for every seat, plus one seat that doesn't exist
fn all_commands(game: &Coup) -> Vec<Command> {
    let mut ids: Vec<PlayerId> = game.players().iter().map(|player| player.id).collect();
    ids.push(PlayerId(99));

    let mut commands = Vec::new();
    for &player_id in ids.iter() {
        for action_type in [
            ActionType::Income,
            ActionType::ForeignAid,
            ActionType::Tax,
            ActionType::Exchange,
        ] {
            commands.push(Command::SubmitAction { player_id, action_type, target_id: None });
        }
        for &target in ids.iter() {
            for action_type in [ActionType::Assassinate, ActionType::Steal, ActionType::Coup] {
                commands.push(Command::SubmitAction { player_id, action_type, target_id: Some(target) });
            }
        }

        commands.push(Command::Pass { player_id });
        commands.push(Command::Challenge { player_id });
        commands.push(Command::Block { player_id, role: None });
        for &role in ROLE_VARIANTS.iter() {
            commands.push(Command::Block { player_id, role: Some(role) });
        }
        for card_index in 0..5 {
            commands.push(Command::LoseCard { player_id, card_index });
        }
        commands.push(Command::ExchangeReturn { player_id, card_indices: [0, 1] });
        commands.push(Command::ExchangeReturn { player_id, card_indices: [1, 3] });
        commands.push(Command::ExchangeReturn { player_id, card_indices: [2, 2] });
    }

    commands
}

fn first_living_after(game: &Coup, idx: usize) -> usize {
    let len = game.players().len();
    (1..=len)
        .map(|n| (idx + n) % len)
        .find(|&next| game.players()[next].is_alive())
        .unwrap_or(idx)
}

// coins can only be set through a snapshot, the same way a room would restore one
fn with_coins(game: &Coup, player_idx: usize, coins: u8) -> Coup {
    let mut snapshot = serde_json::to_value(game).unwrap();
    snapshot["players"][player_idx]["coins"] = coins.into();
    serde_json::from_value(snapshot).unwrap()
}

// leaves one card in the deck, the rest go face up in front of `player_idx`
fn with_one_card_left(game: &Coup, player_idx: usize) -> Coup {
    let mut snapshot = serde_json::to_value(game).unwrap();
    let deck = snapshot["deck"].as_array_mut().unwrap();
    let moved: Vec<serde_json::Value> = deck.drain(1..).collect();
    snapshot["players"][player_idx]["lost_cards"].as_array_mut().unwrap().extend(moved);
    serde_json::from_value(snapshot).unwrap()
}

#[test]
fn exchange_needs_two_cards_in_the_deck() {
    let mut rng = Pcg64::seed_from_u64(7);
    let game = with_one_card_left(&Coup::new(2, &mut rng).unwrap(), 1);
    assert_eq!(game.deck().len(), 1);
    assert!(game.card_census().values().all(|&count| count == 3));

    let exchange = Command::SubmitAction { player_id: PlayerId(0), action_type: ActionType::Exchange, target_id: None };
    let rejection = game.try_transition(&exchange, &mut rng).unwrap_err();
    assert_eq!(rejection, Rejection::DeckExhausted { available: 1, needed: 2 });
    assert_eq!(rejection.kind(), RejectionKind::Illegal);

    assert_eq!(game.transition(&exchange, &mut rng), game);
    assert!(!game.legal_commands().contains(&exchange));

    // everything that doesn't draw is still open
    let tax = Command::SubmitAction { player_id: PlayerId(0), action_type: ActionType::Tax, target_id: None };
    assert!(game.legal_commands().contains(&tax));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_games_keep_their_invariants(seed in any::<u64>(), players in 2usize..=6) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut game = Coup::new(players, &mut rng).unwrap();
        check_invariants(&game)?;

        for _ in 0..600 {
            let legal = game.legal_commands();
            let Some(command) = legal.choose(&mut rng).cloned() else {
                break;
            };

            let next = game.try_transition(&command, &mut rng);
            prop_assert!(next.is_ok(), "listed command {} was rejected: {:?}", command, next);
            let next = next.unwrap();
            check_invariants(&next)?;

            // a finished turn hands over to the next living seat
            if next.turn() == game.turn() + 1 && next.phase() == Phase::ActionSelection {
                prop_assert_eq!(next.turn_index(), first_living_after(&next, game.turn_index()));
            }

            game = next;
        }
    }

    #[test]
    fn unlisted_commands_change_nothing(seed in any::<u64>(), players in 2usize..=6, steps in 0usize..80) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut game = Coup::new(players, &mut rng).unwrap();

        for _ in 0..steps {
            let Some(command) = game.legal_commands().choose(&mut rng).cloned() else {
                break;
            };
            game = game.transition(&command, &mut rng);
        }

        let legal = game.legal_commands();
        for command in all_commands(&game) {
            if legal.contains(&command) {
                continue;
            }
            // a defaulted block role is the same command as the explicit one
            if let Command::Block { player_id, role: None } = command {
                let explicit = legal.iter().any(|listed| matches!(listed, Command::Block { player_id: id, .. } if *id == player_id));
                if explicit {
                    continue;
                }
            }

            prop_assert_eq!(&game.transition(&command, &mut rng), &game, "{} changed the state", command);
        }
    }

    #[test]
    fn finished_games_never_change(seed in any::<u64>(), players in 2usize..=4) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let game = Coup::new(players, &mut rng).unwrap();
        let game = coup_engine::sim::play_random(game, &mut rng, 50_000).game;

        prop_assert_eq!(game.phase(), Phase::GameOver);
        prop_assert!(game.legal_commands().is_empty());
        for command in all_commands(&game) {
            prop_assert_eq!(&game.transition(&command, &mut rng), &game);
        }
    }

    #[test]
    fn foreign_aid_needs_every_pass(seed in any::<u64>(), players in 2usize..=6) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut game = Coup::new(players, &mut rng).unwrap();
        game = game.transition(&Command::SubmitAction { player_id: PlayerId(0), action_type: ActionType::ForeignAid, target_id: None }, &mut rng);

        let mut responders: Vec<u32> = (1..players as u32).collect();
        responders.shuffle(&mut rng);
        let last = responders.pop().unwrap();

        for player in responders {
            game = game.transition(&Command::Pass { player_id: PlayerId(player) }, &mut rng);
            prop_assert_eq!(game.phase(), Phase::ChallengeWindow);
            prop_assert_eq!(game.players()[0].coins, 2);
        }

        game = game.transition(&Command::Pass { player_id: PlayerId(last) }, &mut rng);
        prop_assert_eq!(game.phase(), Phase::ActionSelection);
        prop_assert_eq!(game.players()[0].coins, 4);
    }

    #[test]
    fn steal_moves_at_most_two(seed in any::<u64>(), coins in 0u8..6) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let game = with_coins(&Coup::new(2, &mut rng).unwrap(), 1, coins);

        let game = game.transition(&Command::SubmitAction { player_id: PlayerId(0), action_type: ActionType::Steal, target_id: Some(PlayerId(1)) }, &mut rng);
        let game = game.transition(&Command::Pass { player_id: PlayerId(1) }, &mut rng);

        let moved = coins.min(2);
        prop_assert_eq!(game.players()[0].coins, 2 + moved);
        prop_assert_eq!(game.players()[1].coins, coins - moved);
    }

    #[test]
    fn challenged_claims_cost_exactly_one_card(seed in any::<u64>()) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let game = Coup::new(2, &mut rng).unwrap();
        let truthful = game.players()[0].cards.contains(&Role::Duke);

        let game = game.transition(&Command::SubmitAction { player_id: PlayerId(0), action_type: ActionType::Tax, target_id: None }, &mut rng);
        let game = game.transition(&Command::Challenge { player_id: PlayerId(1) }, &mut rng);

        prop_assert_eq!(game.phase(), Phase::LoseCard);
        prop_assert_eq!(game.players()[0].cards.len(), 2);
        if truthful {
            prop_assert_eq!(game.victim_id(), Some(PlayerId(1)));
            prop_assert_eq!(game.players()[0].coins, 5);
        } else {
            prop_assert_eq!(game.victim_id(), Some(PlayerId(0)));
            prop_assert_eq!(game.players()[0].coins, 2);
        }
    }
}
