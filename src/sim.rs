// random self-play, used by the simulator binary, the benchmark and the property tests

use rand::Rng;
use crate::action::Command;
use crate::Coup;

/// A uniformly chosen legal command, or `None` once nobody can act.
pub fn random_command<R: Rng + ?Sized>(game: &Coup, rng: &mut R) -> Option<Command> {
    let mut commands = game.legal_commands();
    if commands.is_empty() {
        return None;
    }

    let random_index = rng.gen_range(0..commands.len());
    Some(commands.swap_remove(random_index))
}

pub struct Playout {
    pub game: Coup,
    pub commands: usize,
}

/// Plays random legal commands until the game ends or `max_commands` were applied.
pub fn play_random<R: Rng + ?Sized>(game: Coup, rng: &mut R, max_commands: usize) -> Playout {
    let mut game = game;
    let mut commands = 0;

    while commands < max_commands {
        let Some(command) = random_command(&game, rng) else {
            break;
        };

        game = game.transition(&command, rng);
        commands += 1;
    }

    Playout { game, commands }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::Phase;
    use super::*;

    #[test]
    fn complete_game() {
        let mut rng = Pcg64::seed_from_u64(2024);
        let game = Coup::new(4, &mut rng).unwrap();

        let playout = play_random(game, &mut rng, 20_000);
        assert_eq!(playout.game.phase(), Phase::GameOver);
        assert!(playout.game.winner_id().is_some());
        assert_eq!(random_command(&playout.game, &mut rng), None);
    }

    #[test]
    fn same_seed_same_game() {
        let play = |seed| {
            let mut rng = Pcg64::seed_from_u64(seed);
            let game = Coup::new(3, &mut rng).unwrap();
            play_random(game, &mut rng, 300).game
        };

        assert_eq!(play(11), play(11));
    }
}
