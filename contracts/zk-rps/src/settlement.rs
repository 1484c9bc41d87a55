//! Winner computation and payout split.

use crate::{Choice, Outcome};

/// Classic Rock-Paper-Scissors resolution.
/// Returns `true` when `hand1` beats `hand2`.
fn beats(hand1: Choice, hand2: Choice) -> bool {
    matches!(
        (hand1, hand2),
        (Choice::Rock, Choice::Scissors)
            | (Choice::Scissors, Choice::Paper)
            | (Choice::Paper, Choice::Rock)
    )
}

pub fn outcome(p1: Choice, p2: Choice) -> Outcome {
    if beats(p1, p2) {
        Outcome::Player1Wins
    } else if beats(p2, p1) {
        Outcome::Player2Wins
    } else {
        Outcome::Tie
    }
}

/// Credits `(player1, player2)` for a pot of two equal stakes.
///
/// Both entries always sum to `2 * bet_size`.
pub fn payouts(outcome: Outcome, bet_size: i128) -> (i128, i128) {
    let pot = bet_size * 2;
    match outcome {
        Outcome::Player1Wins => (pot, 0),
        Outcome::Player2Wins => (0, pot),
        Outcome::Tie => (bet_size, bet_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    #[test]
    fn test_all_rps_outcomes() {
        let matchups = [
            (Choice::Rock, Choice::Paper, Outcome::Player2Wins),
            (Choice::Rock, Choice::Scissors, Outcome::Player1Wins),
            (Choice::Paper, Choice::Rock, Outcome::Player1Wins),
            (Choice::Paper, Choice::Scissors, Outcome::Player2Wins),
            (Choice::Scissors, Choice::Rock, Outcome::Player2Wins),
            (Choice::Scissors, Choice::Paper, Outcome::Player1Wins),
        ];
        for (h1, h2, expected) in matchups {
            assert_eq!(outcome(h1, h2), expected, "{:?} vs {:?}", h1, h2);
        }
    }

    #[test]
    fn test_identical_choices_tie() {
        for hand in ALL {
            assert_eq!(outcome(hand, hand), Outcome::Tie);
        }
    }

    #[test]
    fn test_outcome_is_antisymmetric() {
        for h1 in ALL {
            for h2 in ALL {
                let mirrored = match outcome(h1, h2) {
                    Outcome::Player1Wins => Outcome::Player2Wins,
                    Outcome::Player2Wins => Outcome::Player1Wins,
                    Outcome::Tie => Outcome::Tie,
                };
                assert_eq!(outcome(h2, h1), mirrored);
            }
        }
    }

    #[test]
    fn test_payouts_conserve_pot() {
        let bet = 10_000_000i128;
        assert_eq!(payouts(Outcome::Player1Wins, bet), (2 * bet, 0));
        assert_eq!(payouts(Outcome::Player2Wins, bet), (0, 2 * bet));
        assert_eq!(payouts(Outcome::Tie, bet), (bet, bet));
        for o in [Outcome::Player1Wins, Outcome::Player2Wins, Outcome::Tie] {
            let (a, b) = payouts(o, bet);
            assert_eq!(a + b, 2 * bet);
        }
    }
}
