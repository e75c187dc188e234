//! Top-level move selection.
//!
//! The player opens in the centre, plays any decisive tactical move the
//! rule cascade finds, uses a small opening set while few stones are down,
//! and otherwise scores moves with rollouts under its configured policy.

use tracing::debug;

use crate::board::{Board, Color};
use crate::constants::{OPENING_PLIES, PASS};
use crate::geometry::Point;
use crate::playout::{RolloutConfig, Simulator};
use crate::policy::{Policy, Tactic, generate_policy_moves, rule_based};

/// A Ninuki player: a policy plus the simulator that carries it out.
pub struct Player {
    policy: Policy,
    simulator: Simulator,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(RolloutConfig::default())
    }
}

impl Player {
    pub fn new(config: RolloutConfig) -> Self {
        Player {
            policy: Policy::default(),
            simulator: Simulator::new(config),
        }
    }

    /// A player whose choices are reproducible.
    pub fn with_seed(config: RolloutConfig, seed: u64) -> Self {
        Player {
            policy: Policy::default(),
            simulator: Simulator::with_seed(config, seed),
        }
    }

    pub fn set_policy(&mut self, policy: Policy) {
        self.policy = policy;
    }

    pub fn get_policy(&self) -> Policy {
        self.policy
    }

    /// Candidate moves the current policy would consider.
    pub fn policy_moves(&self, board: &Board, color: Color) -> Tactic {
        generate_policy_moves(board, color, self.policy)
    }

    /// Choose a move for `color`, or `PASS` if there is no legal move.
    pub fn get_move(&mut self, board: &Board, color: Color) -> Point {
        let stones = board.stone_count();

        if stones == 0 {
            let center = board.geometry().center();
            if board.is_legal(center, color) {
                debug!(%color, "opening in the centre");
                return center;
            }
        }

        let tactic = rule_based(board, color);
        if tactic.is_decisive() {
            debug!(%color, tier = tactic.label(), candidates = tactic.moves().len(), "tactical move");
            return tactic.moves()[0];
        }
        if tactic.moves().is_empty() {
            return PASS;
        }

        if stones <= OPENING_PLIES {
            let opening = opening_moves(board, color);
            if let Some(mv) = self.simulator.rng().choice(opening) {
                debug!(%color, stones, "opening move");
                return mv;
            }
        }

        debug!(
            %color,
            policy = %self.policy,
            candidates = tactic.moves().len(),
            sims = self.simulator.config().sims_for(self.policy),
            "simulating"
        );
        let best = match self.policy {
            Policy::Random => self.simulator.random_simulation(board, color),
            Policy::RuleBased => self.simulator.policy_simulation(board, color),
        };
        best.unwrap_or(PASS)
    }
}

/// Legal points of the 3x3 block around the centre.
fn opening_moves(board: &Board, color: Color) -> Vec<Point> {
    let geometry = board.geometry();
    let (row, col) = geometry.coord(geometry.center());
    let near = |c: usize| c.saturating_sub(1).max(1)..=(c + 1).min(geometry.size());
    near(row)
        .flat_map(|r| near(col).map(move |c| (r, c)))
        .map(|(r, c)| geometry.pt(r, c))
        .filter(|&pt| board.is_legal(pt, color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> RolloutConfig {
        RolloutConfig {
            random_sims: 2,
            rule_sims: 1,
            max_plies: None,
            time_limit: None,
        }
    }

    fn place(board: &mut Board, color: Color, stones: &[(usize, usize)]) {
        for &(row, col) in stones {
            let pt = board.pt(row, col);
            assert!(board.play_move(pt, color));
        }
    }

    #[test]
    fn test_policy_setting() {
        let mut player = Player::with_seed(quick(), 1);
        assert_eq!(player.get_policy(), Policy::Random);
        player.set_policy(Policy::RuleBased);
        assert_eq!(player.get_policy(), Policy::RuleBased);
    }

    #[test]
    fn test_first_move_is_center() {
        let board = Board::new(7);
        let mut player = Player::with_seed(quick(), 2);
        assert_eq!(player.get_move(&board, Color::Black), board.pt(4, 4));
        assert_eq!(player.get_move(&board, Color::White), board.pt(4, 4));
    }

    #[test]
    fn test_opening_stays_near_center() {
        let mut board = Board::new(7);
        place(&mut board, Color::Black, &[(4, 4)]);
        place(&mut board, Color::White, &[(1, 1)]);
        let mut player = Player::with_seed(quick(), 3);
        for _ in 0..10 {
            let mv = player.get_move(&board, Color::Black);
            let (row, col) = board.geometry().coord(mv);
            assert!((3..=5).contains(&row) && (3..=5).contains(&col), "{row},{col}");
            assert!(board.is_legal(mv, Color::Black));
        }
    }

    #[test]
    fn test_tactical_move_wins_over_opening() {
        let mut board = Board::new(7);
        place(&mut board, Color::White, &[(4, 4)]);
        place(&mut board, Color::Black, &[(4, 5), (4, 6)]);
        let mut player = Player::with_seed(quick(), 4);
        assert_eq!(player.get_move(&board, Color::White), board.pt(4, 7));
    }

    #[test]
    fn test_opening_moves_clip_to_board() {
        let board = Board::new(2);
        let moves = opening_moves(&board, Color::Black);
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn test_simulates_after_opening() {
        let mut board = Board::new(5);
        // Nine scattered stones with no tactical shape
        place(&mut board, Color::Black, &[(1, 1), (1, 4), (3, 2), (5, 1), (5, 5)]);
        place(&mut board, Color::White, &[(1, 2), (2, 5), (4, 3), (5, 3)]);
        assert!(!rule_based(&board, Color::Black).is_decisive());
        for policy in [Policy::Random, Policy::RuleBased] {
            let mut player = Player::with_seed(quick(), 5);
            player.set_policy(policy);
            let mv = player.get_move(&board, Color::Black);
            assert!(board.is_legal(mv, Color::Black) && mv != PASS, "{policy}");
        }
    }

    #[test]
    fn test_never_plays_ko_point() {
        let mut board = Board::new(7);
        place(&mut board, Color::Black, &[(1, 1), (1, 2), (1, 3), (1, 4)]);
        let win = board.pt(1, 5);
        board.set_ko_recapture(win);
        let mut player = Player::with_seed(quick(), 7);
        for _ in 0..10 {
            let mv = player.get_move(&board, Color::Black);
            assert_ne!(mv, win);
            assert!(board.is_legal(mv, Color::Black));
        }
    }

    #[test]
    fn test_pass_on_full_board() {
        let mut board = Board::new(2);
        place(&mut board, Color::Black, &[(1, 1), (2, 2)]);
        place(&mut board, Color::White, &[(1, 2), (2, 1)]);
        let mut player = Player::with_seed(quick(), 6);
        assert_eq!(player.get_move(&board, Color::Black), PASS);
    }
}
