//! Monte Carlo rollouts (game simulation to the end).
//!
//! A rollout copies the board, plays the candidate move, and then keeps
//! playing until [`Board::end_of_game`] reports a result. Each ply either
//! picks a uniformly random legal move or a random move from the rule
//! cascade's top tier, depending on the [`Policy`].
//!
//! Every candidate is scored by the fraction of its rollouts won by the
//! color that played it; the best-scoring candidate is chosen.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::board::{Board, Color, GameResult};
use crate::constants::{N_SIMS_RANDOM, N_SIMS_RULE_BASED, max_game_len};
use crate::geometry::Point;
use crate::policy::{Policy, rule_based};

/// Rollout budget.
#[derive(Clone, Debug, PartialEq)]
pub struct RolloutConfig {
    /// Rollouts per candidate under [`Policy::Random`]
    pub random_sims: usize,
    /// Rollouts per candidate under [`Policy::RuleBased`]
    pub rule_sims: usize,
    /// Plies after which a rollout is abandoned; `max_game_len` if unset
    pub max_plies: Option<usize>,
    /// Stop starting new rollouts after this long
    pub time_limit: Option<Duration>,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        RolloutConfig {
            random_sims: N_SIMS_RANDOM,
            rule_sims: N_SIMS_RULE_BASED,
            max_plies: None,
            time_limit: None,
        }
    }
}

impl RolloutConfig {
    #[inline]
    pub fn sims_for(&self, policy: Policy) -> usize {
        match policy {
            Policy::Random => self.random_sims,
            Policy::RuleBased => self.rule_sims,
        }
    }

    #[inline]
    pub fn ply_limit(&self, size: usize) -> usize {
        self.max_plies.unwrap_or_else(|| max_game_len(size))
    }
}

/// Rollout runner with its own random number generator.
pub struct Simulator {
    config: RolloutConfig,
    rng: fastrand::Rng,
}

impl Simulator {
    pub fn new(config: RolloutConfig) -> Self {
        Simulator {
            config,
            rng: fastrand::Rng::new(),
        }
    }

    /// A simulator whose rollouts are reproducible.
    pub fn with_seed(config: RolloutConfig, seed: u64) -> Self {
        Simulator {
            config,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn config(&self) -> &RolloutConfig {
        &self.config
    }

    pub fn rng(&mut self) -> &mut fastrand::Rng {
        &mut self.rng
    }

    /// Play `mv` for `color` on a copy of `board`, then play on to the end.
    ///
    /// Returns the final result. A rollout in which the side to move has no
    /// legal move, or which runs past the ply limit, ends as
    /// [`GameResult::Ongoing`], which counts as a non-win for everybody.
    /// So does a rollout whose first move lands on an occupied point.
    pub fn simulate(&mut self, board: &Board, mv: Point, color: Color, policy: Policy) -> GameResult {
        let mut cboard = board.copy();
        if !cboard.play_move(mv, color) {
            return GameResult::Ongoing;
        }
        let limit = self.config.ply_limit(cboard.size());

        for _ in 0..limit {
            let result = cboard.end_of_game();
            if result.is_over() {
                return result;
            }
            let to_move = cboard.current_player();
            let next = match policy {
                Policy::Random => self.rng.choice(cboard.legal_moves(to_move)),
                Policy::RuleBased => rule_based(&cboard, to_move).choose(&mut self.rng),
            };
            let Some(pt) = next else {
                return GameResult::Ongoing;
            };
            cboard.play_move(pt, to_move);
        }
        cboard.end_of_game()
    }

    /// Win fraction of every legal candidate, in candidate order.
    ///
    /// Candidates that are not legal for `color` are left out. Once the time
    /// limit passes, remaining rollouts are skipped; a candidate is scored
    /// over the rollouts it actually got (0.0 if none).
    pub fn evaluate(
        &mut self,
        board: &Board,
        candidates: &[Point],
        color: Color,
        policy: Policy,
    ) -> Vec<(Point, f64)> {
        let sims = self.config.sims_for(policy);
        let deadline = self.config.time_limit.map(|limit| Instant::now() + limit);
        let mut expired = false;
        let mut scores = Vec::with_capacity(candidates.len());

        for &mv in candidates {
            if !board.is_legal(mv, color) {
                debug!(mv, %color, "skipping illegal candidate");
                continue;
            }
            let mut wins = 0usize;
            let mut played = 0usize;
            for _ in 0..sims {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    expired = true;
                    break;
                }
                if self.simulate(board, mv, color, policy) == GameResult::Win(color) {
                    wins += 1;
                }
                played += 1;
            }
            let rate = if played > 0 { wins as f64 / played as f64 } else { 0.0 };
            trace!(mv, wins, played, rate, "candidate scored");
            scores.push((mv, rate));
        }

        if expired {
            warn!(candidates = candidates.len(), "rollout time limit reached");
        }
        scores
    }

    /// The candidate with the highest win fraction; ties go to the earliest.
    pub fn best_move(
        &mut self,
        board: &Board,
        candidates: &[Point],
        color: Color,
        policy: Policy,
    ) -> Option<Point> {
        let scores = self.evaluate(board, candidates, color, policy);
        let best = scores
            .into_iter()
            .fold(None, |best: Option<(Point, f64)>, (mv, rate)| match best {
                Some((_, top)) if top >= rate => best,
                _ => Some((mv, rate)),
            });
        if let Some((mv, rate)) = best {
            debug!(mv, rate, %policy, "best rollout move");
        }
        best.map(|(mv, _)| mv)
    }

    /// Score every legal move with uniform-random rollouts.
    pub fn random_simulation(&mut self, board: &Board, color: Color) -> Option<Point> {
        let candidates = board.legal_moves(color);
        self.best_move(board, &candidates, color, Policy::Random)
    }

    /// Score the rule cascade's top-tier moves with rule-guided rollouts.
    pub fn policy_simulation(&mut self, board: &Board, color: Color) -> Option<Point> {
        let candidates = rule_based(board, color).into_moves();
        self.best_move(board, &candidates, color, Policy::RuleBased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, color: Color, stones: &[(usize, usize)]) {
        for &(row, col) in stones {
            let pt = board.pt(row, col);
            assert!(board.play_move(pt, color));
        }
    }

    fn quick() -> RolloutConfig {
        RolloutConfig {
            random_sims: 3,
            rule_sims: 2,
            max_plies: None,
            time_limit: None,
        }
    }

    #[test]
    fn test_rollout_terminates() {
        let board = Board::new(5);
        let mut sim = Simulator::with_seed(quick(), 1);
        for policy in [Policy::Random, Policy::RuleBased] {
            for _ in 0..5 {
                let result = sim.simulate(&board, board.pt(3, 3), Color::Black, policy);
                assert!(result.is_over(), "{policy} rollout ended as {result:?}");
            }
        }
    }

    #[test]
    fn test_rollout_leaves_board_untouched() {
        let board = Board::new(5);
        let mut sim = Simulator::with_seed(quick(), 2);
        sim.simulate(&board, board.pt(2, 2), Color::Black, Policy::Random);
        assert_eq!(board.get_empty_points().len(), 25);
        assert_eq!(board.current_player(), Color::Black);
    }

    #[test]
    fn test_winning_move_scores_one() {
        let mut board = Board::new(7);
        place(&mut board, Color::Black, &[(1, 1), (1, 2), (1, 3), (1, 4)]);
        let win = board.pt(1, 5);
        let mut sim = Simulator::with_seed(quick(), 3);
        let scores = sim.evaluate(&board, &[win], Color::Black, Policy::Random);
        assert_eq!(scores, vec![(win, 1.0)]);
    }

    #[test]
    fn test_policy_simulation_finds_win() {
        let mut board = Board::new(7);
        place(&mut board, Color::White, &[(4, 1), (4, 2), (4, 3), (4, 4)]);
        let mut sim = Simulator::with_seed(quick(), 4);
        assert_eq!(
            sim.policy_simulation(&board, Color::White),
            Some(board.pt(4, 5))
        );
    }

    #[test]
    fn test_ties_go_to_first_candidate() {
        let mut board = Board::new(7);
        place(&mut board, Color::Black, &[(1, 1), (1, 2), (1, 3), (1, 4)]);
        place(&mut board, Color::Black, &[(7, 1), (7, 2), (7, 3), (7, 4)]);
        let (a, b) = (board.pt(7, 5), board.pt(1, 5));
        let mut sim = Simulator::with_seed(quick(), 5);
        assert_eq!(sim.best_move(&board, &[a, b], Color::Black, Policy::Random), Some(a));
        assert_eq!(sim.best_move(&board, &[b, a], Color::Black, Policy::Random), Some(b));
    }

    #[test]
    fn test_illegal_candidates_are_skipped() {
        let mut board = Board::new(5);
        place(&mut board, Color::Black, &[(3, 3)]);
        let (taken, free) = (board.pt(3, 3), board.pt(1, 1));
        let mut sim = Simulator::with_seed(quick(), 8);

        let scores = sim.evaluate(&board, &[taken, free], Color::White, Policy::Random);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].0, free);
        assert_eq!(sim.best_move(&board, &[taken, free], Color::White, Policy::Random), Some(free));
        assert_eq!(sim.best_move(&board, &[taken], Color::White, Policy::Random), None);
        assert_eq!(sim.simulate(&board, taken, Color::White, Policy::Random), GameResult::Ongoing);
    }

    #[test]
    fn test_ply_limit() {
        let board = Board::new(5);
        assert_eq!(quick().ply_limit(5), max_game_len(5));
        let config = RolloutConfig {
            max_plies: Some(0),
            ..quick()
        };
        assert_eq!(config.ply_limit(5), 0);
        let mut sim = Simulator::with_seed(config, 9);
        assert_eq!(sim.config().max_plies, Some(0));
        // Only the candidate itself is played before the cap
        let result = sim.simulate(&board, board.pt(3, 3), Color::Black, Policy::Random);
        assert_eq!(result, GameResult::Ongoing);
    }

    #[test]
    fn test_no_candidates() {
        let board = Board::new(5);
        let mut sim = Simulator::with_seed(quick(), 6);
        assert_eq!(sim.best_move(&board, &[], Color::Black, Policy::Random), None);
    }

    #[test]
    fn test_expired_time_limit_scores_zero() {
        let board = Board::new(5);
        let config = RolloutConfig {
            time_limit: Some(Duration::ZERO),
            ..quick()
        };
        let mut sim = Simulator::with_seed(config, 7);
        let candidates = board.legal_moves(Color::Black);
        let scores = sim.evaluate(&board, &candidates, Color::Black, Policy::Random);
        assert_eq!(scores.len(), candidates.len());
        assert!(scores.iter().all(|&(_, rate)| rate == 0.0));
        // Every candidate scored 0.0, so the first one is chosen
        assert_eq!(
            sim.best_move(&board, &candidates, Color::Black, Policy::Random),
            candidates.first().copied()
        );
    }
}
