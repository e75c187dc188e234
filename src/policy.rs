//! Rule-priority move cascade and move-policy names.
//!
//! The cascade asks the tactical queries in a fixed order and stops at the
//! first one that has any answer:
//!
//! 1. win now
//! 2. block the opponent's win
//! 3. make an open four
//! 4. block the opponent's open four
//! 5. capture a pair
//! 6. save a pair from capture
//! 7. otherwise, any legal move

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Color};
use crate::constants::PASS;
use crate::error::EngineError;
use crate::geometry::Point;

/// How the move selector scores non-tactical positions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Policy {
    /// Uniform-random rollouts
    #[default]
    Random,
    /// Rollouts that follow the rule cascade at every ply
    RuleBased,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Random => write!(f, "random"),
            Policy::RuleBased => write!(f, "rule_based"),
        }
    }
}

impl FromStr for Policy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Policy::Random),
            "rule_based" => Ok(Policy::RuleBased),
            _ => Err(EngineError::UnknownPolicy(s.to_string())),
        }
    }
}

/// The cascade tier that fired, with its candidate moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tactic {
    Win(Vec<Point>),
    BlockWin(Vec<Point>),
    OpenFour(Vec<Point>),
    OppOpenFour(Vec<Point>),
    Capture(Vec<Point>),
    Protect(Vec<Point>),
    /// No tactical reason; every legal move
    Random(Vec<Point>),
}

impl Tactic {
    /// Name of the tier, as reported by the `policy_moves` command.
    pub fn label(&self) -> &'static str {
        match self {
            Tactic::Win(_) => "Win",
            Tactic::BlockWin(_) => "BlockWin",
            Tactic::OpenFour(_) => "OpenFour",
            Tactic::OppOpenFour(_) => "OppOpenFour",
            Tactic::Capture(_) => "Capture",
            Tactic::Protect(_) => "Protect",
            Tactic::Random(_) => "Random",
        }
    }

    pub fn moves(&self) -> &[Point] {
        match self {
            Tactic::Win(m)
            | Tactic::BlockWin(m)
            | Tactic::OpenFour(m)
            | Tactic::OppOpenFour(m)
            | Tactic::Capture(m)
            | Tactic::Protect(m)
            | Tactic::Random(m) => m,
        }
    }

    pub fn into_moves(self) -> Vec<Point> {
        match self {
            Tactic::Win(m)
            | Tactic::BlockWin(m)
            | Tactic::OpenFour(m)
            | Tactic::OppOpenFour(m)
            | Tactic::Capture(m)
            | Tactic::Protect(m)
            | Tactic::Random(m) => m,
        }
    }

    /// Whether a tactical tier fired (anything but `Random`).
    #[inline]
    pub fn is_decisive(&self) -> bool {
        !matches!(self, Tactic::Random(_))
    }

    /// A uniformly random candidate, or `None` if there are none.
    pub fn choose(&self, rng: &mut fastrand::Rng) -> Option<Point> {
        rng.choice(self.moves()).copied()
    }
}

/// Run the rule cascade for `color`.
///
/// A tier only fires with moves that are legal for `color`, so a target on
/// the ko recapture point is dropped.
pub fn rule_based(board: &Board, color: Color) -> Tactic {
    let opp = color.opponent();
    let legal = |moves: Vec<Point>| -> Vec<Point> {
        moves
            .into_iter()
            .filter(|&pt| board.is_legal(pt, color))
            .collect()
    };

    let moves = legal(board.win_search(color));
    if !moves.is_empty() {
        return Tactic::Win(moves);
    }
    let moves = legal(board.block_win(color));
    if !moves.is_empty() {
        return Tactic::BlockWin(moves);
    }
    let moves = legal(board.open_four(color));
    if !moves.is_empty() {
        return Tactic::OpenFour(moves);
    }
    let moves = legal(board.open_four(opp));
    if !moves.is_empty() {
        return Tactic::OppOpenFour(moves);
    }
    let moves = legal(board.capture(color));
    if !moves.is_empty() {
        return Tactic::Capture(moves);
    }
    let moves = legal(board.protect(color));
    if !moves.is_empty() {
        return Tactic::Protect(moves);
    }
    Tactic::Random(board.legal_moves(color))
}

/// Candidate moves under `policy`, falling back to a pass when nothing is
/// legal.
pub fn generate_policy_moves(board: &Board, color: Color, policy: Policy) -> Tactic {
    let tactic = match policy {
        Policy::RuleBased => rule_based(board, color),
        Policy::Random => Tactic::Random(board.legal_moves(color)),
    };
    if tactic.moves().is_empty() {
        return Tactic::Random(vec![PASS]);
    }
    tactic
}
