//! Constants for board limits, move sentinels, and engine parameters.
//!
//! The board uses a 1D array representation with one cell of padding on
//! every side, so that every neighbor of a playable point is a valid index.
//! Unlike a fixed-size Go board the side length is chosen at runtime through
//! [`Board::reset`](crate::board::Board::reset), so everything here that
//! depends on the size is a function rather than a constant.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported board side.
pub const MIN_SIZE: usize = 2;

/// Largest supported board side (one column letter per column, skipping `I`).
pub const MAX_SIZE: usize = 25;

/// Board side used when no size has been requested.
pub const DEFAULT_SIZE: usize = 7;

/// Lines shorter than this cannot hold any pattern and are not scanned.
pub const MIN_LINE_LEN: usize = 4;

/// Number of consecutive stones that wins the game.
pub const WIN_LENGTH: usize = 5;

/// Width of a padded row (playable columns plus one border column).
#[inline]
pub const fn row_stride(size: usize) -> usize {
    size + 1
}

/// Total length of the padded board array for a given side.
///
/// Covers the border row above, `size` padded rows, and the border row
/// below plus one trailing cell for the last diagonal neighbor.
#[inline]
pub const fn board_array_size(size: usize) -> usize {
    size * size + 3 * (size + 1)
}

/// Maximum plies in a rollout before it is abandoned as undecided.
#[inline]
pub const fn max_game_len(size: usize) -> usize {
    size * size * 3
}

// =============================================================================
// Special Move Values
// =============================================================================

/// Pass move marker (index 0 is padding, so never a playable point).
pub const PASS: usize = 0;

/// "No move yet" marker, used for the history before the first move.
pub const NO_POINT: usize = usize::MAX;

// =============================================================================
// Capture Rules
// =============================================================================

/// Stones removed by a single capture.
pub const CAPTURE_SIZE: u32 = 2;

/// Captured stones needed to win.
pub const CAPTURE_WIN: u32 = 10;

/// Captured stones at which one more capture decides the game.
pub const CAPTURE_THREAT: u32 = CAPTURE_WIN - CAPTURE_SIZE;

// =============================================================================
// Move Selection Parameters
// =============================================================================

/// Simulations per candidate for the uniform-random rollout policy.
pub const N_SIMS_RANDOM: usize = 10;

/// Simulations per candidate for the rule-guided rollout policy.
pub const N_SIMS_RULE_BASED: usize = 20;

/// Stones placed before the selector stops using the opening set.
pub const OPENING_PLIES: usize = 8;

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// Offsets to neighboring points for a board of the given side.
/// Order: East, West, South, North, SE, NW, SW, NE
#[inline]
pub fn directions(size: usize) -> [isize; 8] {
    let ns = row_stride(size) as isize;
    [1, -1, ns, -ns, ns + 1, -(ns + 1), ns - 1, -ns + 1]
}
