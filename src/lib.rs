//! Ninuki-Rust: a Monte Carlo engine for Ninuki.
//!
//! Ninuki is five-in-a-row with pair captures. Players alternate placing
//! stones on an n×n grid; two enemy stones bracketed by the mover's stones
//! are removed, and the game is won by five in a line or by ten captured
//! stones.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and engine parameters
//! - [`geometry`] - Point indexing, lines and coordinates
//! - [`board`] - Game state, captures and end-of-game detection
//! - [`patterns`] - Line patterns and KMP matching
//! - [`tactics`] - Win, block, open-four, capture and protect queries
//! - [`policy`] - Rule cascade and policy names
//! - [`playout`] - Rollouts and win-rate scoring
//! - [`player`] - Top-level move selection
//! - [`gtp`] - Go Text Protocol front end
//! - [`error`] - Errors for caller input
//!
//! ## Example
//!
//! ```
//! use ninuki_rust::board::{Board, Color, GameResult};
//! use ninuki_rust::player::Player;
//!
//! let mut board = Board::new(7);
//! for col in 1..=4 {
//!     board.play_move(board.pt(1, col), Color::Black);
//! }
//!
//! let mut player = Player::default();
//! let mv = player.get_move(&board, Color::Black);
//! assert_eq!(mv, board.pt(1, 5));
//!
//! board.play_move(mv, Color::Black);
//! assert_eq!(board.end_of_game(), GameResult::Win(Color::Black));
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod gtp;
pub mod patterns;
pub mod player;
pub mod playout;
pub mod policy;
pub mod tactics;
