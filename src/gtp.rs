//! Go Text Protocol (GTP) front end for Ninuki.
//!
//! GTP is a line-based protocol: each command gets a reply starting with
//! `=` on success or `?` on failure, followed by a blank line. This module
//! implements the GTP version 2 core commands plus the GoGui rules
//! extension, so the engine can be driven by GoGui or a test harness.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `known_command`, `list_commands`, `quit`
//! - `boardsize <size>` - Reset to an empty board of the given size
//! - `clear_board` - Reset the board to empty
//! - `komi <value>` - Accepted and stored; Ninuki has no scoring
//! - `play <color> <vertex>` - Play a move
//! - `genmove <color>` - Generate and play a move for the given color
//! - `legal_moves <color>` - List legal moves
//! - `showboard` - Print the board
//! - `policy <random|rule_based>` - Set the simulation policy
//! - `policy_moves` - Tier label and candidates for the side to move
//! - `gogui-rules_*` - GoGui rules-engine queries
//!
//! ## Example
//!
//! ```ignore
//! use ninuki_rust::gtp::GtpEngine;
//! let mut engine = GtpEngine::new();
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use tracing::debug;

use crate::board::{Board, Cell, Color, GameResult};
use crate::constants::{DEFAULT_SIZE, MAX_SIZE, MIN_SIZE, PASS};
use crate::error::EngineError;
use crate::geometry::Point;
use crate::player::Player;
use crate::policy::Policy;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "gogui-rules_board",
    "gogui-rules_board_size",
    "gogui-rules_captured_count",
    "gogui-rules_final_result",
    "gogui-rules_game_id",
    "gogui-rules_legal_moves",
    "gogui-rules_side_to_move",
    "known_command",
    "komi",
    "legal_moves",
    "list_commands",
    "name",
    "play",
    "policy",
    "policy_moves",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    /// Current game
    board: Board,
    /// Move selector
    player: Player,
    /// Stored for the `komi` command only
    komi: f32,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GtpEngine {
    /// Create a new GTP engine with default settings.
    pub fn new() -> Self {
        Self::with_player(DEFAULT_SIZE, Player::default())
    }

    /// Create a new GTP engine with a given board size and player.
    pub fn with_player(size: usize, player: Player) -> Self {
        Self {
            board: Board::new(size),
            player,
            komi: 6.5,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over arbitrary streams.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("reading GTP command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!(%command, ?args, "gtp command");

            let (prefix, message) = match self.execute(&command, args) {
                Ok(message) => ('=', message),
                Err(err) => ('?', err.to_string()),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn arg<'a>(args: &[&'a str], index: usize) -> Result<&'a str> {
        args.get(index)
            .copied()
            .ok_or_else(|| anyhow!("missing argument"))
    }

    fn format_moves(&self, moves: &[Point]) -> String {
        let geometry = self.board.geometry();
        let mut names: Vec<String> = moves.iter().map(|&m| geometry.format_point(m)).collect();
        names.sort();
        names.join(" ")
    }

    /// Execute a GTP command and return the response text.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<String> {
        match command {
            "name" => Ok("ninuki-rust".to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("2".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let name = Self::arg(args, 0)?.to_lowercase();
                Ok(KNOWN_COMMANDS.contains(&name.as_str()).to_string())
            }

            "quit" => Ok(String::new()),

            "boardsize" => {
                let size: usize = Self::arg(args, 0)?
                    .parse()
                    .map_err(|_| anyhow!("invalid size"))?;
                if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
                    bail!(EngineError::BoardSize {
                        size,
                        min: MIN_SIZE,
                        max: MAX_SIZE,
                    });
                }
                self.board.reset(size);
                Ok(String::new())
            }

            "clear_board" => {
                self.board.reset(self.board.size());
                Ok(String::new())
            }

            "komi" => {
                self.komi = Self::arg(args, 0)?
                    .parse()
                    .map_err(|_| anyhow!("invalid komi"))?;
                Ok(String::new())
            }

            "play" => {
                let color: Color = Self::arg(args, 0)?.parse()?;
                let vertex = Self::arg(args, 1)?;
                let pt = self.board.geometry().parse_coord(vertex)?;
                if self.board.end_of_game().is_over() {
                    bail!(EngineError::IllegalMove {
                        color: color.to_string(),
                        coord: vertex.to_lowercase(),
                        reason: "game over",
                    });
                }
                if pt != PASS && !self.board.is_legal(pt, color) {
                    let reason = if self.board.get_color(pt) != Cell::Empty {
                        "occupied"
                    } else {
                        "ko recapture"
                    };
                    bail!(EngineError::IllegalMove {
                        color: color.to_string(),
                        coord: vertex.to_lowercase(),
                        reason,
                    });
                }
                self.board.play_move(pt, color);
                Ok(String::new())
            }

            "genmove" => {
                let color: Color = Self::arg(args, 0)?.parse()?;
                match self.board.end_of_game() {
                    GameResult::Win(winner) if winner != color => return Ok("resign".to_string()),
                    GameResult::Ongoing => {}
                    _ => return Ok("pass".to_string()),
                }
                let pt = self.player.get_move(&self.board, color);
                if pt != PASS && !self.board.is_legal(pt, color) {
                    bail!("generated illegal move {}", self.board.geometry().format_point(pt));
                }
                self.board.play_move(pt, color);
                Ok(self.board.geometry().format_point(pt).to_lowercase())
            }

            "legal_moves" => {
                let color: Color = Self::arg(args, 0)?.parse()?;
                Ok(self.format_moves(&self.board.legal_moves(color)))
            }

            "showboard" => Ok(format!("\n{}", self.board)),

            "policy" => {
                let policy: Policy = Self::arg(args, 0)?.parse()?;
                self.player.set_policy(policy);
                Ok(String::new())
            }

            "policy_moves" => {
                if self.board.end_of_game().is_over() {
                    return Ok(String::new());
                }
                let tactic = self
                    .player
                    .policy_moves(&self.board, self.board.current_player());
                Ok(format!("{} {}", tactic.label(), self.format_moves(tactic.moves())))
            }

            "gogui-rules_game_id" => Ok("Ninuki".to_string()),

            "gogui-rules_board_size" => Ok(self.board.size().to_string()),

            "gogui-rules_side_to_move" => Ok(self.board.current_player().to_string()),

            "gogui-rules_legal_moves" => {
                if self.board.end_of_game().is_over() {
                    return Ok(String::new());
                }
                let moves = self.board.legal_moves(self.board.current_player());
                Ok(self.format_moves(&moves))
            }

            "gogui-rules_board" => {
                let size = self.board.size();
                let rows: Vec<String> = (1..=size)
                    .rev()
                    .map(|row| {
                        (1..=size)
                            .map(|col| match self.board.get_color(self.board.pt(row, col)) {
                                Cell::Black => "X",
                                Cell::White => "O",
                                _ => ".",
                            })
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect();
                Ok(format!("\n{}", rows.join("\n")))
            }

            "gogui-rules_final_result" => Ok(match self.board.end_of_game() {
                GameResult::Ongoing => "unknown".to_string(),
                GameResult::Draw(_) => "draw".to_string(),
                GameResult::Win(color) => color.to_string(),
            }),

            "gogui-rules_captured_count" => Ok(format!(
                "{} {}",
                self.board.get_captures(Color::White),
                self.board.get_captures(Color::Black)
            )),

            _ => bail!("unknown command: {command}"),
        }
    }
}
