//! Ninuki board state and move execution.
//!
//! This module provides the core game logic, including:
//! - Board state as a padded 1D array of [`Cell`]s
//! - Stone placement and pair captures
//! - Five-in-a-row detection
//! - End-of-game detection
//!
//! Unlike Go, stones are never removed for lack of liberties. A move that
//! brackets exactly two enemy stones between the new stone and another
//! friendly stone, in any of the eight directions, removes that pair and
//! credits the mover with two captures.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::constants::{CAPTURE_SIZE, CAPTURE_WIN, NO_POINT, PASS, WIN_LENGTH, directions};
use crate::error::EngineError;
use crate::geometry::{Geometry, Line, Point};

/// A player color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

impl FromStr for Color {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(EngineError::InvalidColor(s.to_string())),
        }
    }
}

/// Contents of one entry of the board array.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    Empty,
    Black,
    White,
    /// Padding around the playable grid; never played on or scanned.
    Border,
}

impl Cell {
    /// The stone color, if this cell holds a stone.
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
            Cell::Empty | Cell::Border => None,
        }
    }
}

impl From<Color> for Cell {
    #[inline]
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

/// Why a finished game has no winner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawReason {
    /// Both players passed in succession
    DoublePass,
    /// No empty point is left
    BoardFull,
}

/// State of the game as seen by [`Board::end_of_game`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    Draw(DrawReason),
    Win(Color),
}

impl GameResult {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameResult::Ongoing
    }

    #[inline]
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::Win(color) => Some(color),
            GameResult::Ongoing | GameResult::Draw(_) => None,
        }
    }
}

/// A Ninuki board.
///
/// Cloning (or [`Board::copy`]) yields an independent board: cells,
/// counters and history are owned per board, only the immutable
/// [`Geometry`] is shared.
#[derive(Clone, Debug)]
pub struct Board {
    geometry: Arc<Geometry>,
    cells: Vec<Cell>,
    /// Point forbidden for immediate recapture (`NO_POINT` if none)
    ko_recapture: Point,
    last_move: Point,
    last2_move: Point,
    current_player: Color,
    black_captures: u32,
    white_captures: u32,
}

impl Board {
    /// Create an empty board of side `size`.
    ///
    /// # Panics
    /// If `size` is outside `MIN_SIZE..=MAX_SIZE`.
    pub fn new(size: usize) -> Self {
        let geometry = Arc::new(Geometry::new(size));
        let cells = Self::empty_cells(&geometry);
        Board {
            geometry,
            cells,
            ko_recapture: NO_POINT,
            last_move: NO_POINT,
            last2_move: NO_POINT,
            current_player: Color::Black,
            black_captures: 0,
            white_captures: 0,
        }
    }

    /// Reset to an empty board of side `size`, recomputing the lines.
    ///
    /// # Panics
    /// If `size` is outside `MIN_SIZE..=MAX_SIZE`.
    pub fn reset(&mut self, size: usize) {
        *self = Board::new(size);
    }

    fn empty_cells(geometry: &Geometry) -> Vec<Cell> {
        let mut cells = vec![Cell::Border; geometry.maxpoint()];
        for pt in geometry.points() {
            cells[pt] = Cell::Empty;
        }
        cells
    }

    /// Independent duplicate for speculative play.
    #[inline]
    pub fn copy(&self) -> Board {
        self.clone()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.geometry.size()
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn lines(&self) -> &[Line] {
        self.geometry.lines()
    }

    /// Point for a 1-based `(row, col)`.
    #[inline]
    pub fn pt(&self, row: usize, col: usize) -> Point {
        self.geometry.pt(row, col)
    }

    #[inline]
    pub fn get_color(&self, point: Point) -> Cell {
        self.cells[point]
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[inline]
    pub fn last_move(&self) -> Point {
        self.last_move
    }

    #[inline]
    pub fn last2_move(&self) -> Point {
        self.last2_move
    }

    #[inline]
    pub fn ko_recapture(&self) -> Point {
        self.ko_recapture
    }

    /// Forbid (or with `NO_POINT`, allow again) an immediate recapture point.
    pub fn set_ko_recapture(&mut self, point: Point) {
        self.ko_recapture = point;
    }

    /// Stones captured so far by `color`.
    #[inline]
    pub fn get_captures(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black_captures,
            Color::White => self.white_captures,
        }
    }

    fn add_captures(&mut self, color: Color) {
        match color {
            Color::Black => self.black_captures += CAPTURE_SIZE,
            Color::White => self.white_captures += CAPTURE_SIZE,
        }
    }

    /// The 4 orthogonal neighbors (W, E, N, S) of a point.
    #[inline]
    pub fn neighbors(&self, point: Point) -> [Point; 4] {
        let ns = self.geometry.ns();
        [point - 1, point + 1, point - ns, point + ns]
    }

    /// The 4 diagonal neighbors (NW, NE, SW, SE) of a point.
    #[inline]
    pub fn diagonal_neighbors(&self, point: Point) -> [Point; 4] {
        let ns = self.geometry.ns();
        [point - ns - 1, point - ns + 1, point + ns - 1, point + ns + 1]
    }

    /// Empty points in ascending order.
    pub fn get_empty_points(&self) -> Vec<Point> {
        self.geometry
            .points()
            .filter(|&pt| self.cells[pt] == Cell::Empty)
            .collect()
    }

    /// Number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.geometry
            .points()
            .filter(|&pt| self.cells[pt] != Cell::Empty)
            .count()
    }

    /// The last two moves that were actual board points (most recent first).
    pub fn last_board_moves(&self) -> Vec<Point> {
        [self.last_move, self.last2_move]
            .into_iter()
            .filter(|&m| m != NO_POINT && m != PASS)
            .collect()
    }

    /// Check whether it is legal for `color` to play on `point`.
    ///
    /// Occupied points and the ko recapture point are rejected outright;
    /// everything else is decided by trying the move on a copy.
    ///
    /// # Panics
    /// If `point` is neither `PASS` nor a playable point.
    pub fn is_legal(&self, point: Point, color: Color) -> bool {
        if point == PASS {
            return true;
        }
        assert!(
            self.geometry.is_on_board(point),
            "point {point} is not on the board"
        );
        if self.cells[point] != Cell::Empty || point == self.ko_recapture {
            return false;
        }
        self.copy().play_move(point, color)
    }

    /// Every point `color` may legally play, in ascending order.
    pub fn legal_moves(&self, color: Color) -> Vec<Point> {
        self.geometry
            .points()
            .filter(|&pt| self.is_legal(pt, color))
            .collect()
    }

    /// Record a pass for the current player.
    pub fn pass_move(&mut self) {
        self.last2_move = self.last_move;
        self.last_move = PASS;
        self.current_player = self.current_player.opponent();
    }

    /// Play `color` at `point`, removing any bracketed pairs.
    ///
    /// Returns `false` (leaving the board unchanged) if the point is
    /// occupied. `PASS` is accepted and recorded as a pass.
    ///
    /// # Panics
    /// If `point` is neither `PASS` nor a playable point.
    pub fn play_move(&mut self, point: Point, color: Color) -> bool {
        if point == PASS {
            self.current_player = color;
            self.pass_move();
            return true;
        }
        assert!(
            self.geometry.is_on_board(point),
            "point {point} is not on the board"
        );
        if self.cells[point] != Cell::Empty {
            return false;
        }

        let own = Cell::from(color);
        let opp = Cell::from(color.opponent());
        self.cells[point] = own;
        self.current_player = color.opponent();
        self.last2_move = self.last_move;
        self.last_move = point;

        for d in directions(self.size()) {
            let at = |k: isize| (point as isize + k * d) as usize;
            // Each step is only taken once the previous cell is a stone,
            // so the padding keeps every index in range.
            if self.cells[at(1)] == opp && self.cells[at(2)] == opp && self.cells[at(3)] == own {
                self.cells[at(1)] = Cell::Empty;
                self.cells[at(2)] = Cell::Empty;
                self.add_captures(color);
            }
        }
        true
    }

    /// Check whether the game is over.
    ///
    /// A five in a row is won by the color that owns it; a capture total of
    /// `CAPTURE_WIN` by the color that reached it.
    pub fn end_of_game(&self) -> GameResult {
        if self.last_move == PASS && self.last2_move == PASS {
            return GameResult::Draw(DrawReason::DoublePass);
        }
        if let Some(color) = self.detect_five_in_a_row() {
            return GameResult::Win(color);
        }
        if let Some(color) = [Color::Black, Color::White]
            .into_iter()
            .find(|&c| self.get_captures(c) >= CAPTURE_WIN)
        {
            return GameResult::Win(color);
        }
        if self.geometry.points().all(|pt| self.cells[pt] != Cell::Empty) {
            return GameResult::Draw(DrawReason::BoardFull);
        }
        GameResult::Ongoing
    }

    /// The color with five consecutive stones on any line, if any.
    pub fn detect_five_in_a_row(&self) -> Option<Color> {
        self.lines()
            .iter()
            .find_map(|line| self.five_in_line(&line.points))
    }

    fn five_in_line(&self, points: &[Point]) -> Option<Color> {
        let mut prev = Cell::Border;
        let mut counter = 0;
        for &pt in points {
            let c = self.cells[pt];
            if c == prev {
                counter += 1;
            } else {
                counter = 1;
                prev = c;
            }
            if counter == WIN_LENGTH && prev != Cell::Empty {
                return prev.color();
            }
        }
        None
    }

    /// Colors along a line, in line order.
    pub fn line_colors(&self, line: &Line) -> Vec<Cell> {
        line.points.iter().map(|&pt| self.cells[pt]).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        write!(f, "  ")?;
        for col in 1..=size {
            let mut c = (b'A' + col as u8 - 1) as char;
            if c >= 'I' {
                c = (c as u8 + 1) as char;
            }
            write!(f, " {c}")?;
        }
        writeln!(f)?;
        for row in (1..=size).rev() {
            write!(f, "{row:2}")?;
            for col in 1..=size {
                let ch = match self.cells[self.pt(row, col)] {
                    Cell::Black => 'X',
                    Cell::White => 'O',
                    Cell::Empty => '.',
                    Cell::Border => ' ',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
