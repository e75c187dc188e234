//! Line pattern matching for tactical move generation.
//!
//! Every tactical query (immediate win, capture, open four, protection) is
//! phrased as "find this short color sequence somewhere on a row, column or
//! diagonal, and report the point in one particular slot of it".
//!
//! ## Pattern table
//! Shapes are written once as templates, like the 3x3 shapes of a Go
//! engine's pattern table:
//! - `X`: the player the query is for
//! - `O`: the opponent
//! - `.`: empty
//!
//! and instantiated for both colors on first use. Each pattern knows its
//! target slot: the single `.` for win/capture/protect shapes, or a fixed
//! slot for open-four shapes (which contain several empty cells).
//!
//! ## Search
//! Each line is turned into its color sequence and searched with
//! Knuth-Morris-Pratt, so a line of length `n` costs `O(n + m)` per pattern.

use std::sync::OnceLock;

use crate::board::{Board, Cell, Color};
use crate::geometry::Point;

/// The tactical pattern families.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternFamily {
    /// Four stones and one gap in a five-cell window
    Win,
    /// An enemy pair bracketed on one side, empty on the other
    Capture,
    /// Three stones inside six cells that become an open four
    OpenFour,
    /// One of our own pairs that the opponent threatens to capture
    Protect,
}

impl PatternFamily {
    const ALL: [PatternFamily; 4] = [
        PatternFamily::Win,
        PatternFamily::Capture,
        PatternFamily::OpenFour,
        PatternFamily::Protect,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            PatternFamily::Win => 0,
            PatternFamily::Capture => 1,
            PatternFamily::OpenFour => 2,
            PatternFamily::Protect => 3,
        }
    }

    fn sources(self) -> &'static [(&'static str, Option<usize>)] {
        match self {
            PatternFamily::Win => WIN_SRC,
            PatternFamily::Capture => CAPTURE_SRC,
            PatternFamily::OpenFour => OPEN_FOUR_SRC,
            PatternFamily::Protect => PROTECT_SRC,
        }
    }
}

/// Shape templates with an explicit target slot where the shape has more
/// than one empty cell (`None` means "the only `.`").
const WIN_SRC: &[(&str, Option<usize>)] = &[
    ("XXXX.", None),
    ("XXX.X", None),
    ("XX.XX", None),
    ("X.XXX", None),
    (".XXXX", None),
];

const CAPTURE_SRC: &[(&str, Option<usize>)] = &[("XOO.", None), (".OOX", None)];

const OPEN_FOUR_SRC: &[(&str, Option<usize>)] = &[
    (".XXX..", Some(4)),
    (".XX.X.", Some(3)),
    (".X.XX.", Some(2)),
    ("..XXX.", Some(1)),
];

const PROTECT_SRC: &[(&str, Option<usize>)] = &[(".XXO", None), ("OXX.", None)];

/// A fixed color sequence and the slot the query reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub cells: Vec<Cell>,
    pub target: usize,
    /// KMP failure table for `cells`
    prefix: Vec<usize>,
}

impl Pattern {
    fn from_template(shape: &str, target: Option<usize>, color: Color) -> Self {
        let own = Cell::from(color);
        let opp = Cell::from(color.opponent());
        let cells: Vec<Cell> = shape
            .bytes()
            .map(|b| match b {
                b'X' => own,
                b'O' => opp,
                b'.' => Cell::Empty,
                _ => unreachable!("bad pattern template {shape}"),
            })
            .collect();
        let target = target.unwrap_or_else(|| {
            cells
                .iter()
                .position(|&c| c == Cell::Empty)
                .expect("pattern template without an empty slot")
        });
        let prefix = prefix_function(&cells);
        Pattern { cells, target, prefix }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Start offsets of every occurrence of this pattern in `text`.
    pub fn find_all(&self, text: &[Cell]) -> Vec<usize> {
        kmp_search(&self.cells, &self.prefix, text)
    }
}

/// Patterns for every (family, color) pair.
struct PatternTable {
    black: [Vec<Pattern>; 4],
    white: [Vec<Pattern>; 4],
}

static PATTERNS: OnceLock<PatternTable> = OnceLock::new();

fn make_pattern_table() -> PatternTable {
    let build = |color: Color| -> [Vec<Pattern>; 4] {
        PatternFamily::ALL.map(|family| {
            family
                .sources()
                .iter()
                .map(|&(shape, target)| Pattern::from_template(shape, target, color))
                .collect::<Vec<_>>()
        })
    };
    PatternTable {
        black: build(Color::Black),
        white: build(Color::White),
    }
}

/// The patterns of `family` as seen by `color`.
pub fn patterns(family: PatternFamily, color: Color) -> &'static [Pattern] {
    let table = PATTERNS.get_or_init(make_pattern_table);
    match color {
        Color::Black => &table.black[family.index()],
        Color::White => &table.white[family.index()],
    }
}

/// KMP prefix function: `pi[i]` is the length of the longest proper prefix
/// of `pattern[..=i]` that is also a suffix of it.
pub fn prefix_function(pattern: &[Cell]) -> Vec<usize> {
    let mut pi = vec![0; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = pi[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        pi[i] = k;
    }
    pi
}

/// Start offsets of every (possibly overlapping) occurrence of `pattern`
/// in `text`, given the pattern's prefix function.
pub fn kmp_search(pattern: &[Cell], prefix: &[usize], text: &[Cell]) -> Vec<usize> {
    let m = pattern.len();
    let mut found = Vec::new();
    if m == 0 || m > text.len() {
        return found;
    }
    let mut j = 0;
    for (i, &c) in text.iter().enumerate() {
        while j > 0 && c != pattern[j] {
            j = prefix[j - 1];
        }
        if c == pattern[j] {
            j += 1;
        }
        if j == m {
            found.push(i + 1 - m);
            j = prefix[j - 1];
        }
    }
    found
}

/// One occurrence of a pattern on a line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// Index into [`Board::lines`]
    pub line: usize,
    /// Index into the searched pattern list
    pub pattern: usize,
    /// Offset of the first pattern cell along the line
    pub start: usize,
}

/// Search every line for every pattern.
///
/// Results are ordered by line (rows, then columns, then diagonals), then
/// by pattern, then by offset.
pub fn search_patterns(patterns: &[Pattern], texts: &[Vec<Cell>]) -> Vec<Match> {
    let mut results = Vec::new();
    for (line, text) in texts.iter().enumerate() {
        for (index, pattern) in patterns.iter().enumerate() {
            for start in pattern.find_all(text) {
                results.push(Match {
                    line,
                    pattern: index,
                    start,
                });
            }
        }
    }
    results
}

/// The color sequence of every line of the board.
pub fn line_texts(board: &Board) -> Vec<Vec<Cell>> {
    board
        .lines()
        .iter()
        .map(|line| board.line_colors(line))
        .collect()
}

/// Board points in the target slot of every match of `family` for `color`,
/// without duplicates, in match order.
pub fn find_targets(board: &Board, family: PatternFamily, color: Color) -> Vec<Point> {
    let patterns = patterns(family, color);
    let texts = line_texts(board);
    let mut targets = Vec::new();
    for m in search_patterns(patterns, &texts) {
        let slot = m.start + patterns[m.pattern].target;
        let point = board.lines()[m.line].points[slot];
        if !targets.contains(&point) {
            targets.push(point);
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    const B: Cell = Cell::Black;
    const W: Cell = Cell::White;
    const E: Cell = Cell::Empty;

    #[test]
    fn test_prefix_function() {
        assert_eq!(prefix_function(&[B, B, B, B, E]), vec![0, 1, 2, 3, 0]);
        assert_eq!(prefix_function(&[E, B, B, E, B, E]), vec![0, 0, 0, 1, 2, 1]);
        assert_eq!(prefix_function(&[]), Vec::<usize>::new());
    }

    #[test]
    fn test_kmp_finds_all_occurrences() {
        let pattern = [B, W, W, E];
        let prefix = prefix_function(&pattern);
        let text = [B, W, W, E, B, W, W, E, E];
        assert_eq!(kmp_search(&pattern, &prefix, &text), vec![0, 4]);

        let pattern = [B, B];
        let prefix = prefix_function(&pattern);
        assert_eq!(kmp_search(&pattern, &prefix, &[B, B, B]), vec![0, 1]);
        assert!(kmp_search(&pattern, &prefix, &[B]).is_empty());
    }

    #[test]
    fn test_kmp_after_partial_match() {
        // The failure table must let the search restart inside "XXX"
        let pattern = [B, B, B, B, E];
        let prefix = prefix_function(&pattern);
        let text = [B, B, B, E, B, B, B, B, B, E];
        assert_eq!(kmp_search(&pattern, &prefix, &text), vec![5]);
    }

    #[test]
    fn test_table_shapes() {
        for color in [Color::Black, Color::White] {
            for family in PatternFamily::ALL {
                for p in patterns(family, color) {
                    assert_eq!(p.cells[p.target], Cell::Empty);
                    let empties = p.cells.iter().filter(|&&c| c == E).count();
                    if family != PatternFamily::OpenFour {
                        assert_eq!(empties, 1, "{family:?} {:?}", p.cells);
                    }
                }
            }
        }
        assert_eq!(patterns(PatternFamily::Win, Color::Black).len(), 5);
        assert_eq!(patterns(PatternFamily::Capture, Color::White)[0].cells, vec![W, B, B, E]);
        assert_eq!(patterns(PatternFamily::Protect, Color::Black)[0].cells, vec![E, B, B, W]);
        let targets: Vec<usize> = patterns(PatternFamily::OpenFour, Color::White)
            .iter()
            .map(|p| p.target)
            .collect();
        assert_eq!(targets, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_search_order_is_line_major() {
        let pats = patterns(PatternFamily::Capture, Color::Black);
        let texts = vec![vec![E, W, W, B], vec![B, W, W, E, W, W, B]];
        let found = search_patterns(pats, &texts);
        assert_eq!(
            found,
            vec![
                Match { line: 0, pattern: 1, start: 0 },
                Match { line: 1, pattern: 0, start: 0 },
                Match { line: 1, pattern: 1, start: 3 },
            ]
        );
    }

    #[test]
    fn test_find_targets_dedupes() {
        let mut board = Board::new(7);
        // B W W . W W B: the middle point captures both pairs
        board.play_move(board.pt(1, 1), Color::Black);
        board.play_move(board.pt(1, 2), Color::White);
        board.play_move(board.pt(1, 3), Color::White);
        board.play_move(board.pt(1, 5), Color::White);
        board.play_move(board.pt(1, 6), Color::White);
        board.play_move(board.pt(1, 7), Color::Black);
        let targets = find_targets(&board, PatternFamily::Capture, Color::Black);
        assert_eq!(targets, vec![board.pt(1, 4)]);
    }
}
