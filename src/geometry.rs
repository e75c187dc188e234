//! Board geometry: the padded 1D index space and the scanning lines.
//!
//! A board of side `n` is stored in a flat array where point `(row, col)`
//! (both 1-based) lives at `row * (n + 1) + col`. Column 0 of every row and
//! the rows above and below the grid are border cells, so stepping one cell
//! in any of the eight directions from a playable point always stays inside
//! the array.
//!
//! The geometry also owns the list of every row, column and diagonal that
//! pattern search scans. It is computed once per board size and shared by
//! every copy of a board of that size.

use crate::constants::{MAX_SIZE, MIN_LINE_LEN, MIN_SIZE, NO_POINT, PASS, board_array_size, row_stride};
use crate::error::{EngineError, EngineResult};

/// A point on the board, represented as an index into the padded 1D array.
pub type Point = usize;

/// Which family a scanning line belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    Row,
    Column,
    /// Runs toward increasing row and column.
    DiagonalSE,
    /// Runs toward decreasing row and increasing column.
    DiagonalNE,
}

/// An ordered run of board points scanned as one sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub points: Vec<Point>,
}

impl Line {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Coordinate mapping and precomputed lines for one board size.
#[derive(Clone, Debug)]
pub struct Geometry {
    size: usize,
    ns: usize,
    maxpoint: usize,
    lines: Vec<Line>,
}

impl Geometry {
    /// Build the geometry for a board of side `size`.
    ///
    /// # Panics
    /// If `size` is outside `MIN_SIZE..=MAX_SIZE`.
    pub fn new(size: usize) -> Self {
        assert!(
            (MIN_SIZE..=MAX_SIZE).contains(&size),
            "board size {size} out of range {MIN_SIZE}..={MAX_SIZE}"
        );
        let mut geometry = Geometry {
            size,
            ns: row_stride(size),
            maxpoint: board_array_size(size),
            lines: Vec::new(),
        };
        geometry.lines = geometry.compute_lines();
        geometry
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset between vertically adjacent points.
    #[inline]
    pub fn ns(&self) -> usize {
        self.ns
    }

    /// Length of the padded board array.
    #[inline]
    pub fn maxpoint(&self) -> usize {
        self.maxpoint
    }

    /// Every scanning line: rows, then columns, then diagonals.
    #[inline]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Point for a 1-based `(row, col)`.
    ///
    /// # Panics
    /// If `(row, col)` is not on the grid.
    #[inline]
    pub fn pt(&self, row: usize, col: usize) -> Point {
        assert!(
            self.on_grid(row, col),
            "({row}, {col}) is not on a {0}x{0} board",
            self.size
        );
        row * self.ns + col
    }

    /// 1-based `(row, col)` of a playable point.
    #[inline]
    pub fn coord(&self, point: Point) -> (usize, usize) {
        (point / self.ns, point % self.ns)
    }

    /// First point of a 1-based row.
    #[inline]
    pub fn row_start(&self, row: usize) -> Point {
        assert!((1..=self.size).contains(&row));
        row * self.ns + 1
    }

    #[inline]
    fn on_grid(&self, row: usize, col: usize) -> bool {
        (1..=self.size).contains(&row) && (1..=self.size).contains(&col)
    }

    /// Whether `point` is one of the `size * size` playable points.
    pub fn is_on_board(&self, point: Point) -> bool {
        if point >= self.maxpoint {
            return false;
        }
        let (row, col) = self.coord(point);
        self.on_grid(row, col)
    }

    /// All playable points in ascending order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (1..=self.size).flat_map(move |row| (1..=self.size).map(move |col| row * self.ns + col))
    }

    /// The centre point (rounded toward the top-left on even sides).
    pub fn center(&self) -> Point {
        let mid = self.size.div_ceil(2);
        self.pt(mid, mid)
    }

    fn compute_lines(&self) -> Vec<Line> {
        let n = self.size;
        let mut lines = Vec::new();

        for row in 1..=n {
            let points = (1..=n).map(|col| self.pt(row, col)).collect();
            lines.push(Line { kind: LineKind::Row, points });
        }
        for col in 1..=n {
            let points = (1..=n).map(|row| self.pt(row, col)).collect();
            lines.push(Line { kind: LineKind::Column, points });
        }

        // SE diagonals starting on the first row
        for col in 1..=n {
            self.push_diagonal(&mut lines, LineKind::DiagonalSE, 1, col);
        }
        // SE and NE diagonals starting on the first column below the first row
        for row in 2..=n {
            self.push_diagonal(&mut lines, LineKind::DiagonalSE, row, 1);
            self.push_diagonal(&mut lines, LineKind::DiagonalNE, row, 1);
        }
        // NE diagonals starting on the last row, right of the first column
        for col in 2..=n {
            self.push_diagonal(&mut lines, LineKind::DiagonalNE, n, col);
        }

        lines
    }

    fn push_diagonal(&self, lines: &mut Vec<Line>, kind: LineKind, row: usize, col: usize) {
        let mut points = Vec::new();
        let (mut r, mut c) = (row, col);
        while self.on_grid(r, c) {
            points.push(self.pt(r, c));
            c += 1;
            match kind {
                LineKind::DiagonalSE => r += 1,
                LineKind::DiagonalNE => r -= 1,
                LineKind::Row | LineKind::Column => unreachable!("not a diagonal"),
            }
        }
        if points.len() >= MIN_LINE_LEN {
            lines.push(Line { kind, points });
        }
    }

    /// Parse a coordinate such as `"C4"` or `"pass"`.
    ///
    /// Columns are letters `A`.. skipping `I`; rows are 1-based numbers.
    pub fn parse_coord(&self, s: &str) -> EngineResult<Point> {
        if s.eq_ignore_ascii_case("pass") {
            return Ok(PASS);
        }
        let invalid = || EngineError::InvalidCoord(s.to_string());

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() || letter == 'I' {
            return Err(invalid());
        }
        let mut col = (letter as u8 - b'A' + 1) as usize;
        if letter > 'I' {
            col -= 1;
        }
        let row: usize = chars.as_str().parse().map_err(|_| invalid())?;

        if !self.on_grid(row, col) {
            return Err(invalid());
        }
        Ok(self.pt(row, col))
    }

    /// Format a point as a coordinate; the inverse of [`Geometry::parse_coord`].
    pub fn format_point(&self, point: Point) -> String {
        match point {
            PASS => "pass".into(),
            NO_POINT => "none".into(),
            _ => {
                let (row, col) = self.coord(point);
                let mut c = (b'A' + col as u8 - 1) as char;
                if c >= 'I' {
                    c = (c as u8 + 1) as char;
                }
                format!("{c}{row}")
            }
        }
    }
}
