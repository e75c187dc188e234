//! Tactical move queries built on the line pattern matcher.
//!
//! Each query returns the points (possibly none) at which `color` should
//! play for one tactical reason. Results follow the matcher's order: rows,
//! then columns, then diagonals.

use crate::board::{Board, Color};
use crate::constants::CAPTURE_THREAT;
use crate::geometry::Point;
use crate::patterns::{PatternFamily, find_targets};

fn push_unique(moves: &mut Vec<Point>, extra: impl IntoIterator<Item = Point>) {
    for pt in extra {
        if !moves.contains(&pt) {
            moves.push(pt);
        }
    }
}

impl Board {
    /// Points that win immediately for `color`.
    ///
    /// These complete a five-cell window holding four of `color`'s stones.
    /// When `color` is one capture short of the capture limit, every
    /// capturing move wins as well and is appended.
    pub fn win_search(&self, color: Color) -> Vec<Point> {
        let mut moves = find_targets(self, PatternFamily::Win, color);
        if self.get_captures(color) >= CAPTURE_THREAT {
            push_unique(&mut moves, self.capture(color));
        }
        moves
    }

    /// Points `color` must take to stop the opponent winning next move.
    ///
    /// - every point that completes an opponent five;
    /// - while such a threat exists, every capture by `color` that changes
    ///   the opponent's number of completing points (a block by removal);
    /// - when the opponent is one capture short of the limit, the opponent's
    ///   capture points (occupying them denies the deciding capture).
    pub fn block_win(&self, color: Color) -> Vec<Point> {
        let opp = color.opponent();
        let threats = find_targets(self, PatternFamily::Win, opp);
        let mut moves = threats.clone();

        if !threats.is_empty() {
            for mv in self.capture(color) {
                let mut trial = self.copy();
                trial.play_move(mv, color);
                if find_targets(&trial, PatternFamily::Win, opp).len() != threats.len() {
                    push_unique(&mut moves, [mv]);
                }
            }
        }

        if self.get_captures(opp) >= CAPTURE_THREAT {
            push_unique(&mut moves, self.capture(opp));
        }
        moves
    }

    /// Points that give `color` a four open at both ends.
    pub fn open_four(&self, color: Color) -> Vec<Point> {
        find_targets(self, PatternFamily::OpenFour, color)
    }

    /// Points at which `color` captures an enemy pair.
    pub fn capture(&self, color: Color) -> Vec<Point> {
        find_targets(self, PatternFamily::Capture, color)
    }

    /// Points that save one of `color`'s pairs from an immediate capture.
    pub fn protect(&self, color: Color) -> Vec<Point> {
        find_targets(self, PatternFamily::Protect, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, GameResult};

    fn place(board: &mut Board, color: Color, stones: &[(usize, usize)]) {
        for &(row, col) in stones {
            let pt = board.pt(row, col);
            assert!(board.play_move(pt, color));
        }
    }

    /// Black with 8 captures on a 9x9 board: pairs taken on rows 1, 3, 5, 7.
    fn board_with_eight_black_captures() -> Board {
        let mut board = Board::new(9);
        for row in [1, 3, 5, 7] {
            place(&mut board, Color::Black, &[(row, 1)]);
            place(&mut board, Color::White, &[(row, 2), (row, 3)]);
            place(&mut board, Color::Black, &[(row, 4)]);
        }
        assert_eq!(board.get_captures(Color::Black), 8);
        board
    }

    #[test]
    fn test_win_search_row() {
        let mut board = Board::new(7);
        place(&mut board, Color::Black, &[(2, 1), (2, 2), (2, 3), (2, 4)]);
        let target = board.pt(2, 5);
        assert_eq!(board.win_search(Color::Black), vec![target]);
        assert!(board.win_search(Color::White).is_empty());

        board.play_move(target, Color::Black);
        assert_eq!(board.end_of_game(), GameResult::Win(Color::Black));
    }

    #[test]
    fn test_win_search_gap() {
        let mut board = Board::new(7);
        place(&mut board, Color::White, &[(1, 3), (2, 3), (4, 3), (5, 3)]);
        assert_eq!(board.win_search(Color::White), vec![board.pt(3, 3)]);
    }

    #[test]
    fn test_win_search_includes_deciding_capture() {
        let mut board = board_with_eight_black_captures();
        place(&mut board, Color::Black, &[(9, 1)]);
        place(&mut board, Color::White, &[(9, 2), (9, 3)]);
        let capture = board.pt(9, 4);
        assert_eq!(board.win_search(Color::Black), vec![capture]);

        board.play_move(capture, Color::Black);
        assert_eq!(board.get_captures(Color::Black), 10);
        assert_eq!(board.end_of_game(), GameResult::Win(Color::Black));
    }

    #[test]
    fn test_block_win_by_occupation() {
        let mut board = Board::new(7);
        place(&mut board, Color::Black, &[(6, 2), (6, 3), (6, 4), (6, 5)]);
        let blocks = board.block_win(Color::White);
        assert_eq!(blocks, vec![board.pt(6, 6), board.pt(6, 1)]);
        assert!(board.block_win(Color::Black).is_empty());
    }

    #[test]
    fn test_block_win_by_capture() {
        let mut board = Board::new(7);
        place(&mut board, Color::Black, &[(3, 1), (3, 2), (3, 3), (3, 4), (4, 2)]);
        place(&mut board, Color::White, &[(2, 2)]);
        assert_eq!(board.capture(Color::White), vec![board.pt(5, 2)]);
        assert_eq!(
            board.block_win(Color::White),
            vec![board.pt(3, 5), board.pt(5, 2)]
        );
    }

    #[test]
    fn test_block_win_ignores_irrelevant_capture() {
        let mut board = Board::new(9);
        place(&mut board, Color::Black, &[(1, 1), (1, 2), (1, 3), (1, 4)]);
        // A capturable black pair far from the threat
        place(&mut board, Color::Black, &[(7, 6), (7, 7)]);
        place(&mut board, Color::White, &[(7, 5)]);
        assert_eq!(board.capture(Color::White), vec![board.pt(7, 8)]);
        assert_eq!(board.block_win(Color::White), vec![board.pt(1, 5)]);
    }

    #[test]
    fn test_block_win_at_eight_captures() {
        let mut board = board_with_eight_black_captures();
        place(&mut board, Color::Black, &[(9, 1)]);
        place(&mut board, Color::White, &[(9, 2), (9, 3)]);
        assert_eq!(board.block_win(Color::White), vec![board.pt(9, 4)]);
    }

    #[test]
    fn test_open_four() {
        let mut board = Board::new(7);
        place(&mut board, Color::Black, &[(4, 2), (4, 3), (4, 4)]);
        assert_eq!(board.open_four(Color::Black), vec![board.pt(4, 5)]);

        let mut split = Board::new(7);
        place(&mut split, Color::White, &[(2, 3), (3, 3), (5, 3)]);
        assert_eq!(split.open_four(Color::White), vec![split.pt(4, 3)]);
    }

    #[test]
    fn test_open_four_needs_open_ends() {
        let mut board = Board::new(7);
        place(&mut board, Color::Black, &[(4, 1), (4, 2), (4, 3)]);
        assert!(board.open_four(Color::Black).is_empty());
    }

    #[test]
    fn test_capture_then_play() {
        let mut board = Board::new(7);
        place(&mut board, Color::White, &[(5, 3)]);
        place(&mut board, Color::Black, &[(5, 4), (5, 5)]);
        let moves = board.capture(Color::White);
        assert_eq!(moves, vec![board.pt(5, 6)]);

        board.play_move(moves[0], Color::White);
        assert_eq!(board.get_color(board.pt(5, 4)), Cell::Empty);
        assert_eq!(board.get_color(board.pt(5, 5)), Cell::Empty);
        assert_eq!(board.get_captures(Color::White), 2);
        assert!(board.capture(Color::White).is_empty());
    }

    #[test]
    fn test_protect_both_colors() {
        let mut board = Board::new(7);
        place(&mut board, Color::White, &[(4, 2)]);
        place(&mut board, Color::Black, &[(4, 3), (4, 4)]);
        assert_eq!(board.protect(Color::Black), vec![board.pt(4, 5)]);
        assert_eq!(board.capture(Color::White), vec![board.pt(4, 5)]);

        let mut board = Board::new(7);
        place(&mut board, Color::White, &[(2, 6), (3, 6)]);
        place(&mut board, Color::Black, &[(4, 6)]);
        assert_eq!(board.protect(Color::White), vec![board.pt(1, 6)]);
    }
}
