//! Board square representation.

use std::fmt;

/// A square on the chess board.
///
/// Squares are addressed by `(row, col)`: row 0 is rank 8 and row 7 is
/// rank 1, col 0 is file a. Internally the pair is packed into a single
/// index `row * 8 + col`, so a8 = 0, h8 = 7, a1 = 56 and h1 = 63.
/// Coordinates outside the board cannot be represented.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a square from row and column, or `None` if off the board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square(row * 8 + col))
        } else {
            None
        }
    }

    /// Iterates all squares from a8 to h1, rank by rank.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    /// Returns the square shifted by the given deltas, if it stays on the board.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row() as i8 + d_row;
        let col = self.col() as i8 + d_col;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }

    /// Returns the row (0 = rank 8).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// Returns the column (0 = file a).
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// Returns the packed index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Parses a file letter (`'a'`-`'h'`) into a column.
    #[inline]
    pub const fn col_from_file(c: char) -> Option<u8> {
        match c {
            'a'..='h' => Some(c as u8 - b'a'),
            _ => None,
        }
    }

    /// Parses a rank digit (`'1'`-`'8'`) into a row.
    #[inline]
    pub const fn row_from_rank(c: char) -> Option<u8> {
        match c {
            '1'..='8' => Some(b'8' - c as u8),
            _ => None,
        }
    }

    /// The file letter of this square.
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col()) as char
    }

    /// The rank digit of this square.
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'8' - self.row()) as char
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let col = Self::col_from_file(chars.next()?)?;
        let row = Self::row_from_rank(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Self::new(row, col)
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    // Home squares of kings and rooks
    pub const A8: Square = Square(0);
    pub const C8: Square = Square(2);
    pub const D8: Square = Square(3);
    pub const E8: Square = Square(4);
    pub const F8: Square = Square(5);
    pub const G8: Square = Square(6);
    pub const H8: Square = Square(7);
    pub const A1: Square = Square(56);
    pub const C1: Square = Square(58);
    pub const D1: Square = Square(59);
    pub const E1: Square = Square(60);
    pub const F1: Square = Square(61);
    pub const G1: Square = Square(62);
    pub const H1: Square = Square(63);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_coordinates() {
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(e4.row(), 4);
        assert_eq!(e4.col(), 4);
        assert_eq!(Square::new(7, 0), Some(Square::A1));
        assert_eq!(Square::new(0, 7), Some(Square::H8));
        assert_eq!(Square::new(8, 0), None);
        assert_eq!(Square::new(0, 8), None);
    }

    #[test]
    fn square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::A1));
        assert_eq!(Square::from_algebraic("e8"), Some(Square::E8));
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("a10"), None);
        assert_eq!(Square::from_algebraic(""), None);
    }

    #[test]
    fn square_to_algebraic() {
        assert_eq!(Square::A1.to_algebraic(), "a1");
        assert_eq!(Square::H8.to_algebraic(), "h8");
        assert_eq!(format!("{}", Square::G1), "g1");
        assert_eq!(format!("{:?}", Square::C8), "Square(c8)");
    }

    #[test]
    fn square_offset_stays_on_board() {
        assert_eq!(Square::E1.offset(-1, 0), Square::from_algebraic("e2"));
        assert_eq!(Square::E1.offset(1, 0), None);
        assert_eq!(Square::A8.offset(0, -1), None);
        assert_eq!(Square::H1.offset(-7, -7), Some(Square::A8));
    }

    #[test]
    fn all_squares_in_rank_order() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0], Square::A8);
        assert_eq!(squares[63], Square::H1);
    }

    #[test]
    fn file_and_rank_chars() {
        assert_eq!(Square::col_from_file('c'), Some(2));
        assert_eq!(Square::col_from_file('C'), None);
        assert_eq!(Square::row_from_rank('8'), Some(0));
        assert_eq!(Square::row_from_rank('1'), Some(7));
        assert_eq!(Square::row_from_rank('9'), None);
    }

    proptest::proptest! {
        #[test]
        fn offset_matches_coordinates(row in 0u8..8, col in 0u8..8, dr in -8i8..=8, dc in -8i8..=8) {
            let sq = Square::new(row, col).unwrap();
            let row = sq.row() as i8 + dr;
            let col = sq.col() as i8 + dc;
            let on_board = (0..8).contains(&row) && (0..8).contains(&col);
            match sq.offset(dr, dc) {
                Some(to) => {
                    proptest::prop_assert!(on_board);
                    proptest::prop_assert_eq!(to.row() as i8, row);
                    proptest::prop_assert_eq!(to.col() as i8, col);
                }
                None => proptest::prop_assert!(!on_board),
            }
        }

        #[test]
        fn algebraic_names_are_unique(row in 0u8..8, col in 0u8..8) {
            let sq = Square::new(row, col).unwrap();
            proptest::prop_assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
        }
    }
}
