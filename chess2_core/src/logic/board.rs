use crate::logic::rules::MoveError;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;
use thiserror::Error;

pub const BOARD_SIZE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Self; 2] = [Self::White, Self::Black];

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Row holding this side's back rank at the start of a match.
    pub const fn back_row(self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    pub const fn pawn_row(self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Row delta of a single pawn step.
    pub const fn forward(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    pub const fn promotion_row(self) -> u8 {
        self.opposite().back_row()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
    Jumper = 6,
    Hybrid = 7,
}

impl PieceType {
    pub const ALL: [Self; 8] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
        Self::Jumper,
        Self::Hybrid,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pawn => "Pawn",
            Self::Knight => "Knight",
            Self::Bishop => "Bishop",
            Self::Rook => "Rook",
            Self::Queen => "Queen",
            Self::King => "King",
            Self::Jumper => "Jumper",
            Self::Hybrid => "Hybrid",
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
            Self::Jumper => 'j',
            Self::Hybrid => 'h',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Self::Pawn),
            'n' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'r' => Some(Self::Rook),
            'q' => Some(Self::Queen),
            'k' => Some(Self::King),
            'j' => Some(Self::Jumper),
            'h' => Some(Self::Hybrid),
            _ => None,
        }
    }

    /// Kinds a pawn may become on the farthest rank.
    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            Self::Queen | Self::Rook | Self::Bishop | Self::Knight | Self::Jumper
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    fn to_fen_char(self) -> char {
        let c = self.piece_type.to_char();
        if self.color == Color::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

/// A cell on the 8x8 grid. Row 0 is Black's back rank, column 0 the a-file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "[u8; 2]", into = "[u8; 2]")]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            #[allow(clippy::cast_possible_truncation)]
            Some(Self {
                row: (index / 8) as u8,
                col: (index % 8) as u8,
            })
        } else {
            None
        }
    }

    /// Shifts the square by a row/column delta, `None` when it leaves the board.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let r = self.row as i8 + dr;
        let c = self.col as i8 + dc;
        if r < 0 || c < 0 {
            return None;
        }
        Self::new(r as u8, c as u8)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..64).filter_map(Self::from_index)
    }
}

impl TryFrom<[u8; 2]> for Square {
    type Error = MoveError;

    fn try_from([row, col]: [u8; 2]) -> Result<Self, Self::Error> {
        Self::new(row, col).ok_or(MoveError::InvalidSquare)
    }
}

impl From<Square> for [u8; 2] {
    fn from(sq: Square) -> Self {
        [sq.row, sq.col]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.col);
        write!(f, "{}{}", file, BOARD_SIZE - self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} describes {files} files")]
    RankLength { rank: usize, files: usize },
    #[error("unknown piece letter {0:?}")]
    UnknownPiece(char),
}

const BLACK_BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Hybrid,
    PieceType::Bishop,
    PieceType::Jumper,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
];

const WHITE_BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Jumper,
    PieceType::Bishop,
    PieceType::Hybrid,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    // Mailbox indexed by Square::index
    #[serde(with = "BigArray")]
    grid: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The starting layout.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_pieces(Color::Black, &BLACK_BACK_RANK);
        board.setup_pieces(Color::White, &WHITE_BACK_RANK);
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { grid: [None; 64] }
    }

    fn setup_pieces(&mut self, color: Color, back_rank: &[PieceType; 8]) {
        for (col, &pt) in (0u8..).zip(back_rank.iter()) {
            if let Some(sq) = Square::new(color.back_row(), col) {
                self.add_piece(sq, pt, color);
            }
            if let Some(sq) = Square::new(color.pawn_row(), col) {
                self.add_piece(sq, PieceType::Pawn, color);
            }
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let placement = fen.split_whitespace().next().unwrap_or_default();
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(FenError::RankCount(ranks.len()));
        }

        let mut board = Self::empty();
        for (row, rank) in (0u8..).zip(ranks.iter()) {
            let mut col: u8 = 0;
            for ch in rank.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    #[allow(clippy::cast_possible_truncation)]
                    {
                        col = col.saturating_add(skip as u8);
                    }
                    continue;
                }
                let pt = PieceType::from_char(ch).ok_or(FenError::UnknownPiece(ch))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let sq = Square::new(row, col).ok_or(FenError::RankLength {
                    rank: row as usize,
                    files: col as usize + 1,
                })?;
                board.add_piece(sq, pt, color);
                col += 1;
            }
            if col != BOARD_SIZE {
                return Err(FenError::RankLength {
                    rank: row as usize,
                    files: col as usize,
                });
            }
        }
        Ok(board)
    }

    /// Placement field only, first rank listed is row 0.
    pub fn to_fen_string(&self) -> String {
        let mut fen = String::new();
        for row in 0..BOARD_SIZE {
            let mut empty_count = 0;
            for col in 0..BOARD_SIZE {
                let piece = Square::new(row, col).and_then(|sq| self.get_piece(sq));
                if let Some(piece) = piece {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if row + 1 < BOARD_SIZE {
                fen.push('/');
            }
        }
        fen
    }

    #[must_use]
    pub const fn get_piece(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.index()]
    }

    pub const fn is_empty(&self, sq: Square) -> bool {
        self.grid[sq.index()].is_none()
    }

    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.grid[sq.index()] = piece;
    }

    pub fn add_piece(&mut self, sq: Square, piece_type: PieceType, color: Color) {
        self.set_piece(sq, Some(Piece::new(piece_type, color)));
    }

    pub fn take_piece(&mut self, sq: Square) -> Option<Piece> {
        self.grid[sq.index()].take()
    }

    /// Moves whatever stands on `from` to `to` and returns what was on `to`.
    pub fn move_piece_quiet(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.take_piece(from);
        let captured = self.take_piece(to);
        self.set_piece(to, piece);
        captured
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, p)| p.piece_type == PieceType::King)
            .map(|(sq, _)| sq)
    }

    /// Occupied squares in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.get_piece(sq).map(|p| (sq, p)))
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, p)| p.color == color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_initial_setup() {
        let board = Board::new();
        let piece = board.get_piece(sq(7, 4)).unwrap();
        assert_eq!(piece.piece_type, PieceType::King);
        assert_eq!(piece.color, Color::White);

        let piece = board.get_piece(sq(0, 5)).unwrap();
        assert_eq!(piece.piece_type, PieceType::King);
        assert_eq!(piece.color, Color::Black);

        assert_eq!(board.pieces(Color::White).count(), 16);
        assert_eq!(board.pieces(Color::Black).count(), 16);
    }

    #[test]
    fn test_fen_generation() {
        let board = Board::new();
        assert_eq!(
            board.to_fen_string(),
            "rhbjqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKJBH"
        );
    }

    #[test]
    fn test_fen_parse_matches_layout() {
        let parsed = Board::from_fen("rhbjqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKJBH w").unwrap();
        assert_eq!(parsed, Board::new());
    }

    #[test]
    fn test_fen_rejects_bad_input() {
        assert_eq!(Board::from_fen("8/8/8"), Err(FenError::RankCount(3)));
        assert_eq!(
            Board::from_fen("8/8/8/8/8/8/8/7x"),
            Err(FenError::UnknownPiece('x'))
        );
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/7"),
            Err(FenError::RankLength { rank: 7, files: 7 })
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/8K"),
            Err(FenError::RankLength { rank: 7, .. })
        ));
    }

    #[test]
    fn test_square_bounds_and_offsets() {
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
        assert_eq!(sq(0, 0).offset(-1, 0), None);
        assert_eq!(sq(3, 3).offset(2, -1), Some(sq(5, 2)));
        assert_eq!(Square::try_from([9, 1]), Err(MoveError::InvalidSquare));
        assert_eq!(sq(7, 4).to_string(), "e1");
        assert_eq!(sq(0, 0).to_string(), "a8");
    }

    #[test]
    fn test_move_piece_quiet_returns_capture() {
        let mut board = Board::from_fen("8/8/8/3p4/8/8/3R4/8").unwrap();
        let captured = board.move_piece_quiet(sq(6, 3), sq(3, 3));
        assert_eq!(captured, Some(Piece::new(PieceType::Pawn, Color::Black)));
        assert!(board.is_empty(sq(6, 3)));
        assert_eq!(
            board.get_piece(sq(3, 3)),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
    }
}
