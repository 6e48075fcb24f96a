// Piece Values
pub const VAL_PAWN: i32 = 100;
pub const VAL_KNIGHT: i32 = 320;
pub const VAL_BISHOP: i32 = 330;
pub const VAL_ROOK: i32 = 500;
pub const VAL_QUEEN: i32 = 900;
pub const VAL_KING: i32 = 20000;
pub const VAL_JUMPER: i32 = 700;
pub const VAL_HYBRID: i32 = 400;

// Piece-Square Tables, written from White's side of the board:
// row 0 is Black's back rank, row 7 is White's. Black reads them flipped.

#[rustfmt::skip]
pub const PST_PAWN: [[i32; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [ 50,  50,  50,  50,  50,  50,  50,  50],
    [ 10,  10,  20,  30,  30,  20,  10,  10],
    [  5,   5,  10,  25,  25,  10,   5,   5],
    [  0,   0,   0,  20,  20,   0,   0,   0],
    [  5,  -5, -10,   0,   0, -10,  -5,   5],
    [  5,  10,  10, -20, -20,  10,  10,   5],
    [  0,   0,   0,   0,   0,   0,   0,   0],
];

#[rustfmt::skip]
pub const PST_KNIGHT: [[i32; 8]; 8] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20,   0,   0,   0,   0, -20, -40],
    [-30,   0,  10,  15,  15,  10,   0, -30],
    [-30,   5,  15,  20,  20,  15,   5, -30],
    [-30,   0,  15,  20,  20,  15,   0, -30],
    [-30,   5,  10,  15,  15,  10,   5, -30],
    [-40, -20,   0,   5,   5,   0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

#[rustfmt::skip]
pub const PST_BISHOP: [[i32; 8]; 8] = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10,   0,   0,   0,   0,   0,   0, -10],
    [-10,   0,   5,  10,  10,   5,   0, -10],
    [-10,   5,   5,  10,  10,   5,   5, -10],
    [-10,   0,  10,  10,  10,  10,   0, -10],
    [-10,  10,  10,  10,  10,  10,  10, -10],
    [-10,   5,   0,   0,   0,   0,   5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

#[rustfmt::skip]
pub const PST_ROOK: [[i32; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [  5,  10,  10,  10,  10,  10,  10,   5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [  0,   0,   0,   5,   5,   0,   0,   0],
];

#[rustfmt::skip]
pub const PST_QUEEN: [[i32; 8]; 8] = [
    [-20, -10, -10,  -5,  -5, -10, -10, -20],
    [-10,   0,   0,   0,   0,   0,   0, -10],
    [-10,   0,   5,   5,   5,   5,   0, -10],
    [ -5,   0,   5,   5,   5,   5,   0,  -5],
    [  0,   0,   5,   5,   5,   5,   0,  -5],
    [-10,   5,   5,   5,   5,   5,   0, -10],
    [-10,   0,   5,   0,   0,   0,   0, -10],
    [-20, -10, -10,  -5,  -5, -10, -10, -20],
];

#[rustfmt::skip]
pub const PST_KING: [[i32; 8]; 8] = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [ 20,  20,   0,   0,   0,   0,  20,  20],
    [ 20,  30,  10,   0,   0,  10,  30,  20],
];

// The Jumper hops over blockers, so it wants open central lines like a queen.
#[rustfmt::skip]
pub const PST_JUMPER: [[i32; 8]; 8] = [
    [-10,  -5,  -5,   0,   0,  -5,  -5, -10],
    [ -5,   5,   5,   5,   5,   5,   5,  -5],
    [ -5,   5,  10,  10,  10,  10,   5,  -5],
    [  0,   5,  10,  15,  15,  10,   5,   0],
    [  0,   5,  10,  15,  15,  10,   5,   0],
    [ -5,   5,  10,  10,  10,  10,   5,  -5],
    [ -5,   0,   5,   5,   5,   5,   0,  -5],
    [-10,  -5,  -5,   0,   0,  -5,  -5, -10],
];

// Knight hops plus diagonal steps: centralisation pays most.
#[rustfmt::skip]
pub const PST_HYBRID: [[i32; 8]; 8] = [
    [-40, -30, -20, -20, -20, -20, -30, -40],
    [-30, -10,   5,   5,   5,   5, -10, -30],
    [-20,   5,  15,  20,  20,  15,   5, -20],
    [-20,  10,  20,  25,  25,  20,  10, -20],
    [-20,   5,  20,  25,  25,  20,   5, -20],
    [-20,  10,  15,  20,  20,  15,  10, -20],
    [-30, -10,   5,  10,  10,   5, -10, -30],
    [-40, -30, -20, -20, -20, -20, -30, -40],
];

use crate::logic::board::{Color, PieceType, Square};

pub const fn get_piece_value(pt: PieceType) -> i32 {
    match pt {
        PieceType::Pawn => VAL_PAWN,
        PieceType::Knight => VAL_KNIGHT,
        PieceType::Bishop => VAL_BISHOP,
        PieceType::Rook => VAL_ROOK,
        PieceType::Queen => VAL_QUEEN,
        PieceType::King => VAL_KING,
        PieceType::Jumper => VAL_JUMPER,
        PieceType::Hybrid => VAL_HYBRID,
    }
}

pub const fn get_pst_value(pt: PieceType, color: Color, sq: Square) -> i32 {
    let row = match color {
        Color::White => sq.row(),
        Color::Black => 7 - sq.row(),
    } as usize;
    let col = sq.col() as usize;

    let table = match pt {
        PieceType::Pawn => &PST_PAWN,
        PieceType::Knight => &PST_KNIGHT,
        PieceType::Bishop => &PST_BISHOP,
        PieceType::Rook => &PST_ROOK,
        PieceType::Queen => &PST_QUEEN,
        PieceType::King => &PST_KING,
        PieceType::Jumper => &PST_JUMPER,
        PieceType::Hybrid => &PST_HYBRID,
    };
    table[row][col]
}
