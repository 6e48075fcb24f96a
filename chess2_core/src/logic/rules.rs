use crate::engine::Move;
use crate::logic::board::{Board, Color, Square};
use crate::logic::executor::place_move;
use crate::logic::game::CastleRights;
use crate::logic::generator::MoveGenerator;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const START_ENERGY: u8 = 1;
pub const MAX_ENERGY: u8 = 3;
pub const AREA_PUSH_COST: u8 = 3;
pub const CLOAK_COST: u8 = 1;
/// Opponent turns a cloaked Hybrid stays hidden for.
pub const CLOAK_TURNS: u8 = 2;
pub const DUEL_PROBABILITY: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MoveError {
    #[error("square is off the board")]
    InvalidSquare,
    #[error("no piece on the source square")]
    EmptySource,
    #[error("that piece does not belong to the side to move")]
    NotMoversPiece,
    #[error("it is not that side's turn")]
    NotSidesTurn,
    #[error("the game is already over")]
    GameAlreadyOver,
    #[error("illegal move")]
    IllegalMove,
    #[error("a promotion choice is still pending")]
    PromotionAlreadyPending,
    #[error("no promotion is pending")]
    NoPromotionPending,
    #[error("pawns may only promote to Queen, Rook, Bishop, Knight or Jumper")]
    InvalidPromotionChoice,
    #[error("not enough energy")]
    InsufficientEnergy,
    #[error("a cloak is already active")]
    CloakAlreadyActive,
    #[error("only your own Hybrid can cloak")]
    NotAHybridPiece,
}

/// Checks if the `color` king is attacked. A side without a king is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .find_king(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

/// True when any `by` piece has a pseudo-legal move landing on `target`.
pub fn is_square_attacked(board: &Board, target: Square, by: Color) -> bool {
    let generator = MoveGenerator::new();
    let mut moves = Vec::with_capacity(32);
    for (from, _) in board.pieces(by) {
        moves.clear();
        generator.pseudo_legal(board, from, None, None, &mut moves);
        if moves.iter().any(|mv| mv.to == target) {
            return true;
        }
    }
    false
}

/// Pseudo-legal moves of the piece on `from` that do not leave its own king attacked.
///
/// Each candidate is played on a scratch copy of the board, including the
/// en passant removal and castling partner relocation, and the king is then
/// tested against every enemy piece. This costs
/// O(moves x enemy pieces x enemy move generation) per call; the fixed
/// shallow search depth is what keeps it affordable.
pub fn legal_moves_from(
    board: &Board,
    from: Square,
    en_passant: Option<Square>,
    castle_rights: &[CastleRights; 2],
) -> Vec<Move> {
    let Some(piece) = board.get_piece(from) else {
        return Vec::new();
    };
    let mut moves = Vec::with_capacity(32);
    MoveGenerator::new().pseudo_legal(
        board,
        from,
        en_passant,
        Some(&castle_rights[piece.color.index()]),
        &mut moves,
    );
    moves.retain(|mv| !leaves_king_attacked(board, mv, piece.color));
    moves
}

fn leaves_king_attacked(board: &Board, mv: &Move, color: Color) -> bool {
    let mut next = board.clone();
    place_move(&mut next, mv);
    is_in_check(&next, color)
}

pub fn all_legal_moves(
    board: &Board,
    color: Color,
    en_passant: Option<Square>,
    castle_rights: &[CastleRights; 2],
) -> Vec<Move> {
    board
        .pieces(color)
        .flat_map(|(from, _)| legal_moves_from(board, from, en_passant, castle_rights))
        .collect()
}

/// Stops at the first piece that can move.
pub fn has_any_legal_move(
    board: &Board,
    color: Color,
    en_passant: Option<Square>,
    castle_rights: &[CastleRights; 2],
) -> bool {
    board
        .pieces(color)
        .any(|(from, _)| !legal_moves_from(board, from, en_passant, castle_rights).is_empty())
}
