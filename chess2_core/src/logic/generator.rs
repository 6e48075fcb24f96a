use crate::engine::{CastleKind, Move, MoveKind};
use crate::logic::board::{Board, Color, PieceType, Square, BOARD_SIZE};
use crate::logic::game::CastleRights;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const DIAGONAL_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const STRAIGHT_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const ALL_DIRS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

/// Farthest a Jumper travels along one ray.
pub const JUMPER_RANGE: i8 = 3;

/// Pseudo-legal move generation: geometry and occupancy only, own king safety
/// is left to `rules::legal_moves_from`.
pub struct MoveGenerator;

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator {
    pub const fn new() -> Self {
        Self
    }

    /// Appends the pseudo-legal moves of the piece on `from`.
    ///
    /// `castle_rights` are the rights of the moving side; pass `None` to skip
    /// castling candidates (attack detection never needs them).
    pub fn pseudo_legal(
        &self,
        board: &Board,
        from: Square,
        en_passant: Option<Square>,
        castle_rights: Option<&CastleRights>,
        moves: &mut Vec<Move>,
    ) {
        let Some(piece) = board.get_piece(from) else {
            return;
        };
        let color = piece.color;

        match piece.piece_type {
            PieceType::Pawn => gen_pawn_moves(board, from, color, en_passant, moves),
            PieceType::Knight => gen_step_moves(board, from, color, &KNIGHT_OFFSETS, moves),
            PieceType::Bishop => gen_slider_moves(board, from, color, &DIAGONAL_DIRS, moves),
            PieceType::Rook => gen_slider_moves(board, from, color, &STRAIGHT_DIRS, moves),
            PieceType::Queen => gen_slider_moves(board, from, color, &ALL_DIRS, moves),
            PieceType::King => gen_king_moves(board, from, color, castle_rights, moves),
            PieceType::Jumper => gen_jumper_moves(board, from, color, moves),
            PieceType::Hybrid => gen_hybrid_moves(board, from, color, moves),
        }
    }

    /// Number of pseudo-legal destinations for all of `color`'s pieces.
    pub fn count_pseudo_legal(
        &self,
        board: &Board,
        color: Color,
        en_passant: Option<Square>,
        castle_rights: Option<&CastleRights>,
    ) -> usize {
        let mut moves = Vec::with_capacity(64);
        for (from, _) in board.pieces(color) {
            self.pseudo_legal(board, from, en_passant, castle_rights, &mut moves);
        }
        moves.len()
    }
}

/// Pushes a move onto an empty or enemy square. Returns true when the square
/// was empty, i.e. a ray may keep going.
fn push_if_open(board: &Board, from: Square, to: Square, color: Color, moves: &mut Vec<Move>) -> bool {
    match board.get_piece(to) {
        None => {
            moves.push(Move::new(from, to));
            true
        }
        Some(p) if p.color != color => {
            moves.push(Move::new(from, to));
            false
        }
        Some(_) => false,
    }
}

fn gen_pawn_moves(
    board: &Board,
    from: Square,
    color: Color,
    en_passant: Option<Square>,
    moves: &mut Vec<Move>,
) {
    let forward = color.forward();

    if let Some(one) = from.offset(forward, 0) {
        if board.is_empty(one) {
            moves.push(Move::new(from, one));
            if from.row() == color.pawn_row() {
                if let Some(two) = from.offset(2 * forward, 0) {
                    if board.is_empty(two) {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        let Some(to) = from.offset(forward, dc) else {
            continue;
        };
        match board.get_piece(to) {
            Some(target) if target.color != color => moves.push(Move::new(from, to)),
            None if en_passant == Some(to) && has_en_passant_victim(board, from, to, color) => {
                moves.push(Move::with_kind(from, to, MoveKind::EnPassant));
            }
            _ => {}
        }
    }
}

// The pawn taken en passant stands beside the capturer, on the destination file.
fn has_en_passant_victim(board: &Board, from: Square, to: Square, color: Color) -> bool {
    Square::new(from.row(), to.col())
        .and_then(|sq| board.get_piece(sq))
        .is_some_and(|p| p.piece_type == PieceType::Pawn && p.color != color)
}

fn gen_step_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            push_if_open(board, from, to, color, moves);
        }
    }
}

fn gen_slider_moves(
    board: &Board,
    from: Square,
    color: Color,
    dirs: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in dirs {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dr, dc) {
            if !push_if_open(board, from, to, color, moves) {
                break;
            }
            cursor = to;
        }
    }
}

fn gen_king_moves(
    board: &Board,
    from: Square,
    color: Color,
    castle_rights: Option<&CastleRights>,
    moves: &mut Vec<Move>,
) {
    gen_step_moves(board, from, color, &ALL_DIRS, moves);

    let Some(rights) = castle_rights else {
        return;
    };
    if rights.king_moved || from.row() != color.back_row() {
        return;
    }

    let row = from.row();
    let kc = from.col();
    let holds = |col: u8, pt: PieceType| {
        Square::new(row, col)
            .and_then(|sq| board.get_piece(sq))
            .is_some_and(|p| p.piece_type == pt && p.color == color)
    };
    let clear_between = |a: u8, b: u8| {
        (a.min(b) + 1..a.max(b))
            .filter_map(|col| Square::new(row, col))
            .all(|sq| board.is_empty(sq))
    };
    let mut push_castle = |to_col: u8, kind: CastleKind| {
        if let Some(to) = Square::new(row, to_col) {
            moves.push(Move::with_kind(from, to, MoveKind::Castle(kind)));
        }
    };

    let high_corner = BOARD_SIZE - 1;
    if !rights.kingside_rook_moved
        && high_corner >= kc + 2
        && holds(high_corner, PieceType::Rook)
        && clear_between(kc, high_corner)
    {
        push_castle(kc + 2, CastleKind::Kingside);
    }
    if !rights.queenside_rook_moved
        && kc >= 2
        && holds(0, PieceType::Rook)
        && clear_between(kc, 0)
    {
        push_castle(kc - 2, CastleKind::Queenside);
    }

    for jumper_col in 0..BOARD_SIZE {
        if !holds(jumper_col, PieceType::Jumper) || !clear_between(kc, jumper_col) {
            continue;
        }
        if jumper_col >= kc + 2 && !rights.high_jumper_castled {
            push_castle(kc + 2, CastleKind::JumperHigh { jumper_col });
        } else if jumper_col + 2 <= kc && !rights.low_jumper_castled {
            push_castle(kc - 2, CastleKind::JumperLow { jumper_col });
        }
    }
}

/// Rays of up to `JUMPER_RANGE` squares that may pass over one occupied
/// square. The first piece met is hopped (and captured too when it is an
/// enemy); the second piece met ends the ray, captured when it is an enemy.
fn gen_jumper_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    for &(dr, dc) in &ALL_DIRS {
        let mut leaped = false;
        for step in 1..=JUMPER_RANGE {
            let Some(to) = from.offset(dr * step, dc * step) else {
                break;
            };
            match board.get_piece(to) {
                None => moves.push(Move::new(from, to)),
                Some(p) => {
                    if p.color != color {
                        moves.push(Move::new(from, to));
                    }
                    if leaped {
                        break;
                    }
                    leaped = true;
                }
            }
        }
    }
}

fn gen_hybrid_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    gen_step_moves(board, from, color, &KNIGHT_OFFSETS, moves);
    gen_step_moves(board, from, color, &DIAGONAL_DIRS, moves);
}
