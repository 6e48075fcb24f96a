use crate::engine::{CastleKind, Move, MoveKind};
use crate::logic::board::{Board, Color, Piece, PieceType, Square};
use crate::logic::game::GameState;
use crate::logic::rules::DUEL_PROBABILITY;
use rand::Rng;

/// Moves pieces on `board` for `mv`, including the en passant removal and the
/// castling partner. Returns the piece taken, if any. No other state changes.
pub fn place_move(board: &mut Board, mv: &Move) -> Option<Piece> {
    match mv.kind {
        MoveKind::Normal => board.move_piece_quiet(mv.from, mv.to),
        MoveKind::EnPassant => {
            board.move_piece_quiet(mv.from, mv.to);
            en_passant_victim(mv).and_then(|sq| board.take_piece(sq))
        }
        MoveKind::Castle(kind) => {
            castle(board, mv, kind);
            None
        }
    }
}

fn en_passant_victim(mv: &Move) -> Option<Square> {
    Square::new(mv.from.row(), mv.to.col())
}

// King and partner are lifted before either lands, so a partner standing on
// the king's destination cannot be overwritten.
fn castle(board: &mut Board, mv: &Move, kind: CastleKind) {
    let row = mv.from.row();
    let king = board.take_piece(mv.from);
    let partner = Square::new(row, kind.partner_from_col()).and_then(|sq| board.take_piece(sq));
    let partner_col = if kind.is_high() {
        mv.to.col().saturating_sub(1)
    } else {
        mv.to.col() + 1
    };
    board.set_piece(mv.to, king);
    if let Some(sq) = Square::new(row, partner_col) {
        board.set_piece(sq, partner);
    }
}

impl GameState {
    /// Plays an already validated move for real: captures may end in a duel
    /// and every event is logged. Returns true when a pawn reached its last
    /// rank and a promotion choice is now owed. The turn is not ended here.
    pub(crate) fn execute_recorded<R: Rng + ?Sized>(&mut self, mv: &Move, rng: &mut R) -> bool {
        let Some(piece) = self.board.get_piece(mv.from) else {
            return false;
        };
        let color = piece.color;
        // Only a plain capture of an enemy piece other than the King can duel.
        // A castle may land the King on its own partner's square.
        let victim = match mv.kind {
            MoveKind::Normal => self
                .board
                .get_piece(mv.to)
                .filter(|p| p.color != color && p.piece_type != PieceType::King),
            MoveKind::EnPassant | MoveKind::Castle(_) => None,
        };

        let duel = match victim {
            Some(victim) => {
                let roll = rng.gen_bool(DUEL_PROBABILITY);
                log::trace!(
                    "duel roll {} vs {}: {}",
                    piece.piece_type.name(),
                    victim.piece_type.name(),
                    roll
                );
                roll
            }
            None => false,
        };

        if duel {
            self.board.take_piece(mv.from);
            self.board.take_piece(mv.to);
            if let Some(victim) = victim {
                self.log.push(format!(
                    "DUEL! Both {} and {} are destroyed!",
                    piece.piece_type.name(),
                    victim.piece_type.name()
                ));
            }
        } else {
            let unseen = self.cloak_of(color).is_some_and(|c| c.square == mv.from);
            let captured = place_move(&mut self.board, mv);
            self.log_move(mv, piece, captured, unseen);
        }

        self.after_move(mv, piece, duel);
        piece.piece_type == PieceType::Pawn && mv.to.row() == color.promotion_row()
    }

    /// Plays an already validated move with no duel and no log, promoting to
    /// a Queen straight away. Used by search; the turn is not flipped.
    pub fn apply_quiet(&mut self, mv: &Move) {
        let Some(piece) = self.board.get_piece(mv.from) else {
            return;
        };
        place_move(&mut self.board, mv);
        self.after_move(mv, piece, false);
        if piece.piece_type == PieceType::Pawn && mv.to.row() == piece.color.promotion_row() {
            self.board
                .set_piece(mv.to, Some(Piece::new(PieceType::Queen, piece.color)));
        }
    }

    /// `unseen` moves are logged without squares, the log being shared with
    /// the opponent.
    fn log_move(&mut self, mv: &Move, piece: Piece, captured: Option<Piece>, unseen: bool) {
        let side = piece.color.name();
        let line = match mv.kind {
            MoveKind::Castle(CastleKind::Kingside) => format!("{side} castles kingside"),
            MoveKind::Castle(CastleKind::Queenside) => format!("{side} castles queenside"),
            MoveKind::Castle(_) => format!("{side} castles with the Jumper!"),
            MoveKind::EnPassant => format!("{side} pawn captures en passant!"),
            MoveKind::Normal if unseen => {
                let mut line = format!("{side} {} moves unseen", piece.piece_type.name());
                if let Some(victim) = captured {
                    line.push_str(" x");
                    line.push_str(victim.piece_type.name());
                }
                line
            }
            MoveKind::Normal => {
                let mut line = format!(
                    "{side} {} {}→{}",
                    piece.piece_type.name(),
                    mv.from,
                    mv.to
                );
                if let Some(victim) = captured {
                    line.push_str(" x");
                    line.push_str(victim.piece_type.name());
                }
                line
            }
        };
        self.log.push(line);
    }

    // Bookkeeping shared by both execution modes.
    fn after_move(&mut self, mv: &Move, piece: Piece, duel: bool) {
        self.update_castle_rights(mv, piece);

        self.en_passant = None;
        if piece.piece_type == PieceType::Pawn && mv.from.row().abs_diff(mv.to.row()) == 2 {
            self.en_passant = Square::new((mv.from.row() + mv.to.row()) / 2, mv.from.col());
        }

        let own = piece.color.index();
        if let Some(cloak) = self.cloaks[own].as_mut() {
            if cloak.square == mv.from {
                if duel {
                    self.cloaks[own] = None;
                } else {
                    cloak.square = mv.to;
                }
            }
        }
        self.reconcile_cloaks();
    }

    fn update_castle_rights(&mut self, mv: &Move, piece: Piece) {
        let color = piece.color;
        let back = color.back_row();
        let rights = &mut self.castle_rights[color.index()];

        match piece.piece_type {
            PieceType::King => rights.king_moved = true,
            PieceType::Rook if mv.from.row() == back => match mv.from.col() {
                0 => rights.queenside_rook_moved = true,
                7 => rights.kingside_rook_moved = true,
                _ => {}
            },
            PieceType::Jumper if mv.from.row() == back => {
                if mv.from.col() > 4 {
                    rights.high_jumper_castled = true;
                } else {
                    rights.low_jumper_castled = true;
                }
            }
            _ => {}
        }

        if let MoveKind::Castle(kind) = mv.kind {
            match kind {
                CastleKind::Kingside => rights.kingside_rook_moved = true,
                CastleKind::Queenside => rights.queenside_rook_moved = true,
                CastleKind::JumperHigh { .. } => rights.high_jumper_castled = true,
                CastleKind::JumperLow { .. } => rights.low_jumper_castled = true,
            }
        }
    }

    /// Drops any cloak whose square no longer holds that side's Hybrid.
    pub(crate) fn reconcile_cloaks(&mut self) {
        for color in Color::ALL {
            let idx = color.index();
            if let Some(cloak) = self.cloaks[idx] {
                let still_there = self
                    .board
                    .get_piece(cloak.square)
                    .is_some_and(|p| p.piece_type == PieceType::Hybrid && p.color == color);
                if !still_there {
                    self.cloaks[idx] = None;
                }
            }
        }
    }
}
