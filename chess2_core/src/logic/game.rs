use crate::engine::{Move, MoveKind};
use crate::logic::board::{Board, Color, Piece, PieceType, Square};
use crate::logic::rules::{self, MoveError, START_ENERGY};
use crate::logic::turn::TurnOutcome;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of event lines a game keeps.
pub const LOG_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Checkmate(Color), // Winner
    Stalemate,
}

/// Castling flags for one side. They only ever go from `false` to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CastleRights {
    pub king_moved: bool,
    pub queenside_rook_moved: bool,
    pub kingside_rook_moved: bool,
    pub low_jumper_castled: bool,
    pub high_jumper_castled: bool,
}

/// A hidden Hybrid and how many opponent turns it stays hidden for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cloak {
    pub square: Square,
    pub turns_remaining: u8,
}

/// Human-readable event lines, oldest dropped first. Display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    entries: VecDeque<String>,
}

impl GameLog {
    pub fn push(&mut self, entry: impl Into<String>) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// The newest `n` entries, oldest first.
    pub fn latest(&self, n: usize) -> Vec<String> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Applied(TurnOutcome),
    /// A pawn reached the last rank; `GameState::apply_promotion` finishes the turn.
    PromotionPending,
}

/// Everything the rules read, without the log. Search restores from this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    board: Board,
    turn: Color,
    move_number: u32,
    energy: [u8; 2],
    en_passant: Option<Square>,
    cloaks: [Option<Cloak>; 2],
    castle_rights: [CastleRights; 2],
    status: GameStatus,
    pending_promotion: Option<Square>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Color,
    /// Starts at 1 and grows each time White is about to move again.
    pub move_number: u32,
    pub energy: [u8; 2],
    /// The square skipped by a pawn double step on the previous move.
    pub en_passant: Option<Square>,
    pub cloaks: [Option<Cloak>; 2],
    pub castle_rights: [CastleRights; 2],
    pub status: GameStatus,
    pub pending_promotion: Option<Square>,
    pub log: GameLog,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(Board::new(), Color::White)
    }

    /// A fresh game on an arbitrary position, rights untouched.
    #[must_use]
    pub fn with_board(board: Board, turn: Color) -> Self {
        Self {
            board,
            turn,
            move_number: 1,
            energy: [START_ENERGY; 2],
            en_passant: None,
            cloaks: [None; 2],
            castle_rights: [CastleRights::default(); 2],
            status: GameStatus::Playing,
            pending_promotion: None,
            log: GameLog::default(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Checkmate(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn energy_of(&self, color: Color) -> u8 {
        self.energy[color.index()]
    }

    pub fn cloak_of(&self, color: Color) -> Option<Cloak> {
        self.cloaks[color.index()]
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        rules::is_in_check(&self.board, color)
    }

    /// Legal moves of whatever piece stands on `from`, in generation order.
    pub fn legal_moves(&self, from: Square) -> Vec<Move> {
        rules::legal_moves_from(&self.board, from, self.en_passant, &self.castle_rights)
    }

    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        rules::all_legal_moves(&self.board, color, self.en_passant, &self.castle_rights)
    }

    pub fn has_any_legal_move(&self, color: Color) -> bool {
        rules::has_any_legal_move(&self.board, color, self.en_passant, &self.castle_rights)
    }

    /// Plays the side to move's piece from `from` to `to`.
    ///
    /// When several legal moves share a destination (a king that can either
    /// step or castle), `variant` selects one; without it the first generated
    /// move wins. Captures may trigger a duel drawn from `rng`.
    pub fn apply_move<R: Rng + ?Sized>(
        &mut self,
        from: Square,
        to: Square,
        variant: Option<MoveKind>,
        rng: &mut R,
    ) -> Result<MoveOutcome, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        if self.pending_promotion.is_some() {
            return Err(MoveError::PromotionAlreadyPending);
        }
        let piece = self.board.get_piece(from).ok_or(MoveError::EmptySource)?;
        if piece.color != self.turn {
            return Err(MoveError::NotMoversPiece);
        }

        let mv = self
            .legal_moves(from)
            .into_iter()
            .find(|mv| mv.to == to && variant.is_none_or(|kind| kind == mv.kind))
            .ok_or(MoveError::IllegalMove)?;

        if self.execute_recorded(&mv, rng) {
            self.pending_promotion = Some(mv.to);
            return Ok(MoveOutcome::PromotionPending);
        }
        Ok(MoveOutcome::Applied(self.end_turn()))
    }

    /// Completes a pending promotion with `choice` and ends the turn.
    pub fn apply_promotion(&mut self, choice: PieceType) -> Result<TurnOutcome, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        let square = self.pending_promotion.ok_or(MoveError::NoPromotionPending)?;
        if !choice.is_promotion_choice() {
            return Err(MoveError::InvalidPromotionChoice);
        }

        // A pawn lost in a duel on the last rank is still replaced here.
        self.board.set_piece(square, Some(Piece::new(choice, self.turn)));
        self.pending_promotion = None;
        self.log.push(format!(
            "{} pawn promotes to {} on {}",
            self.turn.name(),
            choice.name(),
            square
        ));
        Ok(self.end_turn())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            turn: self.turn,
            move_number: self.move_number,
            energy: self.energy,
            en_passant: self.en_passant,
            cloaks: self.cloaks,
            castle_rights: self.castle_rights,
            status: self.status,
            pending_promotion: self.pending_promotion,
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot {
            board,
            turn,
            move_number,
            energy,
            en_passant,
            cloaks,
            castle_rights,
            status,
            pending_promotion,
        } = snapshot;
        self.board = board;
        self.turn = turn;
        self.move_number = move_number;
        self.energy = energy;
        self.en_passant = en_passant;
        self.cloaks = cloaks;
        self.castle_rights = castle_rights;
        self.status = status;
        self.pending_promotion = pending_promotion;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CastleKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_new_game_defaults() {
        let game = GameState::new();
        assert_eq!(game.turn, Color::White);
        assert_eq!(game.move_number, 1);
        assert_eq!(game.energy, [1, 1]);
        assert_eq!(game.status, GameStatus::Playing);
        assert!(game.log.is_empty());
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = GameState::new();
        let before = game.clone();

        assert_eq!(
            game.apply_move(sq(4, 4), sq(3, 4), None, &mut rng),
            Err(MoveError::EmptySource)
        );
        assert_eq!(
            game.apply_move(sq(1, 4), sq(2, 4), None, &mut rng),
            Err(MoveError::NotMoversPiece)
        );
        assert_eq!(
            game.apply_move(sq(6, 4), sq(3, 4), None, &mut rng),
            Err(MoveError::IllegalMove)
        );
        assert_eq!(
            game.apply_promotion(PieceType::Queen),
            Err(MoveError::NoPromotionPending)
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_move_flips_turn_and_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = GameState::new();
        let outcome = game.apply_move(sq(6, 4), sq(4, 4), None, &mut rng);
        assert_eq!(outcome, Ok(MoveOutcome::Applied(TurnOutcome::Continue)));
        assert_eq!(game.turn, Color::Black);
        assert_eq!(game.move_number, 1);
        assert_eq!(game.en_passant, Some(sq(5, 4)));
        assert_eq!(game.energy, [1, 2]);
        assert_eq!(game.log.last(), Some("White Pawn e2→e4"));

        game.apply_move(sq(1, 4), sq(2, 4), None, &mut rng).unwrap();
        assert_eq!(game.turn, Color::White);
        assert_eq!(game.move_number, 2);
        assert_eq!(game.en_passant, None);
        assert_eq!(game.energy, [2, 2]);
    }

    #[test]
    fn test_promotion_pending_blocks_moves() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::from_fen("7k/1P6/8/8/8/8/8/K7").unwrap();
        let mut game = GameState::with_board(board, Color::White);

        let outcome = game.apply_move(sq(1, 1), sq(0, 1), None, &mut rng);
        assert_eq!(outcome, Ok(MoveOutcome::PromotionPending));
        assert_eq!(game.turn, Color::White);
        assert_eq!(
            game.apply_move(sq(7, 0), sq(7, 1), None, &mut rng),
            Err(MoveError::PromotionAlreadyPending)
        );
        assert_eq!(
            game.apply_promotion(PieceType::King),
            Err(MoveError::InvalidPromotionChoice)
        );

        game.apply_promotion(PieceType::Jumper).unwrap();
        assert_eq!(
            game.board.get_piece(sq(0, 1)),
            Some(Piece::new(PieceType::Jumper, Color::White))
        );
        assert_eq!(game.pending_promotion, None);
        assert_eq!(game.turn, Color::Black);
    }

    #[test]
    fn test_variant_selects_castle() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R").unwrap();
        let mut game = GameState::with_board(board, Color::White);

        game.apply_move(
            sq(7, 4),
            sq(7, 6),
            Some(MoveKind::Castle(CastleKind::Kingside)),
            &mut rng,
        )
        .unwrap();
        assert_eq!(
            game.board.get_piece(sq(7, 5)),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
        assert!(game.castle_rights[0].king_moved);
        assert!(game.castle_rights[0].kingside_rook_moved);
    }

    #[test]
    fn test_snapshot_restore_is_exact() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = GameState::new();
        game.apply_move(sq(6, 3), sq(4, 3), None, &mut rng).unwrap();
        let saved = game.snapshot();
        let before = game.clone();

        game.apply_move(sq(1, 2), sq(3, 2), None, &mut rng).unwrap();
        game.energy = [0, 0];
        game.status = GameStatus::Stalemate;
        game.restore(saved);

        assert_eq!(game.board, before.board);
        assert_eq!(game.turn, before.turn);
        assert_eq!(game.energy, before.energy);
        assert_eq!(game.en_passant, before.en_passant);
        assert_eq!(game.status, before.status);
        assert_eq!(game.move_number, before.move_number);
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = GameLog::default();
        for i in 0..100 {
            log.push(format!("event {i}"));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.last(), Some("event 99"));
        assert_eq!(log.latest(2), vec!["event 98".to_string(), "event 99".to_string()]);
        assert_eq!(log.iter().next(), Some("event 36"));
    }
}
