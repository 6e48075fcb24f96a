use chess2_core::engine::{CastleKind, MoveKind};
use chess2_core::logic::board::{Board, Color, Piece, PieceType, Square};
use chess2_core::logic::game::{GameState, GameStatus, MoveOutcome};
use chess2_core::logic::rules::MoveError;
use chess2_core::logic::turn::TurnOutcome;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col).expect("on board")
}

fn game_from_fen(fen: &str, turn: Color) -> GameState {
    GameState::with_board(Board::from_fen(fen).expect("Invalid FEN"), turn)
}

/// Always yields the same word: 0 wins every duel roll, `u64::MAX` loses it.
struct FixedRng(u64);

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }
    fn next_u64(&mut self) -> u64 {
        self.0
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0 as u8);
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

const NO_DUEL: u64 = u64::MAX;
const DUEL: u64 = 0;

#[test]
fn test_en_passant_window() {
    let mut rng = FixedRng(NO_DUEL);
    let mut game = GameState::new();
    game.apply_move(sq(6, 4), sq(4, 4), None, &mut rng).unwrap();
    game.apply_move(sq(1, 0), sq(2, 0), None, &mut rng).unwrap();
    game.apply_move(sq(4, 4), sq(3, 4), None, &mut rng).unwrap();
    game.apply_move(sq(1, 3), sq(3, 3), None, &mut rng).unwrap();
    assert_eq!(game.en_passant, Some(sq(2, 3)));

    let moves = game.legal_moves(sq(3, 4));
    assert!(moves
        .iter()
        .any(|mv| mv.to == sq(2, 3) && mv.kind == MoveKind::EnPassant));

    let outcome = game.apply_move(sq(3, 4), sq(2, 3), Some(MoveKind::EnPassant), &mut rng);
    assert!(matches!(outcome, Ok(MoveOutcome::Applied(_))));
    assert!(game.board.is_empty(sq(3, 3)));
    assert_eq!(
        game.board.get_piece(sq(2, 3)),
        Some(Piece::new(PieceType::Pawn, Color::White))
    );
    assert_eq!(game.log.last(), Some("White pawn captures en passant!"));
}

#[test]
fn test_en_passant_expires_after_one_move() {
    let mut rng = FixedRng(NO_DUEL);
    let mut game = GameState::new();
    game.apply_move(sq(6, 4), sq(4, 4), None, &mut rng).unwrap();
    game.apply_move(sq(1, 0), sq(2, 0), None, &mut rng).unwrap();
    game.apply_move(sq(4, 4), sq(3, 4), None, &mut rng).unwrap();
    game.apply_move(sq(1, 3), sq(3, 3), None, &mut rng).unwrap();

    game.apply_move(sq(6, 0), sq(5, 0), None, &mut rng).unwrap();
    game.apply_move(sq(2, 0), sq(3, 0), None, &mut rng).unwrap();
    assert_eq!(game.en_passant, None);
    assert_eq!(
        game.apply_move(sq(3, 4), sq(2, 3), None, &mut rng),
        Err(MoveError::IllegalMove)
    );
}

#[test]
fn test_area_push_scenario() {
    // Knight on d5 and rook on f3 touch the white king on e4.
    let mut game = game_from_fen("4k3/8/8/3n4/4K3/5r2/8/8", Color::White);
    game.energy = [3, 1];

    let result = game.apply_area_push(Color::White).unwrap();
    assert_eq!(result.affected, 2);
    assert_eq!(result.outcome, TurnOutcome::Continue);
    assert_eq!(game.energy_of(Color::White), 0);
    assert_eq!(game.turn, Color::Black);
    assert_eq!(game.energy_of(Color::Black), 2);
    assert!(game.board.is_empty(sq(3, 3)));
    assert!(game.board.is_empty(sq(5, 5)));
    assert_eq!(
        game.board.get_piece(sq(2, 2)),
        Some(Piece::new(PieceType::Knight, Color::Black))
    );
    assert_eq!(
        game.board.get_piece(sq(6, 6)),
        Some(Piece::new(PieceType::Rook, Color::Black))
    );
}

#[test]
fn test_cloak_hides_for_two_opponent_turns() {
    let mut rng = FixedRng(NO_DUEL);
    let mut game = GameState::new();
    let hybrid = sq(7, 7);

    game.apply_cloak(Color::White, hybrid).unwrap();
    assert_eq!(game.energy_of(Color::White), 0);
    game.apply_move(sq(6, 0), sq(5, 0), None, &mut rng).unwrap();

    // First Black turn.
    assert!(game.current_view(Some(Color::Black)).board.is_empty(hybrid));
    game.apply_move(sq(1, 0), sq(2, 0), None, &mut rng).unwrap();
    game.apply_move(sq(5, 0), sq(4, 0), None, &mut rng).unwrap();

    // Second Black turn.
    assert!(game.current_view(Some(Color::Black)).board.is_empty(hybrid));
    assert!(!game.current_view(Some(Color::White)).board.is_empty(hybrid));
    game.apply_move(sq(1, 7), sq(2, 7), None, &mut rng).unwrap();

    assert_eq!(game.cloak_of(Color::White), None);
    assert_eq!(
        game.current_view(Some(Color::Black)).board.get_piece(hybrid),
        Some(Piece::new(PieceType::Hybrid, Color::White))
    );
    assert!(game.log.iter().any(|line| line == "White Hybrid decloaks!"));
}

#[test]
fn test_checkmate_scenario() {
    let mut rng = FixedRng(NO_DUEL);
    let mut game = game_from_fen("k7/5Q2/2K5/8/8/8/8/8", Color::White);
    let outcome = game.apply_move(sq(1, 5), sq(1, 1), None, &mut rng);
    assert_eq!(
        outcome,
        Ok(MoveOutcome::Applied(TurnOutcome::Checkmate {
            winner: Color::White
        }))
    );
    assert_eq!(game.status, GameStatus::Checkmate(Color::White));
    assert_eq!(
        game.apply_move(sq(0, 0), sq(0, 1), None, &mut rng),
        Err(MoveError::GameAlreadyOver)
    );
}

#[test]
fn test_stalemate_scenario() {
    let mut rng = FixedRng(NO_DUEL);
    let mut game = game_from_fen("k7/8/5Q2/8/8/8/8/7K", Color::White);
    let outcome = game.apply_move(sq(2, 5), sq(2, 1), None, &mut rng);
    assert_eq!(outcome, Ok(MoveOutcome::Applied(TurnOutcome::Stalemate)));
    assert!(game.is_game_over());
    assert_eq!(game.winner(), None);
}

#[test]
fn test_rook_castles_both_sides() {
    let mut rng = FixedRng(NO_DUEL);
    let mut game = game_from_fen("r3k2r/8/8/8/8/8/8/R3K2R", Color::White);
    game.apply_move(sq(7, 4), sq(7, 6), None, &mut rng).unwrap();
    assert_eq!(game.board.to_fen_string(), "r3k2r/8/8/8/8/8/8/R4RK1");
    assert_eq!(game.log.last(), Some("White castles kingside"));

    game.apply_move(sq(0, 4), sq(0, 2), None, &mut rng).unwrap();
    assert_eq!(game.board.to_fen_string(), "2kr3r/8/8/8/8/8/8/R4RK1");
    let rights = game.castle_rights[Color::Black.index()];
    assert!(rights.king_moved && rights.queenside_rook_moved);
}

#[test]
fn test_jumper_castle_uses_the_right_once() {
    let mut rng = FixedRng(NO_DUEL);
    let mut game = game_from_fen("4k3/8/8/8/8/8/8/4K2J", Color::White);
    let variant = MoveKind::Castle(CastleKind::JumperHigh { jumper_col: 7 });
    game.apply_move(sq(7, 4), sq(7, 6), Some(variant), &mut rng)
        .unwrap();
    assert_eq!(game.board.to_fen_string(), "4k3/8/8/8/8/8/8/5JK1");
    assert!(game.castle_rights[0].high_jumper_castled);
    assert!(game.castle_rights[0].king_moved);
    assert_eq!(game.log.last(), Some("White castles with the Jumper!"));
}

#[test]
fn test_castle_rejected_when_path_blocked() {
    let mut rng = FixedRng(NO_DUEL);
    let mut game = game_from_fen("4k3/8/8/8/8/8/8/4KB1R", Color::White);
    assert_eq!(
        game.apply_move(
            sq(7, 4),
            sq(7, 6),
            Some(MoveKind::Castle(CastleKind::Kingside)),
            &mut rng
        ),
        Err(MoveError::IllegalMove)
    );
}

#[test]
fn test_forced_duel_and_forced_capture() {
    let fen = "4k3/8/8/3n4/4B3/8/8/4K3";

    let mut game = game_from_fen(fen, Color::White);
    game.apply_move(sq(4, 4), sq(3, 3), None, &mut FixedRng(DUEL))
        .unwrap();
    assert!(game.board.is_empty(sq(3, 3)));
    assert!(game.board.is_empty(sq(4, 4)));

    let mut game = game_from_fen(fen, Color::White);
    game.apply_move(sq(4, 4), sq(3, 3), None, &mut FixedRng(NO_DUEL))
        .unwrap();
    assert_eq!(
        game.board.get_piece(sq(3, 3)),
        Some(Piece::new(PieceType::Bishop, Color::White))
    );
}

#[test]
fn test_duel_rate_converges() {
    let fen = "4k3/8/8/3n4/4B3/8/8/4K3";
    let template = game_from_fen(fen, Color::White);
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let trials = 10_000;
    let mut duels = 0;

    for _ in 0..trials {
        let mut game = template.clone();
        game.apply_move(sq(4, 4), sq(3, 3), None, &mut rng).unwrap();
        if game.board.is_empty(sq(3, 3)) {
            duels += 1;
        }
    }

    let rate = f64::from(duels) / f64::from(trials);
    assert!((rate - 0.15).abs() < 0.02, "duel rate {rate}");
}

#[test]
fn test_duel_on_last_rank_still_promotes() {
    let mut game = game_from_fen("2r1k3/1P6/8/8/8/8/8/4K3", Color::White);
    let outcome = game.apply_move(sq(1, 1), sq(0, 2), None, &mut FixedRng(DUEL));
    assert_eq!(outcome, Ok(MoveOutcome::PromotionPending));
    assert!(game.board.is_empty(sq(0, 2)));

    game.apply_promotion(PieceType::Knight).unwrap();
    assert_eq!(
        game.board.get_piece(sq(0, 2)),
        Some(Piece::new(PieceType::Knight, Color::White))
    );
    assert_eq!(game.turn, Color::Black);
}

#[test]
fn test_castle_onto_partner_square_keeps_the_king() {
    let jumper = MoveKind::Castle(CastleKind::JumperLow { jumper_col: 3 });
    let mut game = game_from_fen("3j1k2/8/8/8/8/8/8/4K3", Color::Black);
    let outcome = game.apply_move(sq(0, 5), sq(0, 3), Some(jumper), &mut FixedRng(DUEL));
    assert_eq!(outcome, Ok(MoveOutcome::Applied(TurnOutcome::Continue)));
    assert_eq!(game.board.to_fen_string(), "3kj3/8/8/8/8/8/8/4K3");
    assert_eq!(game.status, GameStatus::Playing);

    let mut game = game_from_fen("5k1r/8/8/8/8/8/8/4K3", Color::Black);
    game.apply_move(
        sq(0, 5),
        sq(0, 7),
        Some(MoveKind::Castle(CastleKind::Kingside)),
        &mut FixedRng(DUEL),
    )
    .unwrap();
    assert_eq!(game.board.to_fen_string(), "6rk/8/8/8/8/8/8/4K3");
    assert_eq!(game.log.last(), Some("Black castles kingside"));
}

#[test]
fn test_cloaked_hybrid_move_stays_hidden_in_shared_log() {
    let mut rng = FixedRng(NO_DUEL);
    let mut game = GameState::new();
    game.apply_cloak(Color::White, sq(7, 7)).unwrap();
    game.apply_move(sq(7, 7), sq(5, 6), None, &mut rng).unwrap();

    let view = game.current_view(Some(Color::Black));
    assert!(view.board.is_empty(sq(5, 6)));
    assert_eq!(view.log.last().map(String::as_str), Some("White Hybrid moves unseen"));
    assert!(view.log.iter().all(|line| !line.contains("g3")));
}

#[test]
fn test_king_lost_in_duel_ends_the_game() {
    // The White King takes the knight and both fall.
    let mut game = game_from_fen("4k3/8/8/8/8/8/3n4/4K3", Color::White);
    let outcome = game.apply_move(sq(7, 4), sq(6, 3), None, &mut FixedRng(DUEL));
    assert_eq!(
        outcome,
        Ok(MoveOutcome::Applied(TurnOutcome::Checkmate {
            winner: Color::Black
        }))
    );
    assert_eq!(game.board.find_king(Color::White), None);
    assert_eq!(game.winner(), Some(Color::Black));
}
