use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::Color;
use crate::logic::eval_constants::get_pst_value;
use crate::logic::game::GameState;
use crate::logic::generator::MoveGenerator;
use std::sync::Arc;

pub struct SimpleEvaluator {
    config: Arc<EngineConfig>,
}

impl SimpleEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    fn material_and_position(&self, state: &GameState, color: Color) -> i32 {
        state
            .board
            .pieces(color)
            .map(|(sq, piece)| {
                self.config.piece_value(piece.piece_type)
                    + get_pst_value(piece.piece_type, color, sq)
            })
            .sum()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn mobility(state: &GameState, color: Color) -> i32 {
        let rights = &state.castle_rights[color.index()];
        MoveGenerator::new().count_pseudo_legal(&state.board, color, state.en_passant, Some(rights))
            as i32
    }
}

impl Evaluator for SimpleEvaluator {
    fn evaluate(&self, state: &GameState, side: Color) -> i32 {
        let them = side.opposite();
        let cfg = &self.config;

        let mut score =
            self.material_and_position(state, side) - self.material_and_position(state, them);

        score += cfg.weight_mobility * (Self::mobility(state, side) - Self::mobility(state, them));

        score += cfg.weight_energy
            * (i32::from(state.energy_of(side)) - i32::from(state.energy_of(them)));

        if state.is_in_check(them) {
            score += cfg.check_bonus;
        }
        if state.is_in_check(side) {
            score -= cfg.check_bonus;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::Board;

    fn evaluator() -> SimpleEvaluator {
        SimpleEvaluator::new(Arc::new(EngineConfig::default()))
    }

    #[test]
    fn test_score_is_antisymmetric() {
        let state = GameState::new();
        let eval = evaluator();
        assert_eq!(
            eval.evaluate(&state, Color::White),
            -eval.evaluate(&state, Color::Black)
        );
    }

    #[test]
    fn test_extra_queen_dominates() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/3QK3").unwrap();
        let state = GameState::with_board(board, Color::White);
        let eval = evaluator();
        assert!(eval.evaluate(&state, Color::White) > 800);
        assert!(eval.evaluate(&state, Color::Black) < -800);
    }

    #[test]
    fn test_energy_term() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/K7").unwrap();
        let mut state = GameState::with_board(board, Color::White);
        let eval = evaluator();
        let base = eval.evaluate(&state, Color::White);
        state.energy = [3, 1];
        assert_eq!(eval.evaluate(&state, Color::White), base + 2 * 15);
    }
}
