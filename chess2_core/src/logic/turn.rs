use crate::logic::board::Color;
use crate::logic::game::{GameState, GameStatus};
use crate::logic::rules::MAX_ENERGY;
use serde::{Deserialize, Serialize};

/// What the side that now has the move is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    Continue,
    Check,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameState {
    /// Hands the move to the other side and works out where that leaves it.
    ///
    /// The cloak countdown belongs to the side waiting for its turn back: it
    /// drops by one each time the opponent finishes a turn, so a fresh cloak
    /// hides its Hybrid for two full opponent turns.
    pub fn end_turn(&mut self) -> TurnOutcome {
        let acted = self.turn;
        self.tick_cloak(acted.opposite());

        self.turn = acted.opposite();
        if self.turn == Color::White {
            self.move_number += 1;
        }
        let idx = self.turn.index();
        self.energy[idx] = (self.energy[idx] + 1).min(MAX_ENERGY);

        // A King that dies in a duel loses the game on the spot.
        if let Some(loser) = Color::ALL
            .into_iter()
            .find(|&color| self.board.find_king(color).is_none())
        {
            let winner = loser.opposite();
            self.status = GameStatus::Checkmate(winner);
            self.log.push(format!(
                "{} King has fallen! {} wins!",
                loser.name(),
                winner.name()
            ));
            return TurnOutcome::Checkmate { winner };
        }

        let side = self.turn;
        let in_check = self.is_in_check(side);
        let has_moves = self.has_any_legal_move(side);

        match (in_check, has_moves) {
            (true, false) => {
                let winner = side.opposite();
                self.status = GameStatus::Checkmate(winner);
                self.log.push(format!("Checkmate! {} wins!", winner.name()));
                TurnOutcome::Checkmate { winner }
            }
            (false, false) => {
                self.status = GameStatus::Stalemate;
                self.log.push("Stalemate! It's a draw.");
                TurnOutcome::Stalemate
            }
            (true, true) => {
                self.log.push(format!("{} is in check!", side.name()));
                TurnOutcome::Check
            }
            (false, true) => TurnOutcome::Continue,
        }
    }

    fn tick_cloak(&mut self, owner: Color) {
        let idx = owner.index();
        let Some(cloak) = self.cloaks[idx].as_mut() else {
            return;
        };
        cloak.turns_remaining = cloak.turns_remaining.saturating_sub(1);
        if cloak.turns_remaining == 0 {
            self.cloaks[idx] = None;
            self.log.push(format!("{} Hybrid decloaks!", owner.name()));
        }
    }
}
