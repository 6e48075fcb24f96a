use crate::logic::board::{Color, PieceType, Square};
use crate::logic::game::{Cloak, GameState};
use crate::logic::generator::ALL_DIRS;
use crate::logic::rules::{MoveError, AREA_PUSH_COST, CLOAK_COST, CLOAK_TURNS};
use crate::logic::turn::TurnOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaPushOutcome {
    /// Enemy pieces moved outward or pushed off the board.
    pub affected: usize,
    pub outcome: TurnOutcome,
}

impl GameState {
    fn check_ability(&self, side: Color, cost: u8) -> Result<(), MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        if self.pending_promotion.is_some() {
            return Err(MoveError::PromotionAlreadyPending);
        }
        if self.turn != side {
            return Err(MoveError::NotSidesTurn);
        }
        if self.energy_of(side) < cost {
            return Err(MoveError::InsufficientEnergy);
        }
        Ok(())
    }

    /// Shoves every enemy piece next to `side`'s King one square further away.
    /// Kings are never pushed. A piece whose landing square is taken stays put;
    /// one pushed past the edge leaves the game. Ends the turn.
    pub fn apply_area_push(&mut self, side: Color) -> Result<AreaPushOutcome, MoveError> {
        self.check_ability(side, AREA_PUSH_COST)?;
        let king = self.board.find_king(side).ok_or(MoveError::IllegalMove)?;

        self.energy[side.index()] -= AREA_PUSH_COST;

        let mut affected = 0;
        for &(dr, dc) in &ALL_DIRS {
            let Some(from) = king.offset(dr, dc) else {
                continue;
            };
            let Some(piece) = self.board.get_piece(from) else {
                continue;
            };
            if piece.color == side || piece.piece_type == PieceType::King {
                continue;
            }

            match from.offset(dr, dc) {
                Some(to) if self.board.is_empty(to) => {
                    self.board.move_piece_quiet(from, to);
                    self.follow_cloak(piece.color, from, Some(to));
                    affected += 1;
                }
                Some(_) => {}
                None => {
                    self.board.take_piece(from);
                    self.follow_cloak(piece.color, from, None);
                    affected += 1;
                }
            }
        }

        self.en_passant = None;
        self.log
            .push(format!("King's push! {affected} enemies pushed away!"));
        let outcome = self.end_turn();
        Ok(AreaPushOutcome { affected, outcome })
    }

    /// Hides `side`'s Hybrid on `square` from the opponent. Does not end the
    /// turn; a move is still owed.
    pub fn apply_cloak(&mut self, side: Color, square: Square) -> Result<(), MoveError> {
        self.check_ability(side, CLOAK_COST)?;
        if self.cloak_of(side).is_some() {
            return Err(MoveError::CloakAlreadyActive);
        }
        let is_own_hybrid = self
            .board
            .get_piece(square)
            .is_some_and(|p| p.piece_type == PieceType::Hybrid && p.color == side);
        if !is_own_hybrid {
            return Err(MoveError::NotAHybridPiece);
        }

        self.energy[side.index()] -= CLOAK_COST;
        self.cloaks[side.index()] = Some(Cloak {
            square,
            turns_remaining: CLOAK_TURNS,
        });
        self.log
            .push(format!("{} Hybrid vanishes into shadow!", side.name()));
        Ok(())
    }

    fn follow_cloak(&mut self, owner: Color, from: Square, to: Option<Square>) {
        let idx = owner.index();
        if self.cloaks[idx].is_some_and(|c| c.square == from) {
            match to {
                Some(square) => {
                    if let Some(cloak) = self.cloaks[idx].as_mut() {
                        cloak.square = square;
                    }
                }
                None => self.cloaks[idx] = None,
            }
        }
    }
}
