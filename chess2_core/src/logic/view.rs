use crate::logic::board::{Board, Color, Square};
use crate::logic::game::{CastleRights, Cloak, GameState, GameStatus};
use serde::{Deserialize, Serialize};

/// Log lines included in a view.
pub const VIEW_LOG_LEN: usize = 30;

/// What one participant is allowed to see of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub board: Board,
    pub turn: Color,
    pub move_number: u32,
    pub energy: [u8; 2],
    pub status: GameStatus,
    pub game_over: bool,
    pub winner: Option<Color>,
    pub log: Vec<String>,
    /// The viewer's own active cloak; never the opponent's.
    pub own_cloak: Option<Cloak>,
    pub en_passant: Option<Square>,
    pub castle_rights: [CastleRights; 2],
    pub pending_promotion: Option<Square>,
}

impl GameState {
    /// Builds the view for `for_side`, or for a spectator when `None`.
    /// Cloaked Hybrids not belonging to the viewer are left off the board.
    pub fn current_view(&self, for_side: Option<Color>) -> GameView {
        let mut board = self.board.clone();
        for color in Color::ALL {
            if Some(color) == for_side {
                continue;
            }
            if let Some(cloak) = self.cloak_of(color) {
                board.set_piece(cloak.square, None);
            }
        }

        GameView {
            board,
            turn: self.turn,
            move_number: self.move_number,
            energy: self.energy,
            status: self.status,
            game_over: self.is_game_over(),
            winner: self.winner(),
            log: self.log.latest(VIEW_LOG_LEN),
            own_cloak: for_side.and_then(|side| self.cloak_of(side)),
            en_passant: self.en_passant,
            castle_rights: self.castle_rights,
            pending_promotion: self.pending_promotion,
        }
    }
}
