use crate::game_manager::{session::Room, AppState, RoomHandle};
use chess2_core::{
    engine::{search::AlphaBetaEngine, MoveKind, Searcher},
    logic::{
        board::{Color, PieceType, Square},
        game::MoveOutcome,
        rules::MoveError,
    },
};
use shared::ServerMessage;

/// Rejects anyone but the player whose colour is to move.
fn require_turn(room: &Room, side: Option<Color>) -> Result<Color, MoveError> {
    if room.game.is_game_over() {
        return Err(MoveError::GameAlreadyOver);
    }
    match side {
        Some(color) if color == room.game.turn => Ok(color),
        _ => Err(MoveError::NotSidesTurn),
    }
}

impl AppState {
    /// Runs `apply` against the sender's room under the write lock. On success
    /// every member gets a fresh view and the engine replies if it is to move;
    /// on failure only the sender hears about it.
    async fn act<F>(&self, player_id: &str, action: &'static str, apply: F)
    where
        F: FnOnce(&mut Room, Option<Color>) -> Result<(), MoveError>,
    {
        let Some((room_id, handle)) = self.room_of(player_id) else {
            self.send_error(player_id, "You are not in a room");
            return;
        };

        {
            let mut room = handle.write().await;
            let side = room.color_of(player_id);
            if let Err(err) = apply(&mut *room, side) {
                tracing::debug!(player_id = %player_id, room_id = %room_id, action, error = %err, "Rejected");
                self.send_error(player_id, err.to_string());
                return;
            }
            self.broadcast_state(&room);
        }

        self.run_ai_turn(&room_id, handle).await;
    }

    pub async fn handle_move(
        &self,
        player_id: &str,
        from: [u8; 2],
        to: [u8; 2],
        variant: Option<MoveKind>,
    ) {
        self.act(player_id, "move", |room, side| {
            let from = Square::try_from(from)?;
            let to = Square::try_from(to)?;
            require_turn(room, side)?;
            let Room { game, rng, .. } = room;
            game.apply_move(from, to, variant, rng)?;
            Ok(())
        })
        .await;
    }

    pub async fn handle_promotion(&self, player_id: &str, piece: PieceType) {
        self.act(player_id, "promote", |room, side| {
            require_turn(room, side)?;
            room.game.apply_promotion(piece)?;
            Ok(())
        })
        .await;
    }

    pub async fn handle_area_push(&self, player_id: &str) {
        self.act(player_id, "area_push", |room, side| {
            let side = side.ok_or(MoveError::NotSidesTurn)?;
            room.game.apply_area_push(side)?;
            Ok(())
        })
        .await;
    }

    pub async fn handle_cloak(&self, player_id: &str, square: [u8; 2]) {
        self.act(player_id, "cloak", |room, side| {
            let square = Square::try_from(square)?;
            let side = side.ok_or(MoveError::NotSidesTurn)?;
            room.game.apply_cloak(side, square)
        })
        .await;
    }

    /// Destinations for the sender's own piece on their own turn; anything
    /// else gets an empty list.
    pub async fn handle_legal_moves(&self, player_id: &str, square: [u8; 2]) {
        let sq = match Square::try_from(square) {
            Ok(sq) => sq,
            Err(err) => {
                self.send_error(player_id, err.to_string());
                return;
            }
        };
        let Some((_, handle)) = self.room_of(player_id) else {
            self.send_error(player_id, "You are not in a room");
            return;
        };

        let moves = {
            let room = handle.read().await;
            let own_turn = require_turn(&room, room.color_of(player_id))
                .ok()
                .filter(|_| room.game.pending_promotion.is_none());
            match (own_turn, room.game.board.get_piece(sq)) {
                (Some(side), Some(piece)) if piece.color == side => room.game.legal_moves(sq),
                _ => Vec::new(),
            }
        };
        self.send_to(player_id, ServerMessage::LegalMoves { square, moves });
    }

    /// Plays the engine's reply when the engine holds the side to move.
    /// The search runs off the async workers on a copy of the position.
    pub async fn run_ai_turn(&self, room_id: &str, handle: RoomHandle) {
        let (position, side) = {
            let room = handle.read().await;
            if !room.is_ai_turn() {
                return;
            }
            (room.game.clone(), room.game.turn)
        };
        let played_at = position.move_number;
        let config = self.engine_config.clone();

        let searched = tokio::task::spawn_blocking(move || {
            let mut engine = AlphaBetaEngine::new(config);
            let limit = engine.default_limit();
            engine.search(&position, side, limit)
        })
        .await;

        let (mv, stats) = match searched {
            Ok(Some(found)) => found,
            Ok(None) => {
                tracing::warn!(room_id = %room_id, color = ?side, "Engine found no move");
                return;
            }
            Err(err) => {
                tracing::error!(room_id = %room_id, error = %err, "Engine task failed");
                return;
            }
        };

        let mut room = handle.write().await;
        if !room.is_ai_turn() || room.game.turn != side || room.game.move_number != played_at {
            tracing::debug!(room_id = %room_id, "Discarding stale engine move");
            return;
        }

        let Room { game, rng, .. } = &mut *room;
        let applied = match game.apply_move(mv.from, mv.to, Some(mv.kind), rng) {
            Ok(MoveOutcome::PromotionPending) => game.apply_promotion(PieceType::Queen).map(|_| ()),
            Ok(MoveOutcome::Applied(_)) => Ok(()),
            Err(err) => Err(err),
        };
        if let Err(err) = applied {
            tracing::warn!(room_id = %room_id, error = %err, "Engine move rejected");
            return;
        }

        tracing::info!(
            room_id = %room.id,
            color = ?side,
            depth = stats.depth,
            nodes = stats.nodes,
            score = stats.score,
            time_ms = stats.time_ms,
            "Engine played {} -> {}",
            mv.from,
            mv.to
        );
        self.broadcast_state(&room);
    }
}
