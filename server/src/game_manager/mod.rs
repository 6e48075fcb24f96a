use crate::config::ServerConfig;
use chess2_core::engine::config::EngineConfig;
use dashmap::DashMap;
use shared::{ClientMessage, ServerMessage};
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod lifecycle;
pub mod move_handler;
pub mod session;

pub use session::{Player, Room, Tx};

pub type RoomHandle = Arc<RwLock<Room>>;

/// Tuning from the `ENGINE_CONFIG` file when it loads, defaults otherwise.
/// `AI_DEPTH` always sets the search depth.
fn load_engine_config(config: &ServerConfig) -> EngineConfig {
    let loaded = config.engine_config.as_ref().and_then(|path| {
        let parsed = std::fs::read_to_string(path)
            .map_err(|err| err.to_string())
            .and_then(|json| EngineConfig::load_from_json(&json).map_err(|err| err.to_string()));
        match parsed {
            Ok(engine_config) => {
                tracing::info!(path = %path.display(), "Loaded engine config");
                Some(engine_config)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Engine config ignored");
                None
            }
        }
    });
    EngineConfig {
        search_depth: config.ai_depth,
        ..loaded.unwrap_or_default()
    }
}

pub struct AppState {
    pub config: ServerConfig,
    pub engine_config: Arc<EngineConfig>,
    pub players: DashMap<String, Player>,
    pub rooms: DashMap<String, RoomHandle>,
    pub player_to_room: DashMap<String, String>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let engine_config = load_engine_config(&config);
        Self {
            config,
            engine_config: Arc::new(engine_config),
            players: DashMap::new(),
            rooms: DashMap::new(),
            player_to_room: DashMap::new(),
        }
    }

    pub fn check_rate_limit(&self, player_id: &str) -> bool {
        use std::time::Instant;
        if let Some(mut player) = self.players.get_mut(player_id) {
            let now = Instant::now();
            let elapsed = now.duration_since(player.last_msg_at).as_secs_f32();
            if elapsed < 0.05 {
                // At most 20 messages per second
                return false;
            }
            player.last_msg_at = now;
            true
        } else {
            false
        }
    }

    pub async fn handle_message(&self, player_id: &str, msg: ClientMessage) {
        match msg {
            ClientMessage::CreateRoom { vs_ai } => self.create_room(player_id, vs_ai).await,
            ClientMessage::JoinRoom { room_id } => self.join_room(player_id, &room_id).await,
            ClientMessage::MakeMove { from, to, variant } => {
                self.handle_move(player_id, from, to, variant).await;
            }
            ClientMessage::Promote { piece } => self.handle_promotion(player_id, piece).await,
            ClientMessage::AreaPush => self.handle_area_push(player_id).await,
            ClientMessage::Cloak { square } => self.handle_cloak(player_id, square).await,
            ClientMessage::GetLegalMoves { square } => {
                self.handle_legal_moves(player_id, square).await;
            }
            ClientMessage::NewGame => self.new_game(player_id).await,
        }
    }

    /// Room the player currently belongs to, seated or spectating.
    pub fn room_of(&self, player_id: &str) -> Option<(String, RoomHandle)> {
        let room_id = self.player_to_room.get(player_id)?.value().clone();
        let handle = self.rooms.get(&room_id)?.value().clone();
        Some((room_id, handle))
    }

    pub fn send_to(&self, player_id: &str, msg: ServerMessage) {
        if let Some(player) = self.players.get(player_id) {
            let _ = player.tx.send(msg);
        }
    }

    pub fn send_error(&self, player_id: &str, message: impl Into<String>) {
        self.send_to(player_id, ServerMessage::Error(message.into()));
    }

    /// Sends every member of the room the view their seat entitles them to.
    pub fn broadcast_state(&self, room: &Room) {
        for (id, color) in room.members() {
            self.send_to(id, room.state_message(color));
        }
    }
}
