use crate::game_manager::{
    session::{Player, Room},
    AppState, Tx,
};
use chess2_core::logic::{board::Color, game::GameState};
use dashmap::mapref::entry::Entry;
use rand::Rng;
use shared::ServerMessage;
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;

fn generate_room_id() -> String {
    let bytes: [u8; 3] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl AppState {
    pub fn add_player(&self, id: String, tx: Tx) {
        use std::time::Instant;
        tracing::info!(player_id = %id, "Player connected");
        self.players.insert(
            id,
            Player {
                tx,
                last_msg_at: Instant::now(),
            },
        );
    }

    pub async fn remove_player(&self, id: &str) {
        tracing::info!(player_id = %id, "Player disconnected");
        self.leave_room(id).await;
        self.players.remove(id);
    }

    /// Takes the player out of their current room. Remaining members are told
    /// when a seat frees up, and a room with nobody left is dropped.
    pub async fn leave_room(&self, player_id: &str) {
        let Some((_, room_id)) = self.player_to_room.remove(player_id) else {
            return;
        };
        let Some(handle) = self.rooms.get(&room_id).map(|r| r.value().clone()) else {
            return;
        };

        let mut room = handle.write().await;
        if let Some(color) = room.vacate(player_id) {
            tracing::info!(player_id = %player_id, room_id = %room_id, color = ?color, "Player left seat");
            for (id, _) in room.members() {
                self.send_to(id, ServerMessage::OpponentLeft);
            }
        }
        let empty = room.is_empty();
        drop(room);

        if empty {
            self.rooms.remove(&room_id);
            tracing::info!(room_id = %room_id, "Removed empty room");
        }
    }

    pub async fn create_room(&self, player_id: &str, vs_ai: bool) {
        self.leave_room(player_id).await;

        let room_id = loop {
            let candidate = generate_room_id();
            if let Entry::Vacant(slot) = self.rooms.entry(candidate.clone()) {
                let room = Room::new(candidate.clone(), player_id.to_string(), vs_ai);
                slot.insert(Arc::new(RwLock::new(room)));
                break candidate;
            }
        };
        self.player_to_room
            .insert(player_id.to_string(), room_id.clone());
        tracing::info!(player_id = %player_id, room_id = %room_id, vs_ai, "Room created");

        self.send_to(
            player_id,
            ServerMessage::RoomCreated {
                room_id: room_id.clone(),
                your_color: Color::White,
            },
        );
        if let Some(handle) = self.rooms.get(&room_id).map(|r| r.value().clone()) {
            let room = handle.read().await;
            self.broadcast_state(&room);
        }
    }

    pub async fn join_room(&self, player_id: &str, room_id: &str) {
        let Some(handle) = self.rooms.get(room_id).map(|r| r.value().clone()) else {
            self.send_error(player_id, "Room not found");
            return;
        };

        let already_here = self
            .player_to_room
            .get(player_id)
            .is_some_and(|current| current.value() == room_id);
        if already_here {
            let room = handle.read().await;
            self.send_to(player_id, room.state_message(room.color_of(player_id)));
            return;
        }
        self.leave_room(player_id).await;

        let mut room = handle.write().await;
        self.player_to_room
            .insert(player_id.to_string(), room_id.to_string());

        match room.take_seat(player_id) {
            Some(color) => {
                tracing::info!(player_id = %player_id, room_id = %room_id, color = ?color, "Player joined room");
                for (id, _) in room.members() {
                    if id != player_id {
                        self.send_to(id, ServerMessage::OpponentJoined);
                    }
                }
                self.send_to(
                    player_id,
                    ServerMessage::RoomJoined {
                        room_id: room_id.to_string(),
                        your_color: color,
                    },
                );
            }
            None => {
                tracing::info!(player_id = %player_id, room_id = %room_id, "Player is spectating");
                room.spectators.push(player_id.to_string());
                self.send_to(
                    player_id,
                    ServerMessage::Spectating {
                        room_id: room_id.to_string(),
                    },
                );
            }
        }
        self.broadcast_state(&room);
    }

    /// Starts a rematch with colours swapped. Only seated players may ask, and
    /// only once the current game has finished.
    pub async fn new_game(&self, player_id: &str) {
        let Some((room_id, handle)) = self.room_of(player_id) else {
            self.send_error(player_id, "You are not in a room");
            return;
        };

        {
            let mut room = handle.write().await;
            if room.color_of(player_id).is_none() {
                self.send_error(player_id, "Spectators cannot start a new game");
                return;
            }
            if !room.game.is_game_over() {
                self.send_error(player_id, "The current game is still in progress");
                return;
            }

            room.swap_colors();
            room.game = GameState::new();
            room.game.log.push("New game! Colors swapped.");
            tracing::info!(room_id = %room_id, "New game started with colors swapped");

            for (id, color) in room.members() {
                if let Some(your_color) = color {
                    self.send_to(id, ServerMessage::ColorsSwapped { your_color });
                }
            }
            self.broadcast_state(&room);
        }

        self.run_ai_turn(&room_id, handle).await;
    }

    /// Drops every room older than the configured TTL and returns how many went.
    pub async fn evict_expired_rooms(&self) -> usize {
        let ttl = self.config.room_ttl;
        let rooms: Vec<_> = self
            .rooms
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut evicted = 0;
        for (room_id, handle) in rooms {
            let room = handle.read().await;
            if room.created_at.elapsed() < ttl {
                continue;
            }
            let members: Vec<String> = room.members().map(|(id, _)| id.to_string()).collect();
            drop(room);

            tracing::info!(room_id = %room_id, "Cleaning up expired room");
            self.rooms.remove(&room_id);
            for id in members {
                self.player_to_room.remove_if(&id, |_, current| *current == room_id);
            }
            evicted += 1;
        }
        evicted
    }

    pub fn spawn_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            // `interval` panics on a zero period.
            let period = self.config.cleanup_interval.max(Duration::from_secs(1));
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let evicted = self.evict_expired_rooms().await;
                if evicted > 0 {
                    tracing::info!(evicted, remaining = self.rooms.len(), "Room cleanup finished");
                }
            }
        });
    }
}
