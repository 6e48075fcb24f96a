use chess2_core::logic::{board::Color, game::GameState};
use rand::{rngs::StdRng, SeedableRng};
use shared::ServerMessage;
use tokio::sync::mpsc;

use std::time::Instant;

pub type Tx = mpsc::UnboundedSender<ServerMessage>;

pub struct Player {
    pub tx: Tx,
    pub last_msg_at: Instant,
}

pub struct Room {
    pub id: String,
    pub game: GameState,
    /// Source of duel rolls for this room's captures.
    pub rng: StdRng,
    pub white: Option<String>,
    pub black: Option<String>,
    pub spectators: Vec<String>,
    /// Colour played by the engine, if any.
    pub ai: Option<Color>,
    pub created_at: Instant,
}

impl Room {
    /// A fresh room with `creator` on White and, optionally, the engine on Black.
    pub fn new(id: String, creator: String, vs_ai: bool) -> Self {
        Self {
            id,
            game: GameState::new(),
            rng: StdRng::from_entropy(),
            white: Some(creator),
            black: None,
            spectators: Vec::new(),
            ai: vs_ai.then_some(Color::Black),
            created_at: Instant::now(),
        }
    }

    pub fn seat(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white.as_deref(),
            Color::Black => self.black.as_deref(),
        }
    }

    fn seat_mut(&mut self, color: Color) -> &mut Option<String> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    pub fn color_of(&self, player_id: &str) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.seat(color) == Some(player_id))
    }

    /// A seat is open when neither a human nor the engine holds it.
    pub fn is_open(&self, color: Color) -> bool {
        self.seat(color).is_none() && self.ai != Some(color)
    }

    /// Seats `player_id` on the first open colour, Black before White.
    pub fn take_seat(&mut self, player_id: &str) -> Option<Color> {
        let color = [Color::Black, Color::White]
            .into_iter()
            .find(|&color| self.is_open(color))?;
        *self.seat_mut(color) = Some(player_id.to_string());
        Some(color)
    }

    /// Removes the player from the room and returns the seat they held.
    pub fn vacate(&mut self, player_id: &str) -> Option<Color> {
        self.spectators.retain(|id| id != player_id);
        let color = self.color_of(player_id)?;
        *self.seat_mut(color) = None;
        Some(color)
    }

    /// Swaps the humans and the engine between colours.
    pub fn swap_colors(&mut self) {
        std::mem::swap(&mut self.white, &mut self.black);
        self.ai = self.ai.map(Color::opposite);
    }

    pub fn is_empty(&self) -> bool {
        self.white.is_none() && self.black.is_none() && self.spectators.is_empty()
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.game.is_game_over()
            && self.game.pending_promotion.is_none()
            && self.ai == Some(self.game.turn)
    }

    /// Every human in the room with the colour they play; spectators get `None`.
    pub fn members(&self) -> impl Iterator<Item = (&str, Option<Color>)> + '_ {
        Color::ALL
            .into_iter()
            .filter_map(|color| self.seat(color).map(|id| (id, Some(color))))
            .chain(self.spectators.iter().map(|id| (id.as_str(), None)))
    }

    pub fn state_message(&self, viewer: Option<Color>) -> ServerMessage {
        ServerMessage::State {
            view: Box::new(self.game.current_view(viewer)),
            your_color: viewer,
        }
    }
}
