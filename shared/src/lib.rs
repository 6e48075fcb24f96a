use chess2_core::{
    engine::{Move, MoveKind},
    logic::board::{Color, PieceType},
    logic::view::GameView,
};
use serde::{Deserialize, Serialize};

/// Squares arrive as raw `[row, col]` pairs so that an off-board square is
/// reported back as a rule error instead of a dropped frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    CreateRoom {
        vs_ai: bool,
    },
    JoinRoom {
        room_id: String,
    },
    MakeMove {
        from: [u8; 2],
        to: [u8; 2],
        variant: Option<MoveKind>,
    },
    Promote {
        piece: PieceType,
    },
    AreaPush,
    Cloak {
        square: [u8; 2],
    },
    GetLegalMoves {
        square: [u8; 2],
    },
    NewGame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerMessage {
    RoomCreated {
        room_id: String,
        your_color: Color,
    },
    RoomJoined {
        room_id: String,
        your_color: Color,
    },
    Spectating {
        room_id: String,
    },
    OpponentJoined,
    State {
        view: Box<GameView>,
        your_color: Option<Color>, // None for spectators
    },
    LegalMoves {
        square: [u8; 2],
        moves: Vec<Move>,
    },
    ColorsSwapped {
        your_color: Color,
    },
    OpponentLeft,
    Error(String),
}
