use crate::logic::board::{Color, Square};
use crate::logic::game::GameState;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eval;
pub mod move_list;
pub mod search;

/// Which partner a king castles with. Jumper castles record the file the
/// Jumper stood on, since it need not sit in a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleKind {
    Kingside,
    Queenside,
    JumperHigh { jumper_col: u8 },
    JumperLow { jumper_col: u8 },
}

impl CastleKind {
    pub const fn partner_from_col(self) -> u8 {
        match self {
            Self::Kingside => 7,
            Self::Queenside => 0,
            Self::JumperHigh { jumper_col } | Self::JumperLow { jumper_col } => jumper_col,
        }
    }

    /// King travels toward the higher column.
    pub const fn is_high(self) -> bool {
        matches!(self, Self::Kingside | Self::JumperHigh { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveKind {
    #[default]
    Normal,
    EnPassant,
    Castle(CastleKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Normal,
        }
    }

    pub const fn with_kind(from: Square, to: Square, kind: MoveKind) -> Self {
        Self { from, to, kind }
    }
}

/// Bounds for one search. `depth` is always honoured; the node budget and the
/// wall clock are optional extra cut-offs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimit {
    pub depth: u8,
    pub node_budget: Option<u64>,
    pub time_ms: Option<u64>,
}

impl SearchLimit {
    pub const fn depth(depth: u8) -> Self {
        Self {
            depth,
            node_budget: None,
            time_ms: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
    pub score: i32,
    /// The search hit a budget, the clock or the stop flag before finishing.
    pub aborted: bool,
}

pub trait Evaluator {
    /// Score of `state` from `side`'s point of view.
    fn evaluate(&self, state: &GameState, side: Color) -> i32;
}

pub trait Searcher {
    fn search(
        &mut self,
        state: &GameState,
        side: Color,
        limit: SearchLimit,
    ) -> Option<(Move, SearchStats)>;
}
