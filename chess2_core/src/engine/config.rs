use crate::logic::board::PieceType;
use crate::logic::eval_constants::{
    VAL_BISHOP, VAL_HYBRID, VAL_JUMPER, VAL_KING, VAL_KNIGHT, VAL_PAWN, VAL_QUEEN, VAL_ROOK,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_pawn: i32,
    pub val_knight: i32,
    pub val_bishop: i32,
    pub val_rook: i32,
    pub val_queen: i32,
    pub val_king: i32,
    pub val_jumper: i32,
    pub val_hybrid: i32,
    pub weight_mobility: i32,
    pub weight_energy: i32,
    pub check_bonus: i32,

    // Search Parameters
    pub mate_score: i32,
    pub score_capture_base: i32,
    pub search_depth: u8,
    pub node_budget: Option<u64>,
    pub time_ms: Option<u64>, // milliseconds
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_knight: VAL_KNIGHT,
            val_bishop: VAL_BISHOP,
            val_rook: VAL_ROOK,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,
            val_jumper: VAL_JUMPER,
            val_hybrid: VAL_HYBRID,
            weight_mobility: 3,
            weight_energy: 15,
            check_bonus: 30,

            mate_score: 1_000_000,
            score_capture_base: 100_000,
            search_depth: 3,
            node_budget: None,
            time_ms: None,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_knight: Option<f32>,
    val_bishop: Option<f32>,
    val_rook: Option<f32>,
    val_queen: Option<f32>,
    val_king: Option<f32>,
    val_jumper: Option<f32>,
    val_hybrid: Option<f32>,
    weight_mobility: Option<f32>,
    weight_energy: Option<f32>,
    check_bonus: Option<f32>,

    mate_score: Option<i32>,
    score_capture_base: Option<f32>,
    search_depth: Option<u8>,
    node_budget: Option<u64>,
    time_ms: Option<u64>,
}

impl EngineConfig {
    /// Values and weights in `json_str` are scale factors on the defaults;
    /// limits and the mate score are taken as given.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_knight: apply_scale(default.val_knight, json_config.val_knight),
            val_bishop: apply_scale(default.val_bishop, json_config.val_bishop),
            val_rook: apply_scale(default.val_rook, json_config.val_rook),
            val_queen: apply_scale(default.val_queen, json_config.val_queen),
            val_king: apply_scale(default.val_king, json_config.val_king),
            val_jumper: apply_scale(default.val_jumper, json_config.val_jumper),
            val_hybrid: apply_scale(default.val_hybrid, json_config.val_hybrid),
            weight_mobility: apply_scale(default.weight_mobility, json_config.weight_mobility),
            weight_energy: apply_scale(default.weight_energy, json_config.weight_energy),
            check_bonus: apply_scale(default.check_bonus, json_config.check_bonus),

            mate_score: json_config.mate_score.unwrap_or(default.mate_score),
            score_capture_base: apply_scale(
                default.score_capture_base,
                json_config.score_capture_base,
            ),
            search_depth: json_config.search_depth.unwrap_or(default.search_depth),
            node_budget: json_config.node_budget.or(default.node_budget),
            time_ms: json_config.time_ms.or(default.time_ms),
        })
    }

    pub const fn piece_value(&self, pt: PieceType) -> i32 {
        match pt {
            PieceType::Pawn => self.val_pawn,
            PieceType::Knight => self.val_knight,
            PieceType::Bishop => self.val_bishop,
            PieceType::Rook => self.val_rook,
            PieceType::Queen => self.val_queen,
            PieceType::King => self.val_king,
            PieceType::Jumper => self.val_jumper,
            PieceType::Hybrid => self.val_hybrid,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}
