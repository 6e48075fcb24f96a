use crate::engine::config::EngineConfig;
use crate::engine::eval::SimpleEvaluator;
use crate::engine::move_list::MoveList;
use crate::engine::{Evaluator, Move, MoveKind, SearchLimit, SearchStats, Searcher};
use crate::logic::board::{Color, PieceType};
use crate::logic::game::GameState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

const INF: i32 = i32::MAX / 2;

pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: SimpleEvaluator,
    nodes_searched: u64,
    start_time: Instant,
    node_budget: Option<u64>,
    time_limit_ms: Option<u64>,
    stop: Option<Arc<AtomicBool>>,
    aborted: bool,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: SimpleEvaluator::new(config.clone()),
            config,
            nodes_searched: 0,
            start_time: Instant::now(),
            node_budget: None,
            time_limit_ms: None,
            stop: None,
            aborted: false,
        }
    }

    /// Searches stop early once `flag` is raised from another thread.
    #[must_use]
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Limit built from the configured depth and budgets.
    pub fn default_limit(&self) -> SearchLimit {
        SearchLimit {
            depth: self.config.search_depth,
            node_budget: self.config.node_budget,
            time_ms: self.config.time_ms,
        }
    }

    /// Best move for `side` at `depth` plies with default tuning.
    pub fn best_move(state: &GameState, side: Color, depth: u8) -> Option<Move> {
        let mut engine = Self::new(Arc::new(EngineConfig::default()));
        engine
            .search(state, side, SearchLimit::depth(depth))
            .map(|(mv, _)| mv)
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start_time.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    #[allow(clippy::manual_is_multiple_of)]
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        let flagged = self
            .stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let over_budget = self
            .node_budget
            .is_some_and(|budget| self.nodes_searched > budget);
        let out_of_time = self.nodes_searched % 1024 == 0
            && self
                .time_limit_ms
                .is_some_and(|limit| self.elapsed_ms() > limit);

        if flagged || over_budget || out_of_time {
            self.aborted = true;
        }
        self.aborted
    }

    /// Mate score from the root's point of view when `loser` has been mated.
    /// Larger remaining depth means the mate happens sooner.
    fn mate_value(&self, loser: Color, root_side: Color, depth: u8) -> i32 {
        let value = self.config.mate_score + i32::from(depth);
        if loser == root_side {
            -value
        } else {
            value
        }
    }

    /// Legal moves of `color`, captures first by victim value.
    pub(crate) fn ordered_moves(&self, state: &GameState, color: Color) -> MoveList {
        let mut list = MoveList::new();
        for mv in state.all_legal_moves(color) {
            let victim = match mv.kind {
                MoveKind::EnPassant => Some(PieceType::Pawn),
                MoveKind::Castle(_) => None,
                MoveKind::Normal => state
                    .board
                    .get_piece(mv.to)
                    .filter(|p| p.color != color)
                    .map(|p| p.piece_type),
            };
            let score = victim.map_or(0, |pt| {
                self.config.score_capture_base + self.config.piece_value(pt)
            });
            list.push(mv, score);
        }
        list.sort_by_score_desc();
        list
    }

    /// Minimax with alpha-beta cut-offs over a scratch copy of the game.
    /// Scores are always from `root_side`'s point of view. `None` means the
    /// search was stopped and the value is unusable.
    fn alpha_beta(
        &mut self,
        state: &mut GameState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        root_side: Color,
    ) -> Option<i32> {
        self.nodes_searched += 1;
        if self.should_stop() {
            return None;
        }

        if depth == 0 {
            return Some(self.evaluator.evaluate(state, root_side));
        }

        let mover = state.turn;
        if state.board.find_king(mover).is_none() {
            log::warn!("{} has no king during search", mover.name());
            return Some(self.mate_value(mover, root_side, depth));
        }

        let moves = self.ordered_moves(state, mover);
        if moves.is_empty() {
            if state.is_in_check(mover) {
                return Some(self.mate_value(mover, root_side, depth));
            }
            return Some(0);
        }

        let mut best = if maximizing { -INF } else { INF };
        for scored in &moves {
            let snapshot = state.snapshot();
            state.apply_quiet(&scored.mv);
            state.turn = mover.opposite();
            let child = self.alpha_beta(state, depth - 1, alpha, beta, !maximizing, root_side);
            state.restore(snapshot);
            let score = child?;

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }
        Some(best)
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(
        &mut self,
        state: &GameState,
        side: Color,
        limit: SearchLimit,
    ) -> Option<(Move, SearchStats)> {
        if state.is_game_over() || state.pending_promotion.is_some() || state.turn != side {
            return None;
        }

        self.nodes_searched = 0;
        self.start_time = Instant::now();
        self.node_budget = limit.node_budget;
        self.time_limit_ms = limit.time_ms;
        self.aborted = false;

        let depth = limit.depth.max(1);
        let mut work = state.clone();
        let moves = self.ordered_moves(&work, side);
        let fallback = moves.first()?.mv;

        let mut best_move = None;
        let mut best_score = -INF;
        let mut alpha = -INF;

        for scored in &moves {
            let snapshot = work.snapshot();
            work.apply_quiet(&scored.mv);
            work.turn = side.opposite();
            let result = self.alpha_beta(&mut work, depth - 1, alpha, INF, false, side);
            work.restore(snapshot);

            let Some(score) = result else {
                break;
            };
            // Strict comparison keeps the first of equally good moves.
            if best_move.is_none() || score > best_score {
                best_score = score;
                best_move = Some(scored.mv);
            }
            alpha = alpha.max(best_score);
        }

        let stats = SearchStats {
            depth,
            nodes: self.nodes_searched,
            time_ms: self.elapsed_ms(),
            score: best_score,
            aborted: self.aborted,
        };
        let mv = best_move.unwrap_or(fallback);
        log::debug!(
            "search {}: {}->{} score {} depth {} nodes {} in {}ms{}",
            side.name(),
            mv.from,
            mv.to,
            stats.score,
            stats.depth,
            stats.nodes,
            stats.time_ms,
            if stats.aborted { " (aborted)" } else { "" }
        );
        Some((mv, stats))
    }
}
