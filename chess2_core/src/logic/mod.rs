pub mod abilities;
pub mod board;
pub mod eval_constants;
pub mod executor;
pub mod game;
pub mod generator;
pub mod rules;
pub mod turn;
pub mod view;
