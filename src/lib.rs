pub mod arith;
pub mod bv;
pub mod config;
pub mod error;
pub mod model;
pub mod optimizer;
pub mod problem;
pub mod search;
pub mod tracker;

pub use error::{SlsError, SlsResult};
pub use optimizer::runner::{
    DefaultOptimizer, Direction, OptimizationOptions, OptimizationResult, Optimizer,
};
// cmd and reports are modules of the binary crate (main.rs).
