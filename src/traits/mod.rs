pub mod build_engine;

pub use build_engine::{BuildEngine, BuildOutcome};
