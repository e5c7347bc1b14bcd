pub mod executor;
pub mod factory;

pub use executor::{BuildExecutor, BuildFailure, BuildReport};
pub use factory::EngineFactory;
