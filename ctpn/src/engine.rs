mod config;
mod firing;
mod step;

pub use config::{EngineConfig, EngineConfigBuilder, EngineConfigBuilderError};
pub use firing::PetriNetEngine;
pub use step::StepResult;
