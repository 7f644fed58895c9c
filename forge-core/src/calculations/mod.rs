//! Sale calculations and recommendations.

pub mod common;
pub mod engine;
pub mod recommend;

pub use engine::CalculationEngine;
pub use recommend::recommend;
