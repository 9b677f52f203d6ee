pub mod decay;
pub mod engine;
pub mod quantize;

pub use engine::RiskEngine;
pub use quantize::{quantize, Color};
