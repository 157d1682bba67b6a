//! Signal generation module
//!
//! Pure detector functions plus the threshold evaluator that turns one
//! market snapshot into a trigger verdict

pub mod detectors;
mod trigger;

pub use trigger::{TriggerEvaluator, TriggerResult};
