//! Ports layer: Trait definitions for external operations.
//!
//! The prediction server is the only external system the client talks to.

mod predictor;

pub use predictor::{PredictError, PredictionClient, GENERIC_PREDICTION_ERROR};
