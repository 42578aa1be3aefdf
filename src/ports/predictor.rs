//! Prediction port: Trait for the remote classification service.
//!
//! The classifier itself lives behind `/api/predict` and is opaque to this
//! crate. This trait is the only seam the application depends on.

use crate::domain::{ModelInfo, PredictionResult, SelectedFile};

/// Fallback banner text when the server gives no usable error message.
pub const GENERIC_PREDICTION_ERROR: &str =
    "An error occurred during prediction. Please try again.";

/// Failure of a call to the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictError {
    /// Non-2xx response. `message` is the body's `error` field, if any.
    #[error("server responded with status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// 2xx response whose body is not the expected JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl PredictError {
    /// Message to show in the inline error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => GENERIC_PREDICTION_ERROR.to_string(),
        }
    }
}

/// Client for the remote prediction server.
///
/// Calls block; the TUI runs them on worker threads.
pub trait PredictionClient: Send + Sync {
    /// Submit one image for classification (`POST /api/predict`).
    ///
    /// # Errors
    /// Returns error on transport failure, non-2xx status or malformed body.
    fn predict(&self, file: &SelectedFile) -> Result<PredictionResult, PredictError>;

    /// Probe `GET /health`.
    ///
    /// # Errors
    /// Returns error if the server is unreachable or answers non-2xx.
    fn health(&self) -> Result<bool, PredictError>;

    /// Fetch `GET /api/model-info`.
    ///
    /// # Errors
    /// Returns error if the server is unreachable or the body is malformed.
    fn model_info(&self) -> Result<ModelInfo, PredictError>;
}
