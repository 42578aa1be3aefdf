//! Domain layer: Core types of a screening session.
//!
//! Plain data with no I/O. Everything here is transient and lives only for
//! the duration of one interaction.

mod selection;
mod prediction;
mod server;

pub use selection::{format_size, ImagePreview, SelectedFile, MAX_UPLOAD_BYTES};
pub use prediction::{
    PredictionResult, Probabilities, Severity, EARLY_STAGE, INTERMEDIATE_STAGE,
};
pub use server::{HealthStatus, ModelInfo, ServerStatus, ServerSummary};
