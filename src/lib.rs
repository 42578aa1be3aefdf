//! # amdscreen
//!
//! Terminal client for screening retinal fundus photographs for
//! Age-related Macular Degeneration (AMD).
//!
//! The user picks an image, the client uploads it to a prediction server and
//! renders the returned classification as a diagnostic report. No
//! classification happens locally and nothing is persisted.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core session types (selected file, prediction, server info)
//! - `ports`: Trait definition for the prediction server
//! - `adapters`: Concrete implementations (reqwest HTTP client, log sanitizing)
//! - `application`: Upload surface, controller, report model
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::Config;
pub use domain::{PredictionResult, SelectedFile, Severity};

/// Result type for amdscreen operations
pub type Result<T> = std::result::Result<T, AmdScreenError>;

/// Main error type for amdscreen
#[derive(Debug, thiserror::Error)]
pub enum AmdScreenError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
