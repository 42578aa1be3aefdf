//! TUI module: Terminal User Interface using Ratatui.
//!
//! One screen that follows the session:
//! - Upload zone while nothing is selected
//! - Preview and status once a file is chosen
//! - Diagnostic report after a successful analysis

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::MedicalTheme;
pub use worker::{WorkerEvent, Workers};
