//! Application layer: the three cooperating components of a screening
//! session plus the service that talks to the server.
//!
//! - `upload`: validates selections and forwards files
//! - `controller`: owns session state
//! - `report`: derives what the result view shows
//! - `screening`: wraps the prediction client

pub mod controller;
pub mod report;
mod screening;
pub mod upload;

pub use controller::{PredictTicket, PreviewTicket, ScreeningController, ScreeningState};
pub use report::{DistributionBar, Report, MEDICAL_DISCLAIMER};
pub use screening::ScreeningService;
pub use upload::{SelectionSource, UploadRejection, UploadSurface};

#[cfg(test)]
pub(crate) use screening::testing;
