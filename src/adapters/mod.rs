//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: `reqwest` client for the prediction server
//! - `sanitize`: payload/credential filtering for logs

pub mod http;
pub mod sanitize;

pub use http::HttpPredictionClient;
