//! Descriptive server payloads (`/health`, `/api/model-info`).

use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Body of `GET /api/model-info`.
///
/// Every field is optional on the wire; missing ones take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub model_loaded: bool,
    pub classes: Vec<String>,
    pub model: String,
    pub input_size: String,
    pub preprocessing: String,
    pub version: String,
}

impl ModelInfo {
    /// Short label for the header, e.g. `ResNet50 v1.0`.
    #[must_use]
    pub fn summary(&self) -> String {
        match (self.model.is_empty(), self.version.is_empty()) {
            (true, _) => "unknown model".to_string(),
            (false, true) => self.model.clone(),
            (false, false) => format!("{} v{}", self.model, self.version),
        }
    }
}

/// Reachability of the prediction server as last probed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServerStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

/// Everything the header knows about the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSummary {
    pub status: ServerStatus,
    pub model: Option<ModelInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_info_partial_payload() {
        let info: ModelInfo =
            serde_json::from_str(r#"{"model": "ResNet50", "version": "1.0", "model_loaded": true}"#)
                .unwrap();
        assert!(info.model_loaded);
        assert!(info.classes.is_empty());
        assert_eq!(info.summary(), "ResNet50 v1.0");
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_str(r#"{"status": "healthy"}"#).unwrap();
        assert!(health.is_healthy());
        let health: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!health.is_healthy());
    }
}
