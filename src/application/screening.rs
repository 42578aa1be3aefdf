//! Screening service: Orchestrates calls to the prediction server.
//!
//! Wraps a `PredictionClient` with the logging and probing the UI needs.
//! All calls block and are meant to run on worker threads.

use std::sync::Arc;
use std::time::Instant;

use crate::domain::{PredictionResult, SelectedFile, ServerStatus, ServerSummary};
use crate::ports::{PredictError, PredictionClient};

pub struct ScreeningService<P>
where
    P: PredictionClient,
{
    client: Arc<P>,
}

impl<P> ScreeningService<P>
where
    P: PredictionClient,
{
    pub fn new(client: Arc<P>) -> Self {
        Self { client }
    }

    /// Submit one image for classification.
    ///
    /// # Errors
    /// Returns the client error unchanged; the controller maps it to a
    /// banner message.
    pub fn predict(&self, file: &SelectedFile) -> Result<PredictionResult, PredictError> {
        tracing::info!(
            content_type = %file.content_type,
            size = file.size(),
            "Submitting image for prediction"
        );
        let started = Instant::now();

        match self.client.predict(file) {
            Ok(result) => {
                tracing::info!(
                    prediction = %result.prediction,
                    confidence = result.confidence,
                    severity = %result.severity(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Prediction complete"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Prediction failed"
                );
                Err(e)
            }
        }
    }

    /// Probe `/health` and, when reachable, `/api/model-info`.
    ///
    /// Never fails: problems are logged and reported as `Offline` or a
    /// missing model description.
    pub fn probe_server(&self) -> ServerSummary {
        let status = match self.client.health() {
            Ok(true) => ServerStatus::Online,
            Ok(false) => {
                tracing::warn!("Prediction server reports unhealthy");
                ServerStatus::Offline
            }
            Err(e) => {
                tracing::warn!(error = %e, "Prediction server health check failed");
                ServerStatus::Offline
            }
        };

        let model = if status == ServerStatus::Online {
            match self.client.model_info() {
                Ok(info) => {
                    tracing::info!(model = %info.summary(), loaded = info.model_loaded, "Model info");
                    Some(info)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Model info unavailable");
                    None
                }
            }
        } else {
            None
        };

        ServerSummary { status, model }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted `PredictionClient` for tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::domain::{ModelInfo, PredictionResult, Probabilities, SelectedFile};
    use crate::ports::{PredictError, PredictionClient};

    pub fn early_result() -> PredictionResult {
        PredictionResult {
            prediction: "Early AMD".to_string(),
            confidence: 0.82,
            probabilities: Probabilities::new(vec![
                ("Early AMD".to_string(), 0.82),
                ("Intermediate AMD".to_string(), 0.12),
                ("Late AMD".to_string(), 0.06),
            ]),
            amd_stage: "Early AMD".to_string(),
        }
    }

    pub struct FakeClient {
        pub outcome: Mutex<Result<PredictionResult, PredictError>>,
        pub healthy: Option<bool>,
        pub calls: AtomicUsize,
    }

    impl FakeClient {
        pub fn succeeding() -> Self {
            Self {
                outcome: Mutex::new(Ok(early_result())),
                healthy: Some(true),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(err: PredictError) -> Self {
            Self {
                outcome: Mutex::new(Err(err)),
                healthy: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PredictionClient for FakeClient {
        fn predict(&self, _file: &SelectedFile) -> Result<PredictionResult, PredictError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
                .lock()
                .map_err(|_| PredictError::Transport("poisoned".to_string()))?
                .clone()
        }

        fn health(&self) -> Result<bool, PredictError> {
            self.healthy
                .ok_or_else(|| PredictError::Transport("connection refused".to_string()))
        }

        fn model_info(&self) -> Result<ModelInfo, PredictError> {
            Ok(ModelInfo {
                model_loaded: true,
                model: "ResNet50".to_string(),
                version: "1.0".to_string(),
                ..ModelInfo::default()
            })
        }
    }
}
