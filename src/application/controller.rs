//! Application controller: the single source of truth for a screening
//! session.
//!
//! The controller never performs I/O. Operations that need the outside world
//! (reading the preview, calling the server) hand out a ticket; whoever runs
//! the work reports back through `apply_preview` / `apply_prediction`.
//!
//! Every selection and every reset advances a generation counter. Tickets
//! remember the generation they were issued under and completions from an
//! older generation are dropped, so a response that arrives after the user
//! moved on cannot overwrite newer state.

use crate::domain::{ImagePreview, PredictionResult, SelectedFile};
use crate::ports::PredictError;

/// Banner text when predict is requested with nothing selected.
pub const NO_SELECTION_ERROR: &str = "Please select an image first";

/// Everything the UI renders from.
#[derive(Debug, Default)]
pub struct ScreeningState {
    pub selected: Option<SelectedFile>,
    pub preview: Option<ImagePreview>,
    pub result: Option<PredictionResult>,
    pub in_flight: bool,
    pub error: Option<String>,
}

/// Work order for building a preview of a freshly selected file.
#[derive(Debug, Clone)]
pub struct PreviewTicket {
    pub generation: u64,
    pub file: SelectedFile,
}

/// Work order for one prediction request.
#[derive(Debug, Clone)]
pub struct PredictTicket {
    pub generation: u64,
    pub file: SelectedFile,
}

#[derive(Debug, Default)]
pub struct ScreeningController {
    state: ScreeningState,
    generation: u64,
}

impl ScreeningController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &ScreeningState {
        &self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take a validated file from the upload surface.
    ///
    /// The previous result, error and preview are cleared immediately; the
    /// new preview only appears once its ticket is completed. Any request
    /// still in flight becomes stale.
    pub fn on_image_select(&mut self, file: SelectedFile) -> PreviewTicket {
        self.generation += 1;
        self.state.selected = Some(file.clone());
        self.state.preview = None;
        self.state.result = None;
        self.state.error = None;
        self.state.in_flight = false;

        PreviewTicket {
            generation: self.generation,
            file,
        }
    }

    /// Store a finished preview. Returns `false` if the ticket was stale.
    pub fn apply_preview(&mut self, generation: u64, preview: ImagePreview) -> bool {
        if generation != self.generation || self.state.selected.is_none() {
            tracing::debug!(generation, current = self.generation, "Dropping stale preview");
            return false;
        }
        self.state.preview = Some(preview);
        true
    }

    /// Request a prediction for the selected file.
    ///
    /// With nothing selected this only sets the banner error. While a request
    /// is in flight it does nothing. Otherwise the in-flight flag is raised
    /// and the caller must send exactly one request for the returned ticket.
    pub fn on_predict(&mut self) -> Option<PredictTicket> {
        let Some(file) = self.state.selected.clone() else {
            self.state.error = Some(NO_SELECTION_ERROR.to_string());
            return None;
        };

        if self.state.in_flight {
            return None;
        }

        self.state.in_flight = true;
        self.state.error = None;

        Some(PredictTicket {
            generation: self.generation,
            file,
        })
    }

    /// Store the outcome of a prediction request. Returns `false` if the
    /// ticket was stale and nothing changed.
    pub fn apply_prediction(
        &mut self,
        generation: u64,
        outcome: Result<PredictionResult, PredictError>,
    ) -> bool {
        if generation != self.generation || !self.state.in_flight {
            tracing::debug!(generation, current = self.generation, "Dropping stale prediction");
            return false;
        }

        match outcome {
            Ok(result) => {
                self.state.result = Some(result);
                self.state.error = None;
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
            }
        }
        self.state.in_flight = false;
        true
    }

    /// Return to the initial state. Idempotent.
    pub fn on_reset(&mut self) {
        self.generation += 1;
        self.state = ScreeningState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Probabilities;
    use crate::ports::GENERIC_PREDICTION_ERROR;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/png", vec![1, 2, 3])
    }

    fn early_result() -> PredictionResult {
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

    fn is_empty(state: &ScreeningState) -> bool {
        state.selected.is_none()
            && state.preview.is_none()
            && state.result.is_none()
            && state.error.is_none()
            && !state.in_flight
    }

    #[test]
    fn test_predict_without_selection() {
        let mut controller = ScreeningController::new();
        assert!(controller.on_predict().is_none());
        assert_eq!(controller.state().error.as_deref(), Some(NO_SELECTION_ERROR));
        assert!(!controller.state().in_flight);
    }

    #[test]
    fn test_select_clears_synchronously_then_preview_arrives() {
        let mut controller = ScreeningController::new();
        controller.on_predict();
        assert!(controller.state().error.is_some());

        let ticket = controller.on_image_select(file("a.png"));
        assert!(controller.state().error.is_none());
        assert!(controller.state().result.is_none());
        assert!(controller.state().preview.is_none());

        let preview = ImagePreview::from_file(&ticket.file);
        assert!(controller.apply_preview(ticket.generation, preview));
        assert!(controller.state().preview.is_some());
    }

    #[test]
    fn test_successful_prediction() {
        let mut controller = ScreeningController::new();
        controller.on_image_select(file("a.png"));

        let ticket = controller.on_predict().expect("ticket issued");
        assert!(controller.state().in_flight);
        // Second press while in flight issues nothing.
        assert!(controller.on_predict().is_none());

        assert!(controller.apply_prediction(ticket.generation, Ok(early_result())));
        assert!(!controller.state().in_flight);
        assert_eq!(controller.state().result, Some(early_result()));
        assert!(controller.state().error.is_none());
    }

    #[test]
    fn test_failed_prediction_uses_server_message() {
        let mut controller = ScreeningController::new();
        controller.on_image_select(file("a.png"));
        let ticket = controller.on_predict().unwrap();

        controller.apply_prediction(
            ticket.generation,
            Err(PredictError::Rejected {
                status: 400,
                message: Some("Invalid image format".to_string()),
            }),
        );
        assert_eq!(controller.state().error.as_deref(), Some("Invalid image format"));
        assert!(!controller.state().in_flight);

        // Retry after failure is allowed; transport failure gets the fallback.
        let ticket = controller.on_predict().unwrap();
        controller.apply_prediction(
            ticket.generation,
            Err(PredictError::Transport("connection refused".to_string())),
        );
        assert_eq!(controller.state().error.as_deref(), Some(GENERIC_PREDICTION_ERROR));
        assert!(!controller.state().in_flight);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut controller = ScreeningController::new();
        controller.on_reset();
        assert!(is_empty(controller.state()));

        // error
        controller.on_predict();
        controller.on_reset();
        assert!(is_empty(controller.state()));

        // result
        let ticket = controller.on_image_select(file("a.png"));
        controller.apply_preview(ticket.generation, ImagePreview::from_file(&ticket.file));
        let ticket = controller.on_predict().unwrap();
        controller.apply_prediction(ticket.generation, Ok(early_result()));
        controller.on_reset();
        assert!(is_empty(controller.state()));

        // mid-flight
        controller.on_image_select(file("b.png"));
        controller.on_predict().unwrap();
        controller.on_reset();
        controller.on_reset();
        assert!(is_empty(controller.state()));
    }

    #[test]
    fn test_late_response_after_reset_is_dropped() {
        let mut controller = ScreeningController::new();
        controller.on_image_select(file("a.png"));
        let ticket = controller.on_predict().unwrap();

        controller.on_reset();
        assert!(!controller.apply_prediction(ticket.generation, Ok(early_result())));
        assert!(is_empty(controller.state()));
    }

    #[test]
    fn test_late_response_after_new_selection_is_dropped() {
        let mut controller = ScreeningController::new();
        let first = controller.on_image_select(file("a.png"));
        let stale = controller.on_predict().unwrap();

        let second = controller.on_image_select(file("b.png"));
        assert!(!controller.state().in_flight);

        assert!(!controller.apply_preview(first.generation, ImagePreview::from_file(&first.file)));
        assert!(!controller.apply_prediction(stale.generation, Ok(early_result())));
        assert!(controller.state().result.is_none());
        assert!(controller.state().preview.is_none());

        assert!(controller.apply_preview(second.generation, ImagePreview::from_file(&second.file)));
        let fresh = controller.on_predict().unwrap();
        assert_eq!(fresh.file.name, "b.png");
        assert!(controller.apply_prediction(fresh.generation, Ok(early_result())));
    }
}
