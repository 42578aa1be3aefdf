//! Background workers for the two blocking operations of a session.
//!
//! Preview encoding and prediction requests run on their own threads so the
//! TUI loop stays responsive. Workers never touch session state: they send a
//! `WorkerEvent` tagged with the ticket generation and the app applies it
//! through the controller, which drops stale completions.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::application::{PredictTicket, PreviewTicket, ScreeningService};
use crate::domain::{ImagePreview, PredictionResult, ServerSummary};
use crate::ports::{PredictError, PredictionClient};

/// Completion reported by a worker thread.
#[derive(Debug)]
pub enum WorkerEvent {
    /// Preview for the selection issued under `generation`
    PreviewReady {
        generation: u64,
        preview: ImagePreview,
    },
    /// Outcome of the request issued under `generation`
    PredictionFinished {
        generation: u64,
        outcome: Result<PredictionResult, PredictError>,
    },
    /// Result of the startup server probe
    ServerProbed(ServerSummary),
}

/// Spawns workers and collects their events on one channel.
pub struct Workers<P>
where
    P: PredictionClient + 'static,
{
    service: Arc<ScreeningService<P>>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
}

impl<P> Workers<P>
where
    P: PredictionClient + 'static,
{
    pub fn new(service: Arc<ScreeningService<P>>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { service, tx, rx }
    }

    /// Encode the preview for a fresh selection.
    pub fn spawn_preview(&self, ticket: PreviewTicket) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            let preview = ImagePreview::from_file(&ticket.file);
            tracing::debug!(generation = ticket.generation, ?preview, "Preview ready");
            let _ = tx.send(WorkerEvent::PreviewReady {
                generation: ticket.generation,
                preview,
            });
        });
    }

    /// Send one prediction request.
    pub fn spawn_prediction(&self, ticket: PredictTicket) {
        let tx = self.tx.clone();
        let service = Arc::clone(&self.service);
        thread::spawn(move || {
            let outcome = service.predict(&ticket.file);
            let _ = tx.send(WorkerEvent::PredictionFinished {
                generation: ticket.generation,
                outcome,
            });
        });
    }

    /// Probe server health and model info.
    pub fn spawn_probe(&self) {
        let tx = self.tx.clone();
        let service = Arc::clone(&self.service);
        thread::spawn(move || {
            let _ = tx.send(WorkerEvent::ServerProbed(service.probe_server()));
        });
    }

    /// Next pending event, if any (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event.
    #[cfg(test)]
    pub(crate) fn recv_timeout(&self, timeout: std::time::Duration) -> Option<WorkerEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}
