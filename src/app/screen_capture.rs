// Dasa Sandbox - app/screen_capture.rs
//
// Screen capture panel state: Idle -> Acquiring -> Sharing -> Idle.
//
// Acquisition can wait on the OS (permission prompts, a system source
// picker), so it runs on a worker thread:
//   - `start` moves the backend onto a worker and returns at once.
//   - The worker sends the backend back together with the acquire result.
//   - `poll` (UI thread, once per frame) receives it and writes the log line.
//   - If the panel is gone by then the send fails and the returned stream is
//     dropped on the worker, which stops its tracks.
//
// The panel owns the capture stream exclusively. Stopping releases it
// explicitly; unmounting the panel drops it, which stops every track.
//
// A source that ends out-of-band (monitor unplugged, OS revoked access) does
// not move the panel back to Idle. It is flagged through `source_ended` and
// the user still stops the share explicitly.

use crate::core::capture::{CaptureBackend, CaptureRequest, CaptureStream};
use crate::core::log::LogSink;
use crate::core::model::PixelBuffer;
use crate::util::error::CaptureError;
use std::sync::mpsc::{self, TryRecvError};

/// Observable state of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Acquiring,
    Sharing,
}

/// What the acquire worker sends back: the backend, and what it produced.
type Acquired = (Box<dyn CaptureBackend>, Result<CaptureStream, CaptureError>);

/// State of one mounted screen capture panel.
pub struct ScreenCapturePanel {
    /// `None` while the backend is out on the acquire worker.
    backend: Option<Box<dyn CaptureBackend>>,
    pending: Option<mpsc::Receiver<Acquired>>,
    stream: Option<CaptureStream>,
    source_ended: bool,
}

impl ScreenCapturePanel {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend: Some(backend),
            pending: None,
            stream: None,
            source_ended: false,
        }
    }

    pub fn state(&self) -> CaptureState {
        if self.stream.is_some() {
            CaptureState::Sharing
        } else if self.pending.is_some() {
            CaptureState::Acquiring
        } else {
            CaptureState::Idle
        }
    }

    pub fn is_sharing(&self) -> bool {
        self.stream.is_some()
    }

    pub fn is_acquiring(&self) -> bool {
        self.pending.is_some()
    }

    /// `true` once a track of the held stream ended without a Stop.
    pub fn source_ended(&self) -> bool {
        self.source_ended
    }

    /// Label of the captured source, while sharing.
    pub fn source_label(&self) -> Option<&str> {
        self.stream.as_ref().and_then(|s| s.video_label())
    }

    /// Latest preview frame, while sharing.
    pub fn preview_frame(&self) -> Option<PixelBuffer> {
        self.stream.as_ref().and_then(|s| s.latest_video_frame())
    }

    /// Idle -> Acquiring. The outcome is logged by `poll` once it arrives.
    /// Ignored while acquiring or sharing.
    pub fn start(&mut self, log: &mut dyn LogSink) {
        if self.stream.is_some() || self.pending.is_some() {
            return;
        }
        let Some(mut backend) = self.backend.take() else {
            log.error(format!("Error accessing screen: {}", worker_lost()));
            return;
        };

        let (tx, rx) = mpsc::channel::<Acquired>();
        std::thread::spawn(move || {
            let result = backend.acquire(&CaptureRequest::video_only());
            if let Err(mpsc::SendError((_, Ok(_)))) = tx.send((backend, result)) {
                tracing::debug!("Capture acquired after the panel closed; releasing it");
            }
        });

        self.pending = Some(rx);
        tracing::debug!("Screen share requested");
    }

    /// Sharing -> Idle. Stops every track and releases the stream.
    pub fn stop(&mut self, log: &mut dyn LogSink) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };
        stream.stop_all();
        drop(stream);
        self.source_ended = false;
        tracing::info!("Screen share stopped");
        log.info("Screen share stopped");
    }

    /// The single button: start when idle, stop when sharing.
    pub fn toggle(&mut self, log: &mut dyn LogSink) {
        match self.state() {
            CaptureState::Idle => self.start(log),
            CaptureState::Sharing => self.stop(log),
            CaptureState::Acquiring => {}
        }
    }

    /// Per-frame housekeeping: deliver a finished acquisition and notice a
    /// source that ended on its own. Never blocks.
    pub fn poll(&mut self, log: &mut dyn LogSink) {
        if let Some(rx) = &self.pending {
            match rx.try_recv() {
                Ok((backend, result)) => {
                    self.pending = None;
                    self.backend = Some(backend);
                    self.settle(result, log);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.pending = None;
                    tracing::error!("Capture acquire worker exited without a result");
                    log.error(format!("Error accessing screen: {}", worker_lost()));
                }
            }
        }

        if self.source_ended {
            return;
        }
        if let Some(stream) = &self.stream {
            if stream.has_ended_track() {
                self.source_ended = true;
                tracing::warn!(
                    "Capture source ended outside the sandbox; panel stays in Sharing until stopped"
                );
            }
        }
    }

    fn settle(&mut self, result: Result<CaptureStream, CaptureError>, log: &mut dyn LogSink) {
        match result {
            Ok(stream) => {
                tracing::info!(source = stream.video_label().unwrap_or("?"), "Screen share started");
                self.stream = Some(stream);
                self.source_ended = false;
                log.success("Screen share started successfully");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Screen share could not be started");
                log.error(format!("Error accessing screen: {e}"));
            }
        }
    }
}

fn worker_lost() -> CaptureError {
    CaptureError::Backend {
        message: "screen capture is no longer available".to_string(),
    }
}
