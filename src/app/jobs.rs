// Dasa Sandbox - app/jobs.rs
//
// Background execution of AI tool requests. Each request runs on its own
// worker thread and reports back over an mpsc channel which the UI thread
// drains every frame.
//
// Architecture:
//   - `JobManager` lives on the UI thread; `run_job` runs on a worker thread.
//   - Every job gets a ticket. Only the ticket in `active` is delivered;
//     anything else settled after the user moved on and is dropped.
//   - There is no cancellation: an abandoned worker runs to completion and
//     its send either lands in the channel (and is discarded on poll) or
//     fails because the manager was dropped. Neither is an error.

use crate::core::tools::{self, AiService, ToolOutput, ToolRequest};
use crate::util::error::ServiceError;
use std::sync::{mpsc, Arc};

/// A settled request as delivered to the panel.
#[derive(Debug)]
pub struct JobOutcome {
    pub ticket: u64,
    pub request: ToolRequest,
    pub result: Result<ToolOutput, ServiceError>,
}

/// Runs AI requests off the UI thread.
pub struct JobManager {
    service: Arc<dyn AiService>,
    tx: mpsc::Sender<JobOutcome>,
    rx: mpsc::Receiver<JobOutcome>,
    next_ticket: u64,
    active: Option<u64>,
}

impl JobManager {
    pub fn new(service: Arc<dyn AiService>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            service,
            tx,
            rx,
            next_ticket: 1,
            active: None,
        }
    }

    /// Start `request` on a worker thread and make it the active job.
    /// Any previously active job is abandoned.
    pub fn start(&mut self, request: ToolRequest) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.active = Some(ticket);

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let kind = request.kind();

        std::thread::spawn(move || run_job(ticket, request, service, tx));

        tracing::info!(ticket, tool = kind.id(), "AI job started");
        ticket
    }

    /// Forget the active job. Its result will be discarded when it arrives.
    pub fn abandon(&mut self) {
        if let Some(ticket) = self.active.take() {
            tracing::debug!(ticket, "AI job abandoned");
        }
    }

    /// Whether a job is outstanding.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Poll without blocking. Returns the active job's outcome once it has
    /// settled; outcomes of abandoned jobs are drained and dropped.
    pub fn poll(&mut self) -> Option<JobOutcome> {
        while let Ok(outcome) = self.rx.try_recv() {
            if Some(outcome.ticket) == self.active {
                self.active = None;
                return Some(outcome);
            }
            tracing::debug!(
                ticket = outcome.ticket,
                tool = outcome.request.kind().id(),
                "Discarding result of abandoned AI job"
            );
        }
        None
    }
}

/// Worker body: exactly one service call, then one send.
fn run_job(
    ticket: u64,
    request: ToolRequest,
    service: Arc<dyn AiService>,
    tx: mpsc::Sender<JobOutcome>,
) {
    let result = tools::dispatch(service.as_ref(), &request);

    match &result {
        Ok(_) => tracing::info!(ticket, tool = request.kind().id(), "AI job succeeded"),
        Err(e) => tracing::warn!(ticket, tool = request.kind().id(), error = %e, "AI job failed"),
    }

    // Receiver dropped (panel unmounted); the result has nowhere to go.
    let _ = tx.send(JobOutcome {
        ticket,
        request,
        result,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{GeneratedImage, ImageInput};
    use crate::core::tools::{ToolKind, TranslationLanguages};
    use std::time::{Duration, Instant};

    struct Echo;

    impl AiService for Echo {
        fn extract_text(&self, _image: &ImageInput) -> Result<String, ServiceError> {
            Ok("ocr".to_string())
        }
        fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, ServiceError> {
            Err(ServiceError::EmptyResult {
                operation: "text-to-image",
            })
        }
        fn summarize(&self, text: &str) -> Result<String, ServiceError> {
            Ok(format!("summary of {text}"))
        }
        fn translate(&self, text: &str, _s: &str, _t: &str) -> Result<String, ServiceError> {
            Ok(text.to_uppercase())
        }
    }

    fn wait_for(manager: &mut JobManager) -> Option<JobOutcome> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(outcome) = manager.poll() {
                return Some(outcome);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    fn request(kind: ToolKind, text: &str) -> ToolRequest {
        ToolRequest::build(kind, text, None, &TranslationLanguages::default()).unwrap()
    }

    #[test]
    fn test_active_job_is_delivered_once() {
        let mut jobs = JobManager::new(Arc::new(Echo));
        let ticket = jobs.start(request(ToolKind::Summarize, "abc"));
        assert!(jobs.is_busy());

        let outcome = wait_for(&mut jobs).expect("job should settle");
        assert_eq!(outcome.ticket, ticket);
        assert!(
            matches!(outcome.result, Ok(ToolOutput::Text(ref t)) if t == "summary of abc"),
            "unexpected result {:?}",
            outcome.result
        );
        assert!(!jobs.is_busy());
        assert!(jobs.poll().is_none());
    }

    #[test]
    fn test_abandoned_job_is_discarded() {
        let mut jobs = JobManager::new(Arc::new(Echo));
        jobs.start(request(ToolKind::Translate, "stale"));
        jobs.abandon();
        let fresh = jobs.start(request(ToolKind::Summarize, "fresh"));

        let outcome = wait_for(&mut jobs).expect("fresh job should settle");
        assert_eq!(outcome.ticket, fresh);
        assert_eq!(outcome.request.kind(), ToolKind::Summarize);
    }

    #[test]
    fn test_dropping_manager_with_job_in_flight_is_quiet() {
        let mut jobs = JobManager::new(Arc::new(Echo));
        jobs.start(request(ToolKind::Summarize, "bye"));
        drop(jobs);
        // Give the worker time to hit the closed channel.
        std::thread::sleep(Duration::from_millis(50));
    }
}
