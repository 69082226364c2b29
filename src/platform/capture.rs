// Dasa Sandbox - platform/capture.rs
//
// Native screen capture through `xcap`.
//
// Architecture:
//   - `acquire` runs on the panel's acquire worker: enumerate monitors, pick
//     the primary (or the first), grab one frame. A denied or broken capture
//     surfaces right here as a `CaptureError`.
//   - Each stream has one video track backed by a frame-pump thread that
//     grabs a frame every `frame_interval` into a shared slot.
//   - The pump re-enumerates monitors on its own thread (monitor handles are
//     not guaranteed `Send`) and locates its monitor by id.
//   - The pump sleeps in short ticks and checks a stop flag on each.
//     `stop()` only raises the flag and detaches the thread; the pump exits
//     on its own within one tick, or right after an in-flight grab.
//   - Too many consecutive failed grabs mark the track ended; the panel
//     notices through `MediaTrack::is_live`.

use crate::core::capture::{CaptureBackend, CaptureRequest, CaptureStream, MediaTrack, TrackKind};
use crate::core::model::PixelBuffer;
use crate::util::constants;
use crate::util::error::CaptureError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use xcap::Monitor;

/// Screen capture backend for the local desktop.
#[derive(Debug, Clone)]
pub struct XcapBackend {
    frame_interval: Duration,
}

impl XcapBackend {
    pub fn new(frame_interval: Duration) -> Self {
        Self { frame_interval }
    }
}

impl Default for XcapBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(constants::DEFAULT_FRAME_INTERVAL_MS))
    }
}

impl CaptureBackend for XcapBackend {
    fn acquire(&mut self, request: &CaptureRequest) -> Result<CaptureStream, CaptureError> {
        if request.audio {
            return Err(CaptureError::Unsupported {
                reason: "system audio capture is not available on this platform".to_string(),
            });
        }
        if !request.video {
            return Err(CaptureError::Unsupported {
                reason: "at least one of video or audio must be requested".to_string(),
            });
        }

        let monitors = Monitor::all().map_err(|e| classify(&e.to_string()))?;
        tracing::debug!(count = monitors.len(), "Monitors enumerated");

        let monitor = monitors
            .iter()
            .find(|m| m.is_primary())
            .or_else(|| monitors.first())
            .ok_or(CaptureError::NoSource)?;

        let first = monitor
            .capture_image()
            .map_err(|e| classify(&e.to_string()))?;
        let (width, height) = first.dimensions();
        let frame = PixelBuffer::from_rgba(width, height, first.into_raw());

        let track = MonitorTrack::spawn(
            monitor.id(),
            monitor.name().to_string(),
            frame,
            self.frame_interval,
        );

        tracing::info!(
            monitor = monitor.name(),
            width,
            height,
            interval_ms = self.frame_interval.as_millis() as u64,
            "Capture track started"
        );

        Ok(CaptureStream::new(vec![Box::new(track)]))
    }
}

/// Map a platform error message onto the capture taxonomy.
///
/// Platforms report a refused permission only through the message text.
fn classify(message: &str) -> CaptureError {
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not allowed") {
        CaptureError::Denied {
            message: message.to_string(),
        }
    } else {
        CaptureError::Backend {
            message: message.to_string(),
        }
    }
}

/// State shared between a track and its pump thread.
#[derive(Debug, Default)]
struct PumpShared {
    stop: AtomicBool,
    live: AtomicBool,
    frame: Mutex<Option<PixelBuffer>>,
}

/// Video track of one monitor.
struct MonitorTrack {
    label: String,
    shared: Arc<PumpShared>,
    /// Kept only to tell whether a pump was started; never joined.
    pump: Option<JoinHandle<()>>,
}

impl MonitorTrack {
    fn spawn(
        monitor_id: u32,
        label: String,
        first_frame: Option<PixelBuffer>,
        interval: Duration,
    ) -> Self {
        let shared = Arc::new(PumpShared {
            stop: AtomicBool::new(false),
            live: AtomicBool::new(true),
            frame: Mutex::new(first_frame),
        });

        let pump_shared = Arc::clone(&shared);
        let pump = std::thread::Builder::new()
            .name(format!("capture-{monitor_id}"))
            .spawn(move || run_pump(monitor_id, interval, pump_shared));

        let pump = match pump {
            Ok(handle) => Some(handle),
            Err(e) => {
                // Without a pump the first frame stays as a still preview.
                tracing::warn!(error = %e, "Could not start capture pump thread");
                None
            }
        };

        Self {
            label,
            shared,
            pump,
        }
    }
}

impl MediaTrack for MonitorTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&mut self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        self.shared.live.store(false, Ordering::SeqCst);
        if self.pump.take().is_some() {
            tracing::debug!(monitor = %self.label, "Capture pump told to stop");
        }
    }

    fn is_live(&self) -> bool {
        self.shared.live.load(Ordering::SeqCst)
    }

    fn latest_frame(&self) -> Option<PixelBuffer> {
        self.shared.frame.lock().ok().and_then(|slot| slot.clone())
    }
}

impl Drop for MonitorTrack {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Pump body: grab, publish, sleep until the next tick or a stop request.
fn run_pump(monitor_id: u32, interval: Duration, shared: Arc<PumpShared>) {
    let tick = Duration::from_millis(constants::CAPTURE_STOP_CHECK_INTERVAL_MS);
    let mut failures = 0u32;

    loop {
        let wake_at = Instant::now() + interval;
        while Instant::now() < wake_at {
            if shared.stop.load(Ordering::SeqCst) {
                return;
            }
            std::thread::sleep(tick.min(wake_at.saturating_duration_since(Instant::now())));
        }
        if shared.stop.load(Ordering::SeqCst) {
            return;
        }

        let grabbed = grab(monitor_id);
        if shared.stop.load(Ordering::SeqCst) {
            return;
        }
        match grabbed {
            Ok(frame) => {
                failures = 0;
                if let Ok(mut slot) = shared.frame.lock() {
                    *slot = Some(frame);
                }
            }
            Err(e) => {
                failures += 1;
                tracing::debug!(monitor_id, failures, error = %e, "Frame grab failed");
                if failures >= constants::MAX_CONSECUTIVE_CAPTURE_FAILURES {
                    tracing::warn!(monitor_id, "Capture source stopped producing frames");
                    shared.live.store(false, Ordering::SeqCst);
                    return;
                }
            }
        }
    }
}

/// Capture one frame from the monitor with `monitor_id`.
fn grab(monitor_id: u32) -> Result<PixelBuffer, CaptureError> {
    let monitors = Monitor::all().map_err(|e| classify(&e.to_string()))?;
    let monitor = monitors
        .into_iter()
        .find(|m| m.id() == monitor_id)
        .ok_or(CaptureError::NoSource)?;
    let image = monitor
        .capture_image()
        .map_err(|e| classify(&e.to_string()))?;
    let (width, height) = image.dimensions();
    PixelBuffer::from_rgba(width, height, image.into_raw()).ok_or_else(|| CaptureError::Backend {
        message: format!("frame of {width}x{height} had an unexpected pixel layout"),
    })
}
