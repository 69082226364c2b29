// Dasa Sandbox - core/capture.rs
//
// Screen capture capability: a backend hands out a `CaptureStream` made of
// stoppable tracks. The screen capture panel only talks to these traits, so
// it can be exercised with a fake backend.
//
// Resource rule: a stream stops all of its tracks when dropped. Whoever holds
// the stream holds the capture; releasing the value releases the hardware.

use crate::core::model::PixelBuffer;
use crate::util::error::CaptureError;

/// What the caller wants captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub video: bool,
    pub audio: bool,
}

impl CaptureRequest {
    /// Video only, the request the screen capture panel makes.
    pub fn video_only() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }
}

/// Media type of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

/// One track of a capture stream.
pub trait MediaTrack: Send {
    fn kind(&self) -> TrackKind;

    /// Human-readable source name (monitor name, device label).
    fn label(&self) -> &str;

    /// Stop producing media. Idempotent.
    fn stop(&mut self);

    /// `false` once stopped, or once the source ended on its own.
    fn is_live(&self) -> bool;

    /// Most recent frame, for video tracks that have produced one.
    fn latest_frame(&self) -> Option<PixelBuffer>;
}

/// Something that can start a capture. `acquire` may block on the OS
/// (permission prompt, source picker), so callers run it off the UI thread.
pub trait CaptureBackend: Send {
    fn acquire(&mut self, request: &CaptureRequest) -> Result<CaptureStream, CaptureError>;
}

/// An active capture session. Owned exclusively by whoever acquired it.
pub struct CaptureStream {
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl CaptureStream {
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Box<dyn MediaTrack>] {
        &self.tracks
    }

    /// Stop every track.
    pub fn stop_all(&mut self) {
        for track in &mut self.tracks {
            track.stop();
        }
    }

    /// `true` if any track is still producing media.
    pub fn any_live(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }

    /// `true` if at least one track ended while the stream was still held.
    pub fn has_ended_track(&self) -> bool {
        self.tracks.iter().any(|t| !t.is_live())
    }

    /// Latest frame of the first video track that has one.
    pub fn latest_video_frame(&self) -> Option<PixelBuffer> {
        self.tracks
            .iter()
            .filter(|t| t.kind() == TrackKind::Video)
            .find_map(|t| t.latest_frame())
    }

    /// Label of the first video track, for the status line.
    pub fn video_label(&self) -> Option<&str> {
        self.tracks
            .iter()
            .find(|t| t.kind() == TrackKind::Video)
            .map(|t| t.label())
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        if self.any_live() {
            tracing::debug!(tracks = self.tracks.len(), "Capture stream dropped; stopping tracks");
        }
        self.stop_all();
    }
}

impl std::fmt::Debug for CaptureStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureStream")
            .field("tracks", &self.tracks.len())
            .field("live", &self.any_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct FlagTrack {
        live: Arc<AtomicBool>,
    }

    impl MediaTrack for FlagTrack {
        fn kind(&self) -> TrackKind {
            TrackKind::Video
        }
        fn label(&self) -> &str {
            "test"
        }
        fn stop(&mut self) {
            self.live.store(false, Ordering::SeqCst);
        }
        fn is_live(&self) -> bool {
            self.live.load(Ordering::SeqCst)
        }
        fn latest_frame(&self) -> Option<PixelBuffer> {
            None
        }
    }

    #[test]
    fn test_drop_stops_every_track() {
        let flags: Vec<_> = (0..3).map(|_| Arc::new(AtomicBool::new(true))).collect();
        let tracks: Vec<Box<dyn MediaTrack>> = flags
            .iter()
            .map(|f| Box::new(FlagTrack { live: Arc::clone(f) }) as Box<dyn MediaTrack>)
            .collect();
        let stream = CaptureStream::new(tracks);
        assert!(stream.any_live());
        drop(stream);
        assert!(flags.iter().all(|f| !f.load(Ordering::SeqCst)));
    }

    #[test]
    fn test_ended_track_is_reported() {
        let flag = Arc::new(AtomicBool::new(true));
        let stream = CaptureStream::new(vec![Box::new(FlagTrack {
            live: Arc::clone(&flag),
        })]);
        assert!(!stream.has_ended_track());
        flag.store(false, Ordering::SeqCst);
        assert!(stream.has_ended_track());
        assert_eq!(stream.video_label(), Some("test"));
    }
}
