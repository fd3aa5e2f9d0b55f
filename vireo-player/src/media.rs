//! Capability surface between the engine and the rendering environment.

use thiserror::Error;

use vireo_model::VideoId;

/// Fraction of a video's area that must be on screen before its visibility
/// event reports `visible = true`. Adapters configure their viewport
/// observer with this threshold.
pub const VISIBILITY_THRESHOLD: f64 = 0.6;

/// One viewport observation: a video either crossed into sufficient
/// visibility or dropped out of it. The id is carried explicitly; the engine
/// never parses identifiers out of element names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub id: VideoId,
    pub visible: bool,
}

impl VisibilityEvent {
    pub fn visible(id: VideoId) -> Self {
        Self { id, visible: true }
    }

    pub fn hidden(id: VideoId) -> Self {
        Self { id, visible: false }
    }
}

/// Control handle over one rendered media element.
///
/// Playback is best-effort: `play` may be rejected by the environment
/// (autoplay policy, decode failure) and the engine swallows the rejection
/// rather than surfacing it.
pub trait MediaHandle {
    fn seek_to_start(&mut self);
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
}

#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("playback start rejected: {0}")]
    Rejected(String),

    #[error("media element is gone")]
    Detached,
}
