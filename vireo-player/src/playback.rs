//! Playback orchestration: at most one media element plays at a time.

use std::collections::HashMap;

use tracing::warn;

use vireo_model::VideoId;

use crate::media::MediaHandle;

/// Owns the media handles of mounted videos and enforces the
/// single-playing-element rule.
///
/// Activation resets the element to the start and begins playback; any
/// previously active element is paused first. A rejected `play` (autoplay
/// policy, decode error) leaves the element visibly paused and is only
/// logged.
#[derive(Debug)]
pub struct PlaybackOrchestrator<H> {
    handles: HashMap<VideoId, H>,
    current: Option<VideoId>,
    muted: bool,
}

impl<H: MediaHandle> Default for PlaybackOrchestrator<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MediaHandle> PlaybackOrchestrator<H> {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
            current: None,
            muted: false,
        }
    }

    /// Register the handle of a freshly mounted video. The shared mute flag
    /// is applied immediately; if the video is already supposed to be
    /// active (activation raced ahead of mounting), playback starts now.
    pub fn insert_handle(&mut self, id: VideoId, mut handle: H) {
        handle.set_muted(self.muted);
        self.handles.insert(id, handle);
        if self.current == Some(id) {
            self.start(id);
        }
    }

    /// Drop the handle of an unmounted video. Unmounting the active video
    /// pauses it first so a torn-down element never keeps playing audio.
    pub fn remove_handle(&mut self, id: VideoId) {
        if let Some(handle) = self.handles.get_mut(&id)
            && self.current == Some(id)
        {
            handle.pause();
            self.current = None;
        }
        self.handles.remove(&id);
    }

    /// Make `id` the (only) playing video. Re-activating the current video
    /// is a no-op; a playback session survives until the video deactivates.
    pub fn set_active(&mut self, id: VideoId) {
        if self.current == Some(id) {
            return;
        }
        if let Some(previous) = self.current.take()
            && let Some(handle) = self.handles.get_mut(&previous)
        {
            handle.pause();
        }
        self.current = Some(id);
        self.start(id);
    }

    /// Pause the active video without activating another.
    pub fn deactivate(&mut self) {
        if let Some(current) = self.current.take()
            && let Some(handle) = self.handles.get_mut(&current)
        {
            handle.pause();
        }
    }

    /// Flip the shared mute flag on every mounted element. Playback
    /// position is unaffected.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        for handle in self.handles.values_mut() {
            handle.set_muted(muted);
        }
    }

    pub fn toggle_muted(&mut self) {
        self.set_muted(!self.muted);
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn current(&self) -> Option<VideoId> {
        self.current
    }

    fn start(&mut self, id: VideoId) {
        let Some(handle) = self.handles.get_mut(&id) else {
            return;
        };
        handle.seek_to_start();
        if let Err(err) = handle.play() {
            // Best-effort autoplay: the user can still start it by hand.
            warn!(video = %id, error = %err, "playback start rejected");
        }
    }
}
