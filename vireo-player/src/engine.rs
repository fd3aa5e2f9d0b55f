//! Glue for the three feed state machines.
//!
//! The rendering adapter owns elements and timers; it forwards visibility
//! batches, time-update ticks, and mount/unmount notifications here and
//! performs the fetches and feedback sends this engine asks for. All calls
//! are synchronous and are expected to arrive on one event loop.

use vireo_model::{FeedCursor, VideoId, VideoLike};

use crate::feed::{FeedWindow, FetchRequest, Lifecycle, Observation};
use crate::media::{MediaHandle, VisibilityEvent};
use crate::playback::PlaybackOrchestrator;
use crate::progress::{ViewEvent, ViewSession};

#[derive(Debug)]
pub struct FeedEngine<V, H> {
    window: FeedWindow<V>,
    playback: PlaybackOrchestrator<H>,
    session: Option<ViewSession>,
}

impl<V: VideoLike, H: MediaHandle> FeedEngine<V, H> {
    pub fn new(page_size: usize) -> Self {
        Self {
            window: FeedWindow::new(page_size),
            playback: PlaybackOrchestrator::new(),
            session: None,
        }
    }

    /// Engine seeded with a deep-linked video at index 0.
    pub fn with_seed(page_size: usize, seed: V) -> Self {
        Self {
            window: FeedWindow::with_seed(page_size, seed),
            playback: PlaybackOrchestrator::new(),
            session: None,
        }
    }

    /// Request the first page. Returns `None` if a fetch is already in
    /// flight (or the feed is somehow already exhausted).
    pub fn initial_fetch(&mut self) -> Option<FetchRequest> {
        self.window.request_fetch()
    }

    pub fn page_resolved(&mut self, videos: Vec<V>, next_cursor: Option<FeedCursor>) {
        self.window.merge_page(videos, next_cursor);
    }

    pub fn page_failed(&mut self) {
        self.window.fetch_failed();
    }

    /// Process a visibility batch. Activation side effects (pause previous,
    /// rewind and play the new active video, reset the view session) happen
    /// here; the returned observation tells the caller whether to fetch.
    pub fn observe(&mut self, events: &[VisibilityEvent]) -> Observation {
        let observation = self.window.observe(events);
        if let Some(id) = observation.activated {
            self.playback.set_active(id);
            // Fresh session: progress latches reset even for a replay of
            // the same video.
            self.session = Some(ViewSession::new(id));
        }
        observation
    }

    /// A video's element was mounted by the renderer.
    pub fn mount(&mut self, id: VideoId, handle: H) {
        self.playback.insert_handle(id, handle);
    }

    /// A video's element was torn down. If it was the active one, its
    /// session dies with it: late ticks from the detached element must not
    /// emit feedback.
    pub fn unmount(&mut self, id: VideoId) {
        self.playback.remove_handle(id);
        if self.session.as_ref().is_some_and(|s| s.video() == id) {
            self.session = None;
        }
    }

    /// Feed a playback-progress tick for `video`. Ticks for anything other
    /// than the current session are stragglers and are dropped.
    pub fn time_update(&mut self, video: VideoId, position_secs: f64, duration_secs: f64) -> Vec<ViewEvent> {
        match &mut self.session {
            Some(session) if session.video() == video => {
                session.on_time_update(position_secs, duration_secs)
            }
            _ => Vec::new(),
        }
    }

    pub fn metadata_loaded(&mut self, video: VideoId, duration_secs: f64) {
        if let Some(session) = &mut self.session
            && session.video() == video
        {
            session.on_metadata(duration_secs);
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.playback.set_muted(muted);
    }

    pub fn toggle_muted(&mut self) {
        self.playback.toggle_muted();
    }

    pub fn muted(&self) -> bool {
        self.playback.muted()
    }

    pub fn lifecycle(&self, id: VideoId) -> Lifecycle {
        self.window.lifecycle(id)
    }

    pub fn window(&self) -> &FeedWindow<V> {
        &self.window
    }

    pub fn playback(&self) -> &PlaybackOrchestrator<H> {
        &self.playback
    }
}
