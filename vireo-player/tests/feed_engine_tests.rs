//! End-to-end scenarios for the feed engine: scrolling, activation,
//! prefetch, and view feedback working together.

use std::sync::{Arc, Mutex};

use vireo_model::{FeedCursor, VideoId, VideoSummary};
use vireo_player::engine::FeedEngine;
use vireo_player::feed::{Lifecycle, DEFAULT_PAGE_SIZE};
use vireo_player::media::{MediaHandle, PlaybackError, VisibilityEvent};
use vireo_player::progress::ViewEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    SeekToStart,
    Play,
    Pause,
    Muted(bool),
}

#[derive(Debug)]
struct RecordingHandle {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingHandle {
    fn new() -> (Self, Arc<Mutex<Vec<Call>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl MediaHandle for RecordingHandle {
    fn seek_to_start(&mut self) {
        self.calls.lock().unwrap().push(Call::SeekToStart);
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.calls.lock().unwrap().push(Call::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(Call::Pause);
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.lock().unwrap().push(Call::Muted(muted));
    }
}

fn video(n: u32) -> VideoSummary {
    VideoSummary {
        id: VideoId(uuid::Uuid::from_u128(n as u128 + 1)),
        title: format!("video {n}"),
        media_url: format!("https://cdn.example.com/video/{n}"),
        cover_url: format!("https://cdn.example.com/cover/{n}"),
    }
}

fn id_of(n: u32) -> VideoId {
    video(n).id
}

/// Build an engine with `count` videos loaded across pages and a recording
/// handle mounted for each, returning the call logs by index.
fn engine_with(
    count: u32,
) -> (
    FeedEngine<VideoSummary, RecordingHandle>,
    Vec<Arc<Mutex<Vec<Call>>>>,
) {
    let mut engine = FeedEngine::new(DEFAULT_PAGE_SIZE);

    // Every page carries a next cursor; the feed is endless as far as the
    // engine knows.
    let mut loaded = 0;
    while loaded < count {
        let take = (count - loaded).min(DEFAULT_PAGE_SIZE as u32);
        let page: Vec<_> = (loaded..loaded + take).map(video).collect();
        loaded += take;
        let _ = engine.initial_fetch();
        engine.page_resolved(page, Some(FeedCursor::from_offset(loaded as u64)));
    }

    let mut logs = Vec::new();
    for n in 0..count {
        let (handle, calls) = RecordingHandle::new();
        engine.mount(id_of(n), handle);
        logs.push(calls);
    }
    (engine, logs)
}

#[test]
fn scrolling_to_a_video_rewinds_and_plays_it() {
    let (mut engine, logs) = engine_with(5);

    engine.observe(&[VisibilityEvent::visible(id_of(0))]);
    assert_eq!(
        *logs[0].lock().unwrap(),
        vec![Call::Muted(false), Call::SeekToStart, Call::Play]
    );

    // Scroll on: video 0 pauses, video 1 starts.
    engine.observe(&[
        VisibilityEvent::hidden(id_of(0)),
        VisibilityEvent::visible(id_of(1)),
    ]);
    assert!(logs[0].lock().unwrap().contains(&Call::Pause));
    assert!(logs[1].lock().unwrap().contains(&Call::Play));
    assert_eq!(engine.playback().current(), Some(id_of(1)));
}

#[test]
fn at_most_one_active_after_any_batch() {
    let (mut engine, _logs) = engine_with(12);

    for batch in [
        vec![VisibilityEvent::visible(id_of(0))],
        vec![
            VisibilityEvent::visible(id_of(1)),
            VisibilityEvent::visible(id_of(2)),
        ],
        vec![VisibilityEvent::hidden(id_of(2))],
        vec![
            VisibilityEvent::visible(id_of(7)),
            VisibilityEvent::hidden(id_of(1)),
            VisibilityEvent::visible(id_of(8)),
        ],
    ] {
        engine.observe(&batch);
        let actives = engine
            .window()
            .lifecycles()
            .filter(|(_, state)| *state == Lifecycle::Active)
            .count();
        assert!(actives <= 1);
    }
}

#[test]
fn tail_visibility_fetches_the_next_page_exactly_once() {
    let (mut engine, _logs) = engine_with(12);

    let observation = engine.observe(&[VisibilityEvent::visible(id_of(7))]);
    let fetch = observation.fetch.expect("expected a prefetch");
    assert_eq!(fetch.cursor.unwrap().offset().unwrap(), 12);

    // Repeated visibility in the tail while the fetch is outstanding does
    // not issue another one.
    let observation = engine.observe(&[VisibilityEvent::visible(id_of(9))]);
    assert!(observation.fetch.is_none());

    // Once the page resolves, the cursor advances and the tail moves.
    engine.page_resolved(vec![video(12), video(13)], None);
    assert_eq!(engine.window().len(), 14);
}

#[test]
fn watching_a_video_emits_started_then_finished_once() {
    let (mut engine, _logs) = engine_with(5);
    engine.observe(&[VisibilityEvent::visible(id_of(0))]);

    assert!(engine.time_update(id_of(0), 0.4, 10.0).is_empty());
    assert_eq!(
        engine.time_update(id_of(0), 1.1, 10.0),
        vec![ViewEvent::Started]
    );
    assert_eq!(
        engine.time_update(id_of(0), 6.9, 10.0),
        vec![ViewEvent::Finished]
    );
    assert!(engine.time_update(id_of(0), 9.5, 10.0).is_empty());
}

#[test]
fn ticks_for_inactive_videos_are_dropped() {
    let (mut engine, _logs) = engine_with(5);
    engine.observe(&[VisibilityEvent::visible(id_of(0))]);

    // A stale tick from a mounted-but-inactive element.
    assert!(engine.time_update(id_of(3), 2.0, 10.0).is_empty());

    // Switch active; late ticks for the old session no longer count.
    engine.observe(&[VisibilityEvent::visible(id_of(1))]);
    assert!(engine.time_update(id_of(0), 5.0, 10.0).is_empty());
}

#[test]
fn unmounting_the_active_video_cancels_its_session() {
    let (mut engine, logs) = engine_with(5);
    engine.observe(&[VisibilityEvent::visible(id_of(0))]);
    engine.time_update(id_of(0), 1.5, 10.0);

    engine.unmount(id_of(0));
    assert!(logs[0].lock().unwrap().contains(&Call::Pause));
    // The detached element keeps ticking for a moment; nothing comes out.
    assert!(engine.time_update(id_of(0), 7.0, 10.0).is_empty());
}

#[test]
fn replaying_a_video_restarts_feedback_from_scratch() {
    let (mut engine, _logs) = engine_with(5);

    engine.observe(&[VisibilityEvent::visible(id_of(0))]);
    assert_eq!(
        engine.time_update(id_of(0), 8.0, 10.0),
        vec![ViewEvent::Started, ViewEvent::Finished]
    );

    // Away and back again: a fresh session for the same id.
    engine.observe(&[VisibilityEvent::visible(id_of(1))]);
    engine.observe(&[VisibilityEvent::visible(id_of(0))]);
    assert_eq!(
        engine.time_update(id_of(0), 1.2, 10.0),
        vec![ViewEvent::Started]
    );
    assert_eq!(
        engine.time_update(id_of(0), 7.0, 10.0),
        vec![ViewEvent::Finished]
    );
}

#[test]
fn metadata_before_first_tick_supplies_duration() {
    let (mut engine, _logs) = engine_with(5);
    engine.observe(&[VisibilityEvent::visible(id_of(0))]);

    engine.metadata_loaded(id_of(0), 10.0);
    assert_eq!(
        engine.time_update(id_of(0), 1.0, 0.0),
        vec![ViewEvent::Started]
    );
}

#[test]
fn mute_toggle_reaches_every_mounted_element() {
    let (mut engine, logs) = engine_with(3);
    engine.toggle_muted();
    assert!(engine.muted());
    for log in &logs {
        assert!(log.lock().unwrap().contains(&Call::Muted(true)));
    }
}

#[test]
fn seeded_engine_plays_the_seed_first() {
    let seed = video(100);
    let mut engine: FeedEngine<VideoSummary, RecordingHandle> =
        FeedEngine::with_seed(DEFAULT_PAGE_SIZE, seed.clone());

    let _ = engine.initial_fetch();
    engine.page_resolved(
        vec![video(0), video(100), video(1)],
        Some(FeedCursor::from_offset(3)),
    );

    let ids: Vec<_> = engine.window().items().iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![id_of(100), id_of(0), id_of(1)]);

    let (handle, calls) = RecordingHandle::new();
    engine.mount(seed.id, handle);
    engine.observe(&[VisibilityEvent::visible(seed.id)]);
    assert!(calls.lock().unwrap().contains(&Call::Play));
}
