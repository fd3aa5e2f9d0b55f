//! Feed windowing: the ordered, deduplicated sequence of videos the user
//! scrolls through, plus the mount/activate/prefetch decisions driven by
//! viewport visibility.

use std::collections::HashSet;

use vireo_model::{FeedCursor, VideoId, VideoLike};

use crate::media::VisibilityEvent;

/// Videos fetched per page. Also the size of the tail window that arms the
/// next prefetch: once any video among the last `DEFAULT_PAGE_SIZE` becomes
/// visible, the following page is requested.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Render state of one video in the window.
///
/// Derived, never stored: a video on a page strictly before the active
/// video's page is `Unmounted` (its element is torn down), the active video
/// is `Active`, everything else is `Mounted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounted,
    Active,
}

/// A next-page fetch the caller should perform. `cursor` of `None` means
/// the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub cursor: Option<FeedCursor>,
}

/// Net result of processing one visibility batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Observation {
    /// Set when the batch armed a prefetch and no fetch was already in
    /// flight.
    pub fetch: Option<FetchRequest>,
    /// Set when the active video changed.
    pub activated: Option<VideoId>,
}

/// The feed window: an append-only, deduplicated-by-id sequence of videos
/// with one (or zero) active entry.
#[derive(Debug)]
pub struct FeedWindow<V> {
    page_size: usize,
    items: Vec<V>,
    seen: HashSet<VideoId>,
    active: Option<VideoId>,
    next_cursor: Option<FeedCursor>,
    exhausted: bool,
    fetch_in_flight: bool,
}

impl<V: VideoLike> FeedWindow<V> {
    pub fn new(page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        Self {
            page_size,
            items: Vec::new(),
            seen: HashSet::new(),
            active: None,
            next_cursor: None,
            exhausted: false,
            fetch_in_flight: false,
        }
    }

    /// A window guaranteed to contain `seed` at index 0, i.e. the deep-linked
    /// video a shared URL opens on. If a later page contains the same id it
    /// is deduplicated like any other repeat.
    pub fn with_seed(page_size: usize, seed: V) -> Self {
        let mut window = Self::new(page_size);
        window.seen.insert(seed.video_id());
        window.items.push(seed);
        window
    }

    /// Merge a resolved page: append unseen videos in server order, record
    /// the new cursor, and release the in-flight guard.
    pub fn merge_page(&mut self, videos: Vec<V>, next_cursor: Option<FeedCursor>) {
        self.fetch_in_flight = false;
        self.exhausted = next_cursor.is_none();
        self.next_cursor = next_cursor;
        for video in videos {
            if self.seen.insert(video.video_id()) {
                self.items.push(video);
            }
        }
    }

    /// A fetch failed or was abandoned. The cursor is left as it was, so
    /// the next qualifying visibility batch retries the same page.
    pub fn fetch_failed(&mut self) {
        self.fetch_in_flight = false;
    }

    /// Explicitly request a fetch (used for the initial page load, before
    /// any video exists to intersect). Subject to the same in-flight and
    /// exhaustion guards as scroll-driven prefetch.
    pub fn request_fetch(&mut self) -> Option<FetchRequest> {
        if self.fetch_in_flight || self.exhausted {
            return None;
        }
        self.fetch_in_flight = true;
        Some(FetchRequest {
            cursor: self.next_cursor.clone(),
        })
    }

    /// Process one visibility batch.
    ///
    /// Every currently-visible entry sets the active video; batch order
    /// wins, not spatial order. If any visible entry sits in the last
    /// `page_size` items of the window, the next page is requested.
    pub fn observe(&mut self, events: &[VisibilityEvent]) -> Observation {
        let visible: Vec<VideoId> = events
            .iter()
            .filter(|event| event.visible)
            .map(|event| event.id)
            .collect();

        let tail_start = self.items.len().saturating_sub(self.page_size);
        let in_tail = visible.iter().any(|id| {
            self.items[tail_start..]
                .iter()
                .any(|video| video.video_id() == *id)
        });
        let fetch = if in_tail { self.request_fetch() } else { None };

        let previous = self.active;
        for id in visible {
            // Stale events for videos not (or no longer) in the window are
            // ignored rather than treated as an invariant violation.
            if self.seen.contains(&id) {
                self.active = Some(id);
            }
        }

        Observation {
            fetch,
            activated: self.active.filter(|_| self.active != previous),
        }
    }

    /// Derive the lifecycle state of `id` from the current active video.
    pub fn lifecycle(&self, id: VideoId) -> Lifecycle {
        let Some(index) = self.index_of(id) else {
            return Lifecycle::Unmounted;
        };
        if self.active == Some(id) {
            return Lifecycle::Active;
        }
        if index / self.page_size < self.active_page() {
            Lifecycle::Unmounted
        } else {
            Lifecycle::Mounted
        }
    }

    /// Lifecycle of every video in window order.
    pub fn lifecycles(&self) -> impl Iterator<Item = (VideoId, Lifecycle)> + '_ {
        self.items.iter().map(|video| {
            let id = video.video_id();
            (id, self.lifecycle(id))
        })
    }

    /// Page index of the active video, or 0 when nothing is active yet.
    fn active_page(&self) -> usize {
        self.active
            .and_then(|id| self.index_of(id))
            .map(|index| index / self.page_size)
            .unwrap_or(0)
    }

    fn index_of(&self, id: VideoId) -> Option<usize> {
        self.items.iter().position(|video| video.video_id() == id)
    }

    pub fn active(&self) -> Option<VideoId> {
        self.active
    }

    pub fn items(&self) -> &[V] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vireo_model::VideoSummary;

    fn video(n: u32) -> VideoSummary {
        // Deterministic ids so tests can refer back to them.
        let id = VideoId(uuid::Uuid::from_u128(n as u128 + 1));
        VideoSummary {
            id,
            title: format!("video {n}"),
            media_url: format!("https://cdn.example.com/video/{n}"),
            cover_url: format!("https://cdn.example.com/cover/{n}"),
        }
    }

    fn id_of(n: u32) -> VideoId {
        video(n).id
    }

    fn cursor(offset: u64) -> Option<FeedCursor> {
        Some(FeedCursor::from_offset(offset))
    }

    /// Window with `n` videos loaded page by page; the feed is never
    /// exhausted (every page carries a next cursor).
    fn window_with(n: u32) -> FeedWindow<VideoSummary> {
        let mut window = FeedWindow::new(DEFAULT_PAGE_SIZE);
        let mut remaining = n;
        let mut offset = 0;
        while remaining > 0 {
            let take = remaining.min(DEFAULT_PAGE_SIZE as u32);
            let page: Vec<_> = (offset..offset + take).map(video).collect();
            offset += take;
            remaining -= take;
            let _ = window.request_fetch();
            window.merge_page(page, cursor(offset as u64));
        }
        window
    }

    #[test]
    fn pages_dedupe_by_id_in_first_seen_order() {
        let mut window = FeedWindow::new(3);
        window.merge_page(vec![video(0), video(1), video(2)], cursor(3));
        // Second page repeats video 1 and brings two new ones.
        window.merge_page(vec![video(1), video(3), video(4)], cursor(6));

        let ids: Vec<_> = window.items().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![id_of(0), id_of(1), id_of(2), id_of(3), id_of(4)]);
    }

    #[test]
    fn seed_stays_first_and_is_deduped() {
        let mut window = FeedWindow::with_seed(3, video(7));
        window.merge_page(vec![video(0), video(7), video(1)], cursor(3));

        let ids: Vec<_> = window.items().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![id_of(7), id_of(0), id_of(1)]);
    }

    #[test]
    fn empty_window_survives_observation() {
        let mut window = FeedWindow::<VideoSummary>::new(5);
        let observation = window.observe(&[VisibilityEvent::visible(id_of(99))]);
        assert_eq!(observation, Observation::default());
        assert_eq!(window.active(), None);
    }

    #[test]
    fn last_visible_entry_in_batch_order_wins() {
        let mut window = window_with(5);
        let observation = window.observe(&[
            VisibilityEvent::visible(id_of(2)),
            VisibilityEvent::hidden(id_of(0)),
            VisibilityEvent::visible(id_of(3)),
        ]);
        assert_eq!(observation.activated, Some(id_of(3)));
        assert_eq!(window.active(), Some(id_of(3)));

        // At most one video is ever active.
        let actives = window
            .lifecycles()
            .filter(|(_, state)| *state == Lifecycle::Active)
            .count();
        assert_eq!(actives, 1);
    }

    #[test]
    fn active_survives_a_batch_with_no_visible_entries() {
        let mut window = window_with(5);
        window.observe(&[VisibilityEvent::visible(id_of(1))]);
        let observation = window.observe(&[VisibilityEvent::hidden(id_of(1))]);
        assert_eq!(observation.activated, None);
        assert_eq!(window.active(), Some(id_of(1)));
    }

    #[test]
    fn visibility_in_tail_window_triggers_exactly_one_fetch() {
        // 12 videos: two full pages and a partial third.
        let mut window = window_with(12);
        assert!(!window.fetch_in_flight());

        // Index 7 is within the last five (indices 7..=11).
        let observation = window.observe(&[VisibilityEvent::visible(id_of(7))]);
        let fetch = observation.fetch.expect("tail visibility must arm a fetch");
        assert_eq!(fetch.cursor.unwrap().offset().unwrap(), 12);

        // Still visible on the next batch: guard suppresses a duplicate.
        let observation = window.observe(&[VisibilityEvent::visible(id_of(8))]);
        assert_eq!(observation.fetch, None);
    }

    #[test]
    fn visibility_outside_tail_window_does_not_fetch() {
        let mut window = window_with(12);
        let observation = window.observe(&[VisibilityEvent::visible(id_of(2))]);
        assert_eq!(observation.fetch, None);
    }

    #[test]
    fn failed_fetch_rearms_the_trigger_with_same_cursor() {
        let mut window = window_with(12);
        let first = window.observe(&[VisibilityEvent::visible(id_of(11))]);
        let first_cursor = first.fetch.unwrap().cursor;

        window.fetch_failed();
        let retry = window.observe(&[VisibilityEvent::visible(id_of(11))]);
        assert_eq!(retry.fetch.unwrap().cursor, first_cursor);
    }

    #[test]
    fn exhausted_feed_stops_fetching() {
        let mut window = FeedWindow::new(2);
        window.merge_page(vec![video(0), video(1)], None);
        assert!(window.is_exhausted());
        let observation = window.observe(&[VisibilityEvent::visible(id_of(1))]);
        assert_eq!(observation.fetch, None);
    }

    #[test]
    fn lifecycle_derivation_unmounts_pages_before_active() {
        let mut window = window_with(12);
        window.observe(&[VisibilityEvent::visible(id_of(6))]);

        // Active is on page 1: all of page 0 unmounts.
        for n in 0..5 {
            assert_eq!(window.lifecycle(id_of(n)), Lifecycle::Unmounted);
        }
        assert_eq!(window.lifecycle(id_of(6)), Lifecycle::Active);
        assert_eq!(window.lifecycle(id_of(5)), Lifecycle::Mounted);
        assert_eq!(window.lifecycle(id_of(11)), Lifecycle::Mounted);
    }

    #[test]
    fn unmount_is_derived_not_sticky() {
        let mut window = window_with(12);
        window.observe(&[VisibilityEvent::visible(id_of(10))]);
        assert_eq!(window.lifecycle(id_of(3)), Lifecycle::Unmounted);

        // Scrolling back up: an earlier video becomes active again and the
        // previously unmounted page remounts purely by derivation.
        window.observe(&[VisibilityEvent::visible(id_of(3))]);
        assert_eq!(window.lifecycle(id_of(3)), Lifecycle::Active);
        assert_eq!(window.lifecycle(id_of(0)), Lifecycle::Mounted);
        assert_eq!(window.lifecycle(id_of(10)), Lifecycle::Mounted);
    }

    #[test]
    fn no_active_video_means_page_zero_is_the_floor() {
        let window = window_with(7);
        for n in 0..7 {
            assert_eq!(window.lifecycle(id_of(n)), Lifecycle::Mounted);
        }
    }

    #[test]
    fn initial_fetch_uses_no_cursor() {
        let mut window = FeedWindow::<VideoSummary>::new(5);
        let request = window.request_fetch().unwrap();
        assert_eq!(request.cursor, None);
        // Guard holds until the page arrives.
        assert!(window.request_fetch().is_none());
        window.merge_page(vec![video(0)], cursor(5));
        assert!(window.request_fetch().is_some());
    }
}
