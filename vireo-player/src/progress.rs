//! View-progress tracking: the two-stage started/finished feedback latch.

use vireo_model::VideoId;

/// Seconds of playback after which a view counts as started.
pub const STARTED_THRESHOLD_SECS: f64 = 1.0;

/// Fraction of the duration after which a view counts as finished.
pub const FINISHED_FRACTION: f64 = 0.67;

// Positions arrive as decimal seconds; without a guard, 6.7 of a 10-second
// video lands a hair under 10.0 * 0.67 in binary floating point.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Feedback emitted by a view session, at most once each per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Started,
    Finished,
}

/// One continuous playback session of one active video.
///
/// The session is created when a video becomes active and dropped when it
/// deactivates; replaying the same video later is a fresh session with
/// fresh latches. `Started` fires the first tick at or past one second
/// (duration permitting); `Finished` fires the first tick at or past 67%
/// of the duration, and never before `Started` has latched. If the
/// duration never becomes known, neither fires.
#[derive(Debug, Clone)]
pub struct ViewSession {
    video: VideoId,
    duration: Option<f64>,
    started_sent: bool,
    finished_sent: bool,
}

impl ViewSession {
    pub fn new(video: VideoId) -> Self {
        Self {
            video,
            duration: None,
            started_sent: false,
            finished_sent: false,
        }
    }

    pub fn video(&self) -> VideoId {
        self.video
    }

    /// Capture the duration from a metadata-loaded signal, when the
    /// environment delivers it before the first time update.
    pub fn on_metadata(&mut self, duration_secs: f64) {
        if duration_secs > 0.0 {
            self.duration = Some(duration_secs);
        }
    }

    /// Feed one time-update tick. Returns the events this tick latched,
    /// in emission order.
    pub fn on_time_update(&mut self, position_secs: f64, duration_secs: f64) -> Vec<ViewEvent> {
        self.on_metadata(duration_secs);

        let mut events = Vec::new();
        let Some(duration) = self.duration else {
            return events;
        };

        if !self.started_sent && position_secs >= STARTED_THRESHOLD_SECS {
            self.started_sent = true;
            events.push(ViewEvent::Started);
        }
        if self.started_sent
            && !self.finished_sent
            && position_secs >= duration * FINISHED_FRACTION - THRESHOLD_EPSILON
        {
            self.finished_sent = true;
            events.push(ViewEvent::Finished);
        }
        events
    }

    pub fn is_finished(&self) -> bool {
        self.finished_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ViewSession {
        ViewSession::new(VideoId(uuid::Uuid::from_u128(42)))
    }

    #[test]
    fn ten_second_video_scenario() {
        let mut s = session();
        assert!(s.on_time_update(0.5, 10.0).is_empty());
        assert_eq!(s.on_time_update(1.2, 10.0), vec![ViewEvent::Started]);
        assert!(s.on_time_update(6.0, 10.0).is_empty());
        assert_eq!(s.on_time_update(6.7, 10.0), vec![ViewEvent::Finished]);
        assert!(s.on_time_update(9.9, 10.0).is_empty());
        assert!(s.is_finished());
    }

    #[test]
    fn latches_are_idempotent_across_seeks() {
        let mut s = session();
        assert_eq!(s.on_time_update(2.0, 10.0), vec![ViewEvent::Started]);
        // Seek back before the threshold, then cross it again.
        assert!(s.on_time_update(0.2, 10.0).is_empty());
        assert!(s.on_time_update(3.0, 10.0).is_empty());

        assert_eq!(s.on_time_update(8.0, 10.0), vec![ViewEvent::Finished]);
        assert!(s.on_time_update(1.0, 10.0).is_empty());
        assert!(s.on_time_update(9.0, 10.0).is_empty());
    }

    #[test]
    fn unknown_duration_never_fires() {
        let mut s = session();
        for position in [1.0, 5.0, 50.0] {
            assert!(s.on_time_update(position, 0.0).is_empty());
        }
    }

    #[test]
    fn metadata_can_supply_duration_before_ticks() {
        let mut s = session();
        s.on_metadata(10.0);
        // Duration missing from the tick itself; the captured one is used.
        assert_eq!(s.on_time_update(1.5, 0.0), vec![ViewEvent::Started]);
    }

    #[test]
    fn short_video_emits_started_then_finished_on_one_tick() {
        // 1.2s video: 67% (0.804s) is crossed before the 1-second mark, so
        // both latch together on the first tick past one second.
        let mut s = session();
        assert!(s.on_time_update(0.9, 1.2).is_empty());
        assert_eq!(
            s.on_time_update(1.0, 1.2),
            vec![ViewEvent::Started, ViewEvent::Finished]
        );
    }

    #[test]
    fn replay_is_a_fresh_session() {
        let mut first = session();
        first.on_time_update(1.0, 10.0);
        first.on_time_update(7.0, 10.0);
        assert!(first.is_finished());

        // New activation of the same video id: new session, both fire again.
        let mut second = session();
        assert_eq!(second.on_time_update(1.1, 10.0), vec![ViewEvent::Started]);
        assert_eq!(second.on_time_update(6.8, 10.0), vec![ViewEvent::Finished]);
    }

    #[test]
    fn skipping_straight_past_both_thresholds_fires_both_in_order() {
        let mut s = session();
        assert_eq!(
            s.on_time_update(9.0, 10.0),
            vec![ViewEvent::Started, ViewEvent::Finished]
        );
    }
}
