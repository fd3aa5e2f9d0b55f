//! Headless feed engine for the Vireo client.
//!
//! Everything a scrolling video feed does that is not pixels lives here:
//! which videos are materialized, which one is active, when to prefetch the
//! next page, and when a view counts as started or finished. The engine is
//! synchronous and environment-free; the rendering layer feeds it visibility
//! and time-update events and owns the actual media elements behind the
//! [`media::MediaHandle`] trait.

pub mod api_client;
pub mod engine;
pub mod feed;
pub mod media;
pub mod playback;
pub mod progress;

pub use api_client::ApiClient;
pub use engine::FeedEngine;
pub use feed::{FeedWindow, FetchRequest, Lifecycle, Observation, DEFAULT_PAGE_SIZE};
pub use media::{MediaHandle, PlaybackError, VisibilityEvent, VISIBILITY_THRESHOLD};
pub use playback::PlaybackOrchestrator;
pub use progress::{ViewEvent, ViewSession};
