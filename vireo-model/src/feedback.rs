use serde::{Deserialize, Serialize};

/// Engagement depth signals forwarded to the recommender service.
///
/// The wire names follow the recommender's convention: a started view is a
/// `read`, a completed view is a `readall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Started,
    Finished,
    Liked,
}

impl FeedbackKind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            FeedbackKind::Started => "read",
            FeedbackKind::Finished => "readall",
            FeedbackKind::Liked => "like",
        }
    }
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}
