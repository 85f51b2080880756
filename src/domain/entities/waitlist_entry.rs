use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review status of a waitlist entry. Only `Accepted` entries pass the login gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitlistStatus {
    #[default]
    PendingReview,
    Accepted,
}

impl WaitlistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitlistStatus::PendingReview => "PENDING_REVIEW",
            WaitlistStatus::Accepted => "ACCEPTED",
        }
    }

    /// Parse a stored status. Unknown values read as `PendingReview` so that
    /// the access gate stays closed for anything it does not recognise.
    pub fn from_str(s: &str) -> Self {
        match s {
            "ACCEPTED" => WaitlistStatus::Accepted,
            "PENDING_REVIEW" => WaitlistStatus::PendingReview,
            other => {
                tracing::warn!(status = other, "Unknown waitlist status, treating as pending");
                WaitlistStatus::PendingReview
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, WaitlistStatus::Accepted)
    }
}

impl std::fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: String,
    pub role: Option<String>,
    pub status: WaitlistStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Validated registration data, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWaitlistEntry {
    pub name: String,
    pub email: String,
    pub company: String,
    pub role: Option<String>,
}
