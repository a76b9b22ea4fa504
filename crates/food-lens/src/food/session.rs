use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::{DietaryProfile, ProfileFlag};

/// Identifier wrapper for profile sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

/// One user's dietary profile for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSession {
    pub session_id: SessionId,
    pub profile: DietaryProfile,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileSession {
    /// Sessions always start with every flag cleared.
    pub fn start(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            profile: DietaryProfile::default(),
            started_at: now,
            updated_at: now,
        }
    }

    pub fn toggled(mut self, flag: ProfileFlag, now: DateTime<Utc>) -> Self {
        self.profile.toggle(flag);
        self.updated_at = now;
        self
    }
}

/// Storage abstraction for sessions. `toggle` must flip the flag atomically so
/// concurrent readers only ever observe whole profiles.
pub trait ProfileStore: Send + Sync {
    fn insert(&self, session: ProfileSession) -> Result<ProfileSession, SessionError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<ProfileSession>, SessionError>;
    fn toggle(&self, id: &SessionId, flag: ProfileFlag) -> Result<ProfileSession, SessionError>;
    fn remove(&self, id: &SessionId) -> Result<(), SessionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
