use serde::{Deserialize, Serialize};

/// The authenticated principal on whose behalf a request runs.
///
/// Token issuance and identity resolution happen outside this core; callers
/// hand a resolved `Owner` to every lifecycle operation. The core never
/// persists owners — schedules only store the numeric `owner_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: i64,
    pub username: String,
    /// Privileged owners bypass the schedule quota and see every owner's
    /// rows. Mirrors the usual admin escape hatch.
    pub privileged: bool,
}

impl Owner {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            privileged: false,
        }
    }

    pub fn privileged(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            privileged: true,
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.username, self.id)
    }
}
