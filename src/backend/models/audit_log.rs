use crate::models::common::Timestamp;
use serde::{Deserialize, Serialize};

/// Represents a single entry in the operation log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub time: Timestamp,
    /// Free-text description of what was done.
    pub action: String,
    /// Username of the session that acted, or the configured system name.
    pub user: String,
}
