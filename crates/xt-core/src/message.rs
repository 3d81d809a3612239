//! Chat message model
//!
//! Messages are immutable once created and live in an append-only,
//! insertion-ordered log; nothing in this crate reorders or deduplicates
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier
    pub id: Uuid,

    /// Message text
    pub content: String,

    /// Author role
    pub role: Role,

    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message authored by the user
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Role::User)
    }

    /// Create a message authored by the assistant
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, Role::Assistant)
    }

    fn new(content: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
        }
    }
}
