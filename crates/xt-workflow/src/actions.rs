//! External action seams
//!
//! The backend that actually stores files, computes crosstabs, and answers
//! chat turns is not part of this repository. Coordinators are parameterized
//! over these traits; a failed action must return an error whose display
//! string is fit to show the user.

use async_trait::async_trait;
use xt_core::UploadCandidate;

/// What the backend reports for a stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Server-assigned file identifier
    pub file_id: String,

    /// File name as stored
    pub file_name: String,

    /// Stored size in bytes
    pub size_bytes: u64,
}

/// Uploads validated file(s) to the backend
#[async_trait]
pub trait UploadAction: Send + Sync {
    async fn upload(&self, files: &[UploadCandidate]) -> anyhow::Result<UploadReceipt>;
}

/// Submits a crosstab analysis over the selected row/column variables
#[async_trait]
pub trait AnalysisAction: Send + Sync {
    async fn run(&self, row_ids: &[String], column_ids: &[String]) -> anyhow::Result<()>;
}

/// Sends one chat turn and returns the assistant's reply text
#[async_trait]
pub trait ChatSendAction: Send + Sync {
    async fn send(&self, content: &str) -> anyhow::Result<String>;
}
