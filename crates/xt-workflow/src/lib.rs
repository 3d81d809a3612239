//! Workflow coordinators for the crosstab workbench
//!
//! Each coordinator composes the pure pieces from `xt-core` (validation,
//! axis selection, the async operation lifecycle) with one externally
//! supplied action: uploading a data file, running a crosstab analysis, or
//! sending a chat message. Coordinators own their state exclusively; the UI
//! reads it through the public projections and never reaches inside.

pub mod actions;
pub mod chat;
pub mod crosstab;
pub mod upload;

// Re-export commonly used types
pub use actions::{AnalysisAction, ChatSendAction, UploadAction, UploadReceipt};
pub use chat::ChatInterface;
pub use crosstab::CrosstabBuilder;
pub use upload::FileUpload;
