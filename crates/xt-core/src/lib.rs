//! Core workflow logic for the crosstab workbench
//!
//! This crate provides the pure building blocks the workbench is assembled
//! from: the variable/message data model, upload validation, the bounded
//! per-axis selection reducer, and the shared async operation lifecycle.

pub mod message;
pub mod operation;
pub mod selection;
pub mod validate;
pub mod variable;

// Re-export commonly used types
pub use message::{Message, Role};
pub use operation::{AsyncOperation, OperationStatus};
pub use selection::{toggle, AxisSelection};
pub use validate::{
    validate, UploadCandidate, ValidationError, ValidationRules, DEFAULT_MAX_SIZE_BYTES,
};
pub use variable::{Variable, VariableType};
