//! File upload coordinator
//!
//! Validation happens entirely on this side of the wire: a rejected batch
//! never reaches the upload action, and the rejection reason is held locally
//! for inline display next to the upload control.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::actions::{UploadAction, UploadReceipt};
use xt_core::{validate, AsyncOperation, UploadCandidate, ValidationError, ValidationRules};

/// Coordinates validation and dispatch for the file upload control
pub struct FileUpload {
    rules: ValidationRules,
    action: Arc<dyn UploadAction>,
    operation: AsyncOperation<UploadReceipt>,
    validation_error: Option<ValidationError>,
}

impl FileUpload {
    pub fn new(action: Arc<dyn UploadAction>, rules: ValidationRules, runtime: Handle) -> Self {
        Self {
            rules,
            action,
            operation: AsyncOperation::new(runtime),
            validation_error: None,
        }
    }

    /// Validate the offered batch and dispatch the upload if it is accepted.
    ///
    /// Returns whether an upload was dispatched. On rejection the reason is
    /// stored locally and no network call is made; on acceptance a prior
    /// rejection is cleared. A submit while an upload is in flight is
    /// ignored.
    pub fn submit(&mut self, files: Vec<UploadCandidate>) -> bool {
        match validate(&files, &self.rules) {
            Err(reason) => {
                warn!(%reason, "upload batch rejected");
                self.validation_error = Some(reason);
                false
            }
            Ok(_) => {
                self.validation_error = None;
                info!(count = files.len(), "dispatching upload");

                let action = self.action.clone();
                self.operation
                    .trigger(async move { action.upload(&files).await })
            }
        }
    }

    /// The rules this control validates against
    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Why the last offered batch was rejected, if it was
    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.operation.is_pending()
    }

    /// Message from a failed upload call, if the last one failed
    pub fn upload_error(&self) -> Option<String> {
        self.operation.error()
    }

    /// Receipt from the last successful upload, if any
    pub fn receipt(&self) -> Option<UploadReceipt> {
        self.operation.result()
    }

    /// Clear any settled outcome and rejection, making the control fresh
    pub fn reset(&mut self) {
        self.validation_error = None;
        self.operation.reset();
    }
}
