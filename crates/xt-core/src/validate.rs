//! Upload validation pipeline
//!
//! Pure, synchronous checks applied to a batch of offered files before any
//! network call is made. Rules run in a fixed order and short-circuit on the
//! first failure; each rule is applied to the whole batch, so a mixed
//! valid/invalid batch is rejected wholesale rather than partially accepted.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default maximum upload size: 10 MiB
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// A file offered for upload, as seen by the validator
///
/// Ephemeral: exists only for the duration of validation and dispatch,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadCandidate {
    /// File name including extension
    pub name: String,

    /// Size in bytes
    pub size_bytes: u64,

    /// MIME type when the source of the file reported one
    pub mime: Option<String>,

    /// On-disk location, when the file came from a picker or a drop event.
    /// The validator ignores this; upload actions read contents through it.
    pub path: Option<PathBuf>,
}

impl UploadCandidate {
    /// Build a candidate from an on-disk file
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            mime: None,
            path: Some(path.to_path_buf()),
        })
    }
}

/// Validation configuration for one upload control
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRules {
    /// Whether an empty batch is an error
    pub require_file: bool,

    /// Whether more than one file may be offered at once
    pub allow_multiple: bool,

    /// Accepted type patterns. Patterns starting with `.` match by
    /// case-insensitive filename suffix, anything else by MIME string.
    pub accepted_types: Vec<String>,

    /// Maximum size per file, in bytes
    pub max_size_bytes: u64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            require_file: true,
            allow_multiple: false,
            accepted_types: vec![".sav".to_string()],
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

impl ValidationRules {
    /// The accepted type patterns joined for display in error messages
    pub fn accepted_list(&self) -> String {
        self.accepted_types.join(", ")
    }
}

/// Why a batch of offered files was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file was provided")]
    EmptySelection,

    #[error("Only one file can be uploaded at a time")]
    MultipleNotAllowed,

    #[error("Invalid file type. Accepted types: {accepted}")]
    InvalidType { accepted: String },

    #[error("File exceeds the maximum size of {limit_mib} MiB")]
    SizeExceeded { limit_mib: u64 },
}

/// Validate a batch of offered files against the configured rules.
///
/// Accepted batches are returned unchanged; the caller is responsible for
/// dispatching the actual upload. No side effects, no transformation.
pub fn validate<'a>(
    items: &'a [UploadCandidate],
    rules: &ValidationRules,
) -> Result<&'a [UploadCandidate], ValidationError> {
    if rules.require_file && items.is_empty() {
        return Err(ValidationError::EmptySelection);
    }

    if !rules.allow_multiple && items.len() > 1 {
        return Err(ValidationError::MultipleNotAllowed);
    }

    if !items.iter().all(|item| matches_any_type(item, rules)) {
        return Err(ValidationError::InvalidType {
            accepted: rules.accepted_list(),
        });
    }

    if items.iter().any(|item| item.size_bytes > rules.max_size_bytes) {
        return Err(ValidationError::SizeExceeded {
            limit_mib: rules.max_size_bytes / (1024 * 1024),
        });
    }

    Ok(items)
}

fn matches_any_type(item: &UploadCandidate, rules: &ValidationRules) -> bool {
    rules.accepted_types.iter().any(|pattern| {
        if let Some(suffix) = pattern.strip_prefix('.') {
            item.name
                .to_ascii_lowercase()
                .ends_with(&format!(".{}", suffix.to_ascii_lowercase()))
        } else {
            item.mime
                .as_deref()
                .is_some_and(|mime| mime.eq_ignore_ascii_case(pattern))
        }
    })
}
