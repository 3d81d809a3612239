//! Variable catalog model
//!
//! Variables are supplied by an already-loaded external catalog; this crate
//! never fetches one. Identity is the `id` field, and uniqueness of ids
//! within a catalog is the supplier's responsibility.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Measurement type of a dataset variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Scale/interval values
    Numeric,

    /// Labelled discrete categories
    Categorical,

    /// Free-form text values
    Text,
}

/// A single variable from the loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Opaque identifier, unique within the supplying catalog
    pub id: String,

    /// Short variable name as stored in the data file
    pub name: String,

    /// Human-readable label shown in selection lists
    pub label: String,

    /// Measurement type
    pub var_type: VariableType,

    /// Value-to-label mapping, when the data file carries one
    #[serde(default)]
    pub value_labels: Option<BTreeMap<String, String>>,

    /// SPSS measurement level string (nominal/ordinal/scale), carried opaquely
    #[serde(default)]
    pub measure: Option<String>,
}

impl Variable {
    /// Create a variable with no value labels or measure metadata
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        var_type: VariableType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: label.into(),
            var_type,
            value_labels: None,
            measure: None,
        }
    }

    /// Label to show in the UI, falling back to the variable name
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}
