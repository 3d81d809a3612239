//! Crosstab builder coordinator
//!
//! Holds one independent axis selection for rows and one for columns.
//! Whether an analysis can run is derived from the selections on every read,
//! never stored, so it can not drift out of sync with them.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use crate::actions::AnalysisAction;
use xt_core::{AsyncOperation, AxisSelection};

/// Coordinates row/column variable selection and analysis dispatch
pub struct CrosstabBuilder {
    rows: AxisSelection,
    columns: AxisSelection,
    action: Arc<dyn AnalysisAction>,
    operation: AsyncOperation<()>,
}

impl CrosstabBuilder {
    /// Create a builder whose axes share the given optional capacity
    pub fn new(
        action: Arc<dyn AnalysisAction>,
        max_selection: Option<usize>,
        runtime: Handle,
    ) -> Self {
        Self {
            rows: AxisSelection::new(max_selection),
            columns: AxisSelection::new(max_selection),
            action,
            operation: AsyncOperation::new(runtime),
        }
    }

    pub fn toggle_row(&mut self, variable_id: &str) {
        self.rows.toggle(variable_id);
    }

    pub fn toggle_column(&mut self, variable_id: &str) {
        self.columns.toggle(variable_id);
    }

    pub fn row_selection(&self) -> &AxisSelection {
        &self.rows
    }

    pub fn column_selection(&self) -> &AxisSelection {
        &self.columns
    }

    /// Derived gate: analysis needs at least one variable on each axis
    pub fn can_run(&self) -> bool {
        !self.rows.is_empty() && !self.columns.is_empty()
    }

    /// Dispatch the analysis over the current selections.
    ///
    /// Returns whether a run was dispatched: both axes must be non-empty and
    /// no run may already be in flight.
    pub fn run(&mut self) -> bool {
        if !self.can_run() {
            return false;
        }

        let row_ids = self.rows.ids().to_vec();
        let column_ids = self.columns.ids().to_vec();
        info!(
            rows = row_ids.len(),
            columns = column_ids.len(),
            "dispatching crosstab analysis"
        );

        let action = self.action.clone();
        self.operation
            .trigger(async move { action.run(&row_ids, &column_ids).await })
    }

    pub fn is_running(&self) -> bool {
        self.operation.is_pending()
    }

    /// Message from a failed analysis call, if the last one failed
    pub fn run_error(&self) -> Option<String> {
        self.operation.error()
    }

    /// Whether the last run settled successfully
    pub fn finished(&self) -> bool {
        self.operation.succeeded()
    }

    /// Clear both selections and any settled run outcome
    pub fn reset(&mut self) {
        self.rows.clear();
        self.columns.clear();
        self.operation.reset();
    }
}
