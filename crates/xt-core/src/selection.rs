//! Bounded multi-select state for one crosstab axis
//!
//! Selection is modelled as a pure reducer over an ordered list of variable
//! ids so it can be tested without any rendering surface. Order reflects
//! selection recency, which is what the FIFO eviction policy keys on; it is
//! not a display order.

/// Apply one toggle to an axis selection, returning the new selection.
///
/// - An id already present is removed, regardless of capacity.
/// - A new id at capacity evicts the oldest selection (index 0) and is
///   appended; selecting beyond capacity always succeeds by displacement.
/// - Otherwise the new id is appended.
///
/// The input is never mutated, so callers can diff old and new states.
pub fn toggle(state: &[String], variable_id: &str, max_selection: Option<usize>) -> Vec<String> {
    let mut next = state.to_vec();

    if let Some(pos) = next.iter().position(|id| id == variable_id) {
        next.remove(pos);
        return next;
    }

    if let Some(max) = max_selection {
        // A zero capacity can never hold a selection
        if max == 0 {
            return next;
        }
        while next.len() >= max {
            next.remove(0);
        }
    }

    next.push(variable_id.to_string());
    next
}

/// Selection state for a single axis (row or column)
///
/// Each axis owns an independent instance; axes never interact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisSelection {
    ids: Vec<String>,
    max_selection: Option<usize>,
}

impl AxisSelection {
    /// Create an empty selection, optionally capacity-bounded
    pub fn new(max_selection: Option<usize>) -> Self {
        Self {
            ids: Vec::new(),
            max_selection,
        }
    }

    /// Toggle a variable id in or out of the selection
    pub fn toggle(&mut self, variable_id: &str) {
        self.ids = toggle(&self.ids, variable_id, self.max_selection);
    }

    /// Selected ids in recency order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, variable_id: &str) -> bool {
        self.ids.iter().any(|id| id == variable_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Remove every selected id
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
