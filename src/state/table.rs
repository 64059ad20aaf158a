//! Rows and selection for one resource table

use chrono::{DateTime, Utc};

use crate::core::Record;

/// The rows bound to a visible table.
///
/// Only the render loop writes to this. Every successful refresh replaces
/// the rows wholesale; a failed refresh leaves them as they were.
#[derive(Debug, Clone)]
pub struct ResourceTable<R> {
    rows: Vec<R>,
    selected: Option<usize>,
    last_error: Option<String>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl<R> Default for ResourceTable<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            selected: None,
            last_error: None,
            refreshed_at: None,
        }
    }
}

impl<R: Record> ResourceTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Selected row index, always `< len()` when present
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&R> {
        self.selected.and_then(|idx| self.rows.get(idx))
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected_row().map(|r| r.id().to_string())
    }

    /// Error from the most recent refresh, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Replace all rows with a new snapshot, keeping the selection in range
    pub fn reconcile(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.last_error = None;
        self.refreshed_at = Some(Utc::now());
        self.selected = self.clamp(self.selected);
    }

    /// Note a failed refresh without touching rows or selection
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Select a row by index, clamped to the current rows
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = match index {
            Some(idx) if !self.rows.is_empty() => Some(idx.min(self.rows.len() - 1)),
            _ => None,
        };
    }

    /// Move selection down
    pub fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.rows.len() => i + 1,
            _ => 0,
        });
    }

    /// Move selection up
    pub fn previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        });
    }

    fn clamp(&self, selected: Option<usize>) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        Some(selected.map_or(0, |idx| idx.min(self.rows.len() - 1)))
    }
}
