//! Change notifications from a model to whatever is displaying it.

use quentier_core::validation::ValidationError;
use std::fmt;
use thiserror::Error;

/// Broad category of a reported model error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorKind {
    /// Input rejected before anything was sent to storage.
    Validation,
    /// Storage reported a failure.
    Backend,
    /// The model's own bookkeeping disagreed with itself.
    Internal,
}

impl fmt::Display for ModelErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelErrorKind::Validation => "validation error",
            ModelErrorKind::Backend => "storage error",
            ModelErrorKind::Internal => "internal error",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ModelError {
    pub kind: ModelErrorKind,
    pub message: String,
}

impl ModelError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ModelErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            kind: ModelErrorKind::Backend,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ModelErrorKind::Internal,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ModelError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

/// Inclusive rectangle of cells whose values changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: usize,
    pub last_row: usize,
    pub first_column: usize,
    pub last_column: usize,
}

impl CellRange {
    pub fn cell(row: usize, column: usize) -> Self {
        Self {
            first_row: row,
            last_row: row,
            first_column: column,
            last_column: column,
        }
    }
}

/// Receives row/layout notifications.
///
/// Row ranges are inclusive. Every `*_about_to_*` call is followed by its
/// matching completion call before the model returns control.
#[allow(unused_variables)]
pub trait ModelObserver {
    fn rows_about_to_be_inserted(&mut self, first: usize, last: usize) {}
    fn rows_inserted(&mut self, first: usize, last: usize) {}
    fn rows_about_to_be_removed(&mut self, first: usize, last: usize) {}
    fn rows_removed(&mut self, first: usize, last: usize) {}
    fn data_changed(&mut self, range: CellRange) {}
    fn layout_about_to_change(&mut self) {}
    fn layout_changed(&mut self) {}
    /// Every kind has been listed to its last page.
    fn all_items_listed(&mut self) {}
    fn error(&mut self, error: &ModelError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ModelObserver for NoopObserver {}
