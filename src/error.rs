//! Typed errors raised by the cell engine.
//!
//! Malformed cell text is never an error here: it degrades to an absent value
//! during coercion. Everything in [`CellError`] is either a configuration
//! problem or a caller bug.

use thiserror::Error;

use crate::column::DataType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellError {
    #[error("date converter has not been configured; inject one or call date_converter::install first")]
    DateConverterNotConfigured,
    #[error("a date converter is already installed for this process")]
    ConverterAlreadyInstalled,
    #[error("invalid date format '{0}'")]
    InvalidDateFormat(String),
    #[error("cell value factory requires a decision table model")]
    MissingModel,
    #[error("grid cell holds a {found} value but the column resolves to {expected}")]
    ValueTypeMismatch { expected: DataType, found: &'static str },
    #[error("row {row} has {found} cell(s) but the table defines {expected} column(s)")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type CellResult<T> = std::result::Result<T, CellError>;
