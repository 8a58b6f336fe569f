//! Error types for vehicle spec parsing.

use std::fmt;

/// Errors that can occur while parsing the vehicle spec table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// The input had no header row.
    EmptyInput,
    /// A required column was not present in the header.
    MissingColumn { column: &'static str },
    /// The CSV reader rejected a record.
    Malformed { line: Option<u64>, message: String },
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "vehicle data is empty"),
            Self::MissingColumn { column } => {
                write!(f, "vehicle data is missing the '{column}' column")
            }
            Self::Malformed {
                line: Some(line),
                message,
            } => write!(f, "malformed vehicle data on line {line}: {message}"),
            Self::Malformed {
                line: None,
                message,
            } => write!(f, "malformed vehicle data: {message}"),
        }
    }
}

impl std::error::Error for SpecError {}

impl From<csv::Error> for SpecError {
    fn from(e: csv::Error) -> Self {
        Self::Malformed {
            line: e.position().map(csv::Position::line),
            message: e.to_string(),
        }
    }
}

/// Result type for spec parsing.
pub type SpecResult<T> = Result<T, SpecError>;
