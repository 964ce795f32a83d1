//! Load error types
//!
//! Provides error handling for reading entity files.

use std::fmt;
use std::io;

use crate::record::RowError;

/// Error type for loading an entity file
#[derive(Debug)]
pub enum LoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Malformed CSV (bad quoting, invalid UTF-8, ...)
    Csv(csv::Error),
    /// A row failed validation under the strict row policy
    InvalidRow(RowError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "Load IO error: {}", err),
            LoadError::Csv(err) => write!(f, "CSV error: {}", err),
            LoadError::InvalidRow(err) => write!(f, "Invalid row at {}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Csv(err) => Some(err),
            LoadError::InvalidRow(err) => Some(err),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Csv(err)
    }
}

impl From<RowError> for LoadError {
    fn from(err: RowError) -> Self {
        LoadError::InvalidRow(err)
    }
}
