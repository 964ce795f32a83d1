//! CSV row to entity record mapping
//!
//! Rows are mapped by position: `x, y, radius, color, label`. Fields beyond
//! the fifth are ignored. Numbers are validated here so that no NaN or
//! infinite value ever reaches an [`Entity`](crate::Entity).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A validated CSV row describing one circle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub x: f32,
    pub y: f32,
    /// Always finite and strictly positive
    pub radius: f32,
    /// CSS color string, as written in the file
    pub color: String,
    pub label: String,
}

/// Numeric columns of a row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    X,
    Y,
    Radius,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::X => write!(f, "x"),
            Field::Y => write!(f, "y"),
            Field::Radius => write!(f, "radius"),
        }
    }
}

/// Why a row was rejected
#[derive(Clone, Debug, PartialEq)]
pub enum RowErrorKind {
    /// Fewer than the five required columns
    MissingFields { found: usize },
    /// A numeric column that is not a finite number
    InvalidNumber { field: Field, value: String },
    /// Radius of zero or less
    NonPositiveRadius(f32),
}

impl fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowErrorKind::MissingFields { found } => {
                write!(f, "expected 5 fields (x,y,radius,color,label), found {}", found)
            }
            RowErrorKind::InvalidNumber { field, value } => {
                write!(f, "{} is not a finite number: {:?}", field, value)
            }
            RowErrorKind::NonPositiveRadius(radius) => {
                write!(f, "radius must be positive, got {}", radius)
            }
        }
    }
}

/// A rejected row and its 1-based line number in the file
#[derive(Clone, Debug, PartialEq)]
pub struct RowError {
    pub line: u64,
    pub kind: RowErrorKind,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for RowError {}

/// What to do with rows that fail validation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Drop invalid rows and report them alongside the valid ones
    #[default]
    Skip,
    /// Fail the whole load on the first invalid row
    Strict,
}

/// Outcome of parsing a file: the accepted records and the skipped rows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    pub records: Vec<EntityRecord>,
    pub rejected: Vec<RowError>,
}

impl LoadReport {
    /// Number of rows that were skipped
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

impl EntityRecord {
    /// Build a record from raw fields in column order
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, RowErrorKind> {
        if fields.len() < 5 {
            return Err(RowErrorKind::MissingFields { found: fields.len() });
        }

        let x = parse_number(fields[0].as_ref(), Field::X)?;
        let y = parse_number(fields[1].as_ref(), Field::Y)?;
        let radius = parse_number(fields[2].as_ref(), Field::Radius)?;
        if radius <= 0.0 {
            return Err(RowErrorKind::NonPositiveRadius(radius));
        }

        Ok(Self {
            x,
            y,
            radius,
            color: fields[3].as_ref().trim().to_string(),
            label: fields[4].as_ref().trim().to_string(),
        })
    }
}

fn parse_number(raw: &str, field: Field) -> Result<f32, RowErrorKind> {
    let trimmed = raw.trim();
    match trimmed.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RowErrorKind::InvalidNumber {
            field,
            value: trimmed.to_string(),
        }),
    }
}
