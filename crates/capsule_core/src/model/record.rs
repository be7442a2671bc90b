//! Capsule record model.
//!
//! # Responsibility
//! - Define the persisted `{title, year, memory}` shape.
//! - Validate and normalize form input before it reaches the log.
//!
//! # Invariants
//! - A `Record` built through `Record::new` has three non-empty, trimmed
//!   fields.
//! - Duplicate records are allowed; equality is structural only.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field of a capsule record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Title,
    Year,
    Memory,
}

impl RecordField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Year => "year",
            Self::Memory => "memory",
        }
    }
}

/// Validation failure for submitted record input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    /// The field is empty after trimming.
    EmptyField(RecordField),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "capsule {} must not be empty", field.as_str()),
        }
    }
}

impl Error for RecordValidationError {}

/// One user-submitted film capsule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub year: String,
    pub memory: String,
}

impl Record {
    /// Builds a record from raw form input.
    ///
    /// Fields are trimmed; the first empty field (in title, year, memory
    /// order) is reported.
    pub fn new(
        title: impl AsRef<str>,
        year: impl AsRef<str>,
        memory: impl AsRef<str>,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            title: title.as_ref().trim().to_string(),
            year: year.as_ref().trim().to_string(),
            memory: memory.as_ref().trim().to_string(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks that every field is non-empty after trimming.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        for (field, value) in [
            (RecordField::Title, &self.title),
            (RecordField::Year, &self.year),
            (RecordField::Memory, &self.memory),
        ] {
            if value.trim().is_empty() {
                return Err(RecordValidationError::EmptyField(field));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordField, RecordValidationError};

    #[test]
    fn new_trims_fields() {
        let record = Record::new("  Arrival ", "2016\n", "\tWatched it alone.").unwrap();
        assert_eq!(record.title, "Arrival");
        assert_eq!(record.year, "2016");
        assert_eq!(record.memory, "Watched it alone.");
    }

    #[test]
    fn new_reports_first_blank_field() {
        let err = Record::new("Her", "   ", "").unwrap_err();
        assert_eq!(err, RecordValidationError::EmptyField(RecordField::Year));
        assert_eq!(err.to_string(), "capsule year must not be empty");
    }
}
