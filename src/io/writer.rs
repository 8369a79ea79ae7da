//! Roster and pairing output tables.

use crate::roster::duty::Duty;
use crate::roster::extract::RosterAssignment;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::Path;

/// An output table could not be written
#[derive(Debug)]
pub struct WriterError {
    pub path: String,
    pub message: String,
}

impl Display for WriterError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "Could not write table '{}': {}", self.path, self.message)
    }
}

/// One row per generated duty.
pub fn write_pairings(path: &str, duties: &[Duty]) -> Result<(), WriterError> {
    write_rows(path, duties)
}

/// One row per assignment of the accepted roster.
pub fn write_schedule(path: &str, assignments: &[RosterAssignment]) -> Result<(), WriterError> {
    write_rows(path, assignments)
}

fn write_rows<R: Serialize>(path: &str, rows: &[R]) -> Result<(), WriterError> {
    let as_error = |message: String| WriterError {
        path: path.to_owned(),
        message,
    };

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| as_error(e.to_string()))?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| as_error(e.to_string()))?;
    for row in rows {
        writer.serialize(row).map_err(|e| as_error(e.to_string()))?;
    }

    writer.flush().map_err(|e| as_error(e.to_string()))
}
