//! The error taxonomy returned by the store and the [`AttendanceManager`].
//!
//! [`AttendanceManager`]: crate::manager::AttendanceManager

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::resolve::TokenWarning;

pub type Result<T> = std::result::Result<T, AttendanceError>;

#[derive(Debug, Error)]
pub enum AttendanceError {
    /// The attendance file could not be read or written.
    #[error(
        "Permission denied when accessing {}. Ensure the file is not open elsewhere and you have write permissions.",
        .path.display()
    )]
    PermissionFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// None of the submitted roll numbers resolved to exactly one student.
    #[error("No valid roll numbers matched. Attendance not marked.")]
    NoValidTokens { warnings: Vec<TokenWarning> },

    #[error("Roll number {0} already exists")]
    DuplicateRoll(String),

    #[error("Invalid student: {0}")]
    InvalidStudent(String),

    /// Anything else, such as malformed data in the attendance file.
    #[error("An error occurred while {0}")]
    Unexpected(String),
}

impl AttendanceError {
    pub(crate) fn permission(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::PermissionFailure {
            path: path.into(),
            source,
        }
    }
}
