//! Persistence for the attendance sheet.
//!
//! The sheet is always read and written whole. [`CsvStore`] keeps it in a single CSV file with a
//! header row, and replaces that file in one rename when saving.

use log::debug;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{AttendanceError, Result};
use crate::models::{AttendanceTable, COUNT_HEADER, NAME_HEADER, ROLL_NUMBER_HEADER, StudentRecord};

/// Somewhere the attendance sheet can be loaded from and saved to.
pub trait AttendanceStore {
    /// Returns `true` if a sheet has been persisted.
    fn exists(&self) -> bool;

    /// Loads the whole sheet.
    fn load(&self) -> Result<AttendanceTable>;

    /// Replaces the persisted sheet with `table`.
    fn save(&self, table: &AttendanceTable) -> Result<()>;

    /// Returns the raw persisted bytes, suitable for handing to a user as a download.
    fn export(&self) -> Result<Vec<u8>>;
}

/// An [`AttendanceStore`] backed by a CSV file.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A sheet that exists but cannot be read is locked or off limits. Windows reports a sheet
    /// open in another program as a sharing violation rather than `PermissionDenied`.
    fn read_error(&self, err: io::Error) -> AttendanceError {
        if err.kind() == io::ErrorKind::NotFound {
            AttendanceError::Unexpected(format!("reading {}: {err}", self.path.display()))
        } else {
            AttendanceError::permission(&self.path, err)
        }
    }

    fn write_error(&self, err: io::Error) -> AttendanceError {
        AttendanceError::permission(&self.path, err)
    }
}

impl AttendanceStore for CsvStore {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> Result<AttendanceTable> {
        let bytes = fs::read(&self.path).map_err(|err| self.read_error(err))?;
        let table = decode(&bytes).map_err(|err| {
            AttendanceError::Unexpected(format!("reading {}: {err}", self.path.display()))
        })?;

        debug!(
            "Loaded {} students and {} date columns from {}",
            table.len(),
            table.date_columns().len(),
            self.path.display()
        );

        Ok(table)
    }

    fn save(&self, table: &AttendanceTable) -> Result<()> {
        // Nothing touches the sheet until the whole new version is on disk next to it.
        let bytes = encode(table).map_err(|err| {
            AttendanceError::Unexpected(format!("writing {}: {err}", self.path.display()))
        })?;

        // The sheet is replaced by a rename, which a read-only sheet would not stop on its own.
        let permissions = match OpenOptions::new().write(true).open(&self.path) {
            Ok(file) => Some(file.metadata().map_err(|err| self.write_error(err))?.permissions()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(self.write_error(err)),
        };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(|err| self.write_error(err))?;
        temp.write_all(&bytes)
            .map_err(|err| self.write_error(err))?;
        if let Some(permissions) = permissions {
            temp.as_file()
                .set_permissions(permissions)
                .map_err(|err| self.write_error(err))?;
        }
        temp.persist(&self.path)
            .map_err(|err| self.write_error(err.error))?;

        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());

        Ok(())
    }

    fn export(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|err| self.read_error(err))
    }
}

/// The ways a CSV attendance sheet can be malformed.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("invalid value '{value}' in column '{column}' for roll number {roll_number}")]
    InvalidNumber {
        column: String,
        roll_number: String,
        value: String,
    },

    #[error("duplicate roll number {0}")]
    DuplicateRoll(String),
}

/// Parses a CSV attendance sheet.
///
/// Any header other than the three base headers is treated as a date column. Empty count and date
/// cells read as 0.
pub fn decode(bytes: &[u8]) -> std::result::Result<AttendanceTable, DecodeError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|header| header == name);

    let roll_index =
        position(ROLL_NUMBER_HEADER).ok_or(DecodeError::MissingColumn(ROLL_NUMBER_HEADER))?;
    let name_index = position(NAME_HEADER).ok_or(DecodeError::MissingColumn(NAME_HEADER))?;
    let count_index = position(COUNT_HEADER);

    let date_indices: Vec<usize> = (0..headers.len())
        .filter(|&index| index != roll_index && index != name_index && Some(index) != count_index)
        .collect();
    let date_columns: Vec<String> = date_indices
        .iter()
        .map(|&index| headers[index].to_string())
        .collect();

    let mut rows: Vec<StudentRecord> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |index: usize| record.get(index).unwrap_or("").trim();

        let roll_number = field(roll_index).to_string();
        if rows.iter().any(|row| row.roll_number == roll_number) {
            return Err(DecodeError::DuplicateRoll(roll_number));
        }

        let number = |index: usize| -> std::result::Result<u32, DecodeError> {
            parse_count(field(index)).ok_or_else(|| DecodeError::InvalidNumber {
                column: headers[index].to_string(),
                roll_number: roll_number.clone(),
                value: field(index).to_string(),
            })
        };

        let attendance_count = match count_index {
            Some(index) => number(index)?,
            None => 0,
        };
        let marks = date_indices
            .iter()
            .map(|&index| number(index))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.push(StudentRecord::new(
            roll_number.clone(),
            field(name_index).to_string(),
            attendance_count,
            marks,
        ));
    }

    Ok(AttendanceTable::from_parts(count_index.is_some(), date_columns, rows))
}

/// Serializes the sheet as CSV with columns in their canonical order.
pub fn encode(table: &AttendanceTable) -> std::result::Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut headers = vec![ROLL_NUMBER_HEADER, NAME_HEADER];
    if table.has_count_column() {
        headers.push(COUNT_HEADER);
    }
    headers.extend(table.date_columns().iter().map(String::as_str));
    writer.write_record(&headers)?;

    for row in table.rows() {
        let mut record = vec![row.roll_number.clone(), row.name.clone()];
        if table.has_count_column() {
            record.push(row.attendance_count.to_string());
        }
        record.extend(row.marks().iter().map(u32::to_string));
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(io::Error::other(err.to_string())))
}

/// Parses a count cell. Empty cells are 0, and whole numbers written as `3.0` by spreadsheet tools
/// are accepted.
fn parse_count(value: &str) -> Option<u32> {
    if value.is_empty() {
        return Some(0);
    }

    value.parse::<u32>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|float| float.fract() == 0.0 && *float >= 0.0 && *float <= u32::MAX as f64)
            .map(|float| float as u32)
    })
}
