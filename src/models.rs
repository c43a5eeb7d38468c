//! The in-memory attendance table: a fixed set of student columns plus one integer column per date.

use crate::error::{AttendanceError, Result};

/// Header of the roll number column in the attendance file.
pub const ROLL_NUMBER_HEADER: &str = "Roll Number";
/// Header of the student name column in the attendance file.
pub const NAME_HEADER: &str = "Name";
/// Header of the cumulative attendance counter column in the attendance file.
pub const COUNT_HEADER: &str = "Attendance Count";

/// A single student's row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub roll_number: String,
    pub name: String,
    pub attendance_count: u32,
    /// One value per date column of the owning table, in the same order.
    marks: Vec<u32>,
}

impl StudentRecord {
    pub(crate) fn new(
        roll_number: String,
        name: String,
        attendance_count: u32,
        marks: Vec<u32>,
    ) -> Self {
        Self {
            roll_number,
            name,
            attendance_count,
            marks,
        }
    }

    /// The values of every date column for this student, aligned with
    /// [`AttendanceTable::date_columns`].
    pub fn marks(&self) -> &[u32] {
        &self.marks
    }
}

/// A row of the present-students view for a single date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentStudent {
    pub roll_number: String,
    pub name: String,
    /// The value of the date column, which is the attendance count at the time of marking.
    pub date_value: u32,
    pub attendance_count: u32,
}

/// The whole attendance sheet.
///
/// Columns are `Roll Number`, `Name`, `Attendance Count`, followed by date columns in the order
/// they were first introduced. Sheets loaded from older files may lack the `Attendance Count`
/// column until [`AttendanceTable::with_count_column`] is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceTable {
    has_count_column: bool,
    date_columns: Vec<String>,
    rows: Vec<StudentRecord>,
}

impl AttendanceTable {
    /// Creates an empty sheet with only the three base columns.
    pub fn new() -> Self {
        Self {
            has_count_column: true,
            date_columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        has_count_column: bool,
        date_columns: Vec<String>,
        rows: Vec<StudentRecord>,
    ) -> Self {
        debug_assert!(rows.iter().all(|row| row.marks.len() == date_columns.len()));

        Self {
            has_count_column,
            date_columns,
            rows,
        }
    }

    pub fn has_count_column(&self) -> bool {
        self.has_count_column
    }

    pub fn date_columns(&self) -> &[String] {
        &self.date_columns
    }

    pub fn rows(&self) -> &[StudentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_date_column(&self, date: &str) -> bool {
        self.date_index(date).is_some()
    }

    pub fn contains_roll(&self, roll_number: &str) -> bool {
        self.rows.iter().any(|row| row.roll_number == roll_number)
    }

    pub fn get(&self, roll_number: &str) -> Option<&StudentRecord> {
        self.rows.iter().find(|row| row.roll_number == roll_number)
    }

    /// Returns the value of the `date` column for `row`, or 0 if there is no such column.
    pub fn date_value(&self, row: &StudentRecord, date: &str) -> u32 {
        self.date_index(date)
            .and_then(|index| row.marks.get(index).copied())
            .unwrap_or(0)
    }

    /// Returns the sheet with an `Attendance Count` column, every count defaulting to 0.
    ///
    /// Sheets that already have the column are returned unchanged.
    pub fn with_count_column(mut self) -> Self {
        if !self.has_count_column {
            for row in &mut self.rows {
                row.attendance_count = 0;
            }
            self.has_count_column = true;
        }
        self
    }

    /// Returns the sheet with a column named `date`, every value defaulting to 0.
    ///
    /// Sheets that already have the column are returned unchanged.
    pub fn with_date_column(mut self, date: &str) -> Self {
        if !self.has_date_column(date) {
            self.date_columns.push(date.to_string());
            for row in &mut self.rows {
                row.marks.push(0);
            }
        }
        self
    }

    /// Appends a student with a zero count and zero in every date column.
    pub(crate) fn push_student(&mut self, roll_number: String, name: String) {
        let marks = vec![0; self.date_columns.len()];
        self.rows.push(StudentRecord::new(roll_number, name, 0, marks));
    }

    /// Increments the student's attendance count and copies the new count into the `date` column.
    ///
    /// Returns the new count. Fails without changing the row if the student or the column does not
    /// exist, or if the count cannot grow any further.
    pub(crate) fn record_presence(&mut self, roll_number: &str, date: &str) -> Result<u32> {
        let index = self.date_index(date).ok_or_else(|| {
            AttendanceError::Unexpected(format!("marking attendance: no column for {date}"))
        })?;
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.roll_number == roll_number)
            .ok_or_else(|| {
                AttendanceError::Unexpected(format!(
                    "marking attendance: roll number {roll_number} is missing from the sheet"
                ))
            })?;

        let count = row.attendance_count.checked_add(1).ok_or_else(|| {
            AttendanceError::Unexpected(format!(
                "marking attendance: attendance count of roll number {roll_number} is already {}",
                row.attendance_count
            ))
        })?;

        row.attendance_count = count;
        row.marks[index] = count;

        Ok(count)
    }

    /// Projects every student with a non-zero value under `date`, in row order.
    pub fn present_on(&self, date: &str) -> Vec<PresentStudent> {
        let Some(index) = self.date_index(date) else {
            return Vec::new();
        };

        self.rows
            .iter()
            .filter(|row| row.marks[index] > 0)
            .map(|row| PresentStudent {
                roll_number: row.roll_number.clone(),
                name: row.name.clone(),
                date_value: row.marks[index],
                attendance_count: row.attendance_count,
            })
            .collect()
    }

    fn date_index(&self, date: &str) -> Option<usize> {
        self.date_columns.iter().position(|column| column == date)
    }
}

impl Default for AttendanceTable {
    fn default() -> Self {
        Self::new()
    }
}
