//! Shared test infrastructure for the attendance integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use rollcall::store::{decode, encode};
use rollcall::{
    AttendanceError, AttendanceManager, AttendanceStore, AttendanceTable, CsvStore, MarkOutcome,
};
use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with a CSV sheet in a temporary directory.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub manager: AttendanceManager,
}

impl TestEnv {
    /// Creates an environment whose sheet does not exist yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path().join("attendance.csv"));
        Self {
            temp_dir,
            manager: AttendanceManager::new(store),
        }
    }

    /// Creates an environment with an initialized, empty sheet.
    pub fn initialized() -> Self {
        let env = Self::new();
        env.manager
            .initialize_schema()
            .expect("Failed to initialize schema");
        env
    }

    /// Creates an environment whose sheet file starts with `contents`.
    pub fn with_contents(contents: &str) -> Self {
        let env = Self::new();
        fs::write(env.path(), contents).expect("Failed to write sheet");
        env
    }

    pub fn path(&self) -> PathBuf {
        self.manager.store().path().to_path_buf()
    }

    pub fn contents(&self) -> String {
        fs::read_to_string(self.path()).expect("Failed to read sheet")
    }

    pub fn add_student(&self, roll_number: &str, name: &str) {
        self.manager
            .add_student(roll_number, name)
            .expect("Failed to add student");
    }

    pub fn mark(&self, tokens: &[&str], date: NaiveDate) -> MarkOutcome {
        self.manager
            .mark_attendance(tokens, date)
            .expect("Failed to mark attendance")
    }

    pub fn sheet(&self) -> AttendanceTable {
        self.manager.roster().expect("Failed to load sheet")
    }
}

/// Returns the attendance count and the value under `date` for `roll_number`.
pub fn counts(sheet: &AttendanceTable, roll_number: &str, date: &str) -> (u32, u32) {
    let row = sheet.get(roll_number).expect("Student should exist");
    (row.attendance_count, sheet.date_value(row, date))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Invalid date")
}

/// An in-memory store whose saves can be made to fail as if the file were locked.
#[derive(Default)]
pub struct MemoryStore {
    bytes: RefCell<Option<Vec<u8>>>,
    locked: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn lock(&self) {
        self.locked.set(true);
    }

    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes.borrow().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl AttendanceStore for MemoryStore {
    fn exists(&self) -> bool {
        self.bytes.borrow().is_some()
    }

    fn load(&self) -> rollcall::error::Result<AttendanceTable> {
        let bytes = self.export()?;
        decode(&bytes).map_err(|err| AttendanceError::Unexpected(err.to_string()))
    }

    fn save(&self, table: &AttendanceTable) -> rollcall::error::Result<()> {
        if self.locked.get() {
            return Err(AttendanceError::PermissionFailure {
                path: PathBuf::from("memory"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }

        let bytes = encode(table).map_err(|err| AttendanceError::Unexpected(err.to_string()))?;
        self.bytes.replace(Some(bytes));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn export(&self) -> rollcall::error::Result<Vec<u8>> {
        self.bytes()
            .ok_or_else(|| AttendanceError::Unexpected("reading memory: no sheet".to_string()))
    }
}
