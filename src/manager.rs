use chrono::NaiveDate;
use log::{debug, info};

use crate::error::{AttendanceError, Result};
use crate::models::{AttendanceTable, COUNT_HEADER, PresentStudent};
use crate::resolve::{self, Resolution, TokenWarning};
use crate::store::{AttendanceStore, CsvStore};

/// The format of date column headers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The result of a successful [`AttendanceManager::mark_attendance`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkOutcome {
    /// The date column that was marked, formatted with [`DATE_FORMAT`].
    pub date: String,
    /// Every student with a non-zero value under `date`, in sheet order.
    pub present: Vec<PresentStudent>,
    /// Tokens that were skipped.
    pub warnings: Vec<TokenWarning>,
}

/// The manager for recording and retrieving attendance data.
///
/// Every operation reloads the sheet from the store, so a manager never holds stale rows between
/// calls.
pub struct AttendanceManager<S = CsvStore> {
    store: S,
}

impl<S: AttendanceStore> AttendanceManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an empty sheet if none exists, otherwise adds the `Attendance Count` column to an
    /// existing sheet that lacks it.
    ///
    /// A [`AttendanceError::PermissionFailure`] here means no attendance should be marked.
    pub fn initialize_schema(&self) -> Result<()> {
        if !self.store.exists() {
            info!("No attendance sheet found, creating an empty one");
            return self.store.save(&AttendanceTable::new());
        }

        self.load_table().map(|_| ())
    }

    /// Loads the sheet, persisting the `Attendance Count` column first if it was missing.
    pub fn load_table(&self) -> Result<AttendanceTable> {
        let table = self.store.load()?;
        if table.has_count_column() {
            return Ok(table);
        }

        info!("Adding missing '{COUNT_HEADER}' column to the attendance sheet");
        let table = table.with_count_column();
        self.store.save(&table)?;

        Ok(table)
    }

    /// Retrieves the whole sheet.
    pub fn roster(&self) -> Result<AttendanceTable> {
        self.load_table()
    }

    /// Returns the raw bytes of the persisted sheet.
    pub fn export(&self) -> Result<Vec<u8>> {
        self.store.export()
    }

    /// Adds a student with no attendance to the bottom of the sheet.
    pub fn add_student(&self, roll_number: &str, name: &str) -> Result<()> {
        let roll_number = roll_number.trim();
        let name = name.trim();

        if roll_number.is_empty() {
            return Err(AttendanceError::InvalidStudent(
                "roll number must not be empty".to_string(),
            ));
        }
        if name.is_empty() {
            return Err(AttendanceError::InvalidStudent(format!(
                "name for roll number {roll_number} must not be empty"
            )));
        }

        let mut table = self.load_table()?;
        if table.contains_roll(roll_number) {
            return Err(AttendanceError::DuplicateRoll(roll_number.to_string()));
        }

        table.push_student(roll_number.to_string(), name.to_string());
        self.store.save(&table)?;

        info!("Added student {roll_number} ({name})");
        Ok(())
    }

    /// Marks every student identified by an abbreviated roll token as present on `date`.
    ///
    /// Each marked student's attendance count is incremented and the new count is written under
    /// the `date` column, creating that column if needed. Tokens that match no student or several
    /// students are skipped and reported in [`MarkOutcome::warnings`]. Every token is processed on
    /// its own, so a student named by two tokens is marked twice and ends the day with the second
    /// count under `date`.
    ///
    /// Returns [`AttendanceError::NoValidTokens`] without writing anything if no token matched. An
    /// error while marking any student also leaves the store untouched.
    pub fn mark_attendance<T: AsRef<str>>(
        &self,
        tokens: &[T],
        date: NaiveDate,
    ) -> Result<MarkOutcome> {
        let date = date.format(DATE_FORMAT).to_string();

        let table = self.load_table()?;
        if !table.has_date_column(&date) {
            info!("Adding date column {date}");
        }
        let mut table = table.with_date_column(&date);

        let (rolls, warnings) = resolve_tokens(tokens, &table);
        if rolls.is_empty() {
            return Err(AttendanceError::NoValidTokens { warnings });
        }

        for roll in &rolls {
            let count = table.record_presence(roll, &date)?;
            debug!("Marked {roll} present on {date} (count {count})");
        }

        self.store.save(&table)?;
        info!("Recorded {} presences on {date}", rolls.len());

        Ok(MarkOutcome {
            present: table.present_on(&date),
            date,
            warnings,
        })
    }
}

/// Resolves every token in order, returning one roll number per matched token and a warning for
/// every skipped token.
fn resolve_tokens<T: AsRef<str>>(
    tokens: &[T],
    table: &AttendanceTable,
) -> (Vec<String>, Vec<TokenWarning>) {
    let mut rolls: Vec<String> = Vec::new();
    let mut warnings = Vec::new();

    for token in tokens {
        let token = token.as_ref();

        let warning = match resolve::resolve_abbreviated_roll(token, table) {
            Resolution::Matched(roll) => {
                rolls.push(roll.to_string());
                continue;
            }
            Resolution::NotFound => TokenWarning::NotFound {
                token: token.to_string(),
            },
            Resolution::Ambiguous(matches) => TokenWarning::Ambiguous {
                token: token.to_string(),
                matches: matches.into_iter().map(str::to_string).collect(),
            },
        };

        debug!("Skipping roll token '{token}': {warning}");
        warnings.push(warning);
    }

    (rolls, warnings)
}
