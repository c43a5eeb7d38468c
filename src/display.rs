use tabled::Table;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::manager::MarkOutcome;
use crate::models::{
    AttendanceTable, COUNT_HEADER, NAME_HEADER, PresentStudent, ROLL_NUMBER_HEADER,
};
use crate::resolve::TokenWarning;

/// Shown instead of an empty table when nobody has a non-zero value for the marked date.
pub const NO_STUDENTS_PRESENT: &str =
    "No students marked as present. Check if roll numbers exist in the database.";

/// Builds the present-students table for `date`.
pub fn present_table(date: &str, present: &[PresentStudent]) -> Table {
    let mut builder = Builder::default();
    builder.push_record([ROLL_NUMBER_HEADER, NAME_HEADER, date, COUNT_HEADER].map(String::from));

    for student in present {
        builder.push_record([
            student.roll_number.clone(),
            student.name.clone(),
            student.date_value.to_string(),
            student.attendance_count.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table
}

/// Renders the result of marking attendance.
pub fn render_mark_outcome(outcome: &MarkOutcome) -> String {
    let date = &outcome.date;

    if outcome.present.is_empty() {
        return format!("Attendance marked for {date}\nWarning: {NO_STUDENTS_PRESENT}");
    }

    let table = present_table(date, &outcome.present);
    format!("Attendance marked for {date}\nStudents present for {date}:\n{table}")
}

/// Renders every column of the attendance sheet.
pub fn render_roster(sheet: &AttendanceTable) -> String {
    let mut builder = Builder::default();

    let mut headers = vec![ROLL_NUMBER_HEADER.to_string(), NAME_HEADER.to_string()];
    if sheet.has_count_column() {
        headers.push(COUNT_HEADER.to_string());
    }
    headers.extend(sheet.date_columns().iter().cloned());
    builder.push_record(headers);

    for row in sheet.rows() {
        let mut record = vec![row.roll_number.clone(), row.name.clone()];
        if sheet.has_count_column() {
            record.push(row.attendance_count.to_string());
        }
        record.extend(row.marks().iter().map(u32::to_string));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern());

    format!("Roster:\n{table}")
}

/// Prints skipped-token warnings to stderr.
pub fn show_warnings(warnings: &[TokenWarning]) {
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}
