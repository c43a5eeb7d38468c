//! Integration tests for creating and repairing the attendance sheet.

mod common;

use common::{TestEnv, counts, date};
use rollcall::AttendanceStore;

#[test]
fn test_init_creates_sheet_with_base_columns() {
    let env = TestEnv::new();
    assert!(!env.manager.store().exists());

    env.manager.initialize_schema().unwrap();

    assert_eq!(env.contents(), "Roll Number,Name,Attendance Count\n");
    assert!(env.sheet().is_empty());
}

#[test]
fn test_init_twice_is_idempotent() {
    let env = TestEnv::initialized();
    env.add_student("101", "Alice");
    env.mark(&["101"], date(2024, 1, 10));
    let before = env.contents();

    env.manager.initialize_schema().unwrap();
    env.manager.initialize_schema().unwrap();

    assert_eq!(env.contents(), before);
}

#[test]
fn test_init_adds_missing_count_column() {
    let env = TestEnv::with_contents("Roll Number,Name\n101,Alice\n102,Bob\n");

    env.manager.initialize_schema().unwrap();

    assert_eq!(
        env.contents(),
        "Roll Number,Name,Attendance Count\n101,Alice,0\n102,Bob,0\n"
    );
}

#[test]
fn test_mark_heals_missing_count_column_and_keeps_dates() {
    let env = TestEnv::with_contents("Roll Number,Name,2024-01-09\n101,Alice,0\n");

    env.mark(&["101"], date(2024, 1, 10));

    assert_eq!(
        env.contents(),
        "Roll Number,Name,Attendance Count,2024-01-09,2024-01-10\n101,Alice,1,0,1\n"
    );
}

#[test]
fn test_existing_date_column_is_reused() {
    let env = TestEnv::with_contents(
        "Roll Number,Name,Attendance Count,2024-01-10\n101,Alice,4,0\n102,Bob,7,7\n",
    );

    env.mark(&["101"], date(2024, 1, 10));

    let sheet = env.sheet();
    assert_eq!(sheet.date_columns(), ["2024-01-10"]);
    assert_eq!(counts(&sheet, "101", "2024-01-10"), (5, 5));
    assert_eq!(counts(&sheet, "102", "2024-01-10"), (7, 7));
}

#[test]
fn test_columns_in_any_order_are_read() {
    let env =
        TestEnv::with_contents("Name,2024-01-09,Roll Number,Attendance Count\nAlice,1,101,1\n");

    let sheet = env.sheet();

    assert_eq!(sheet.date_columns(), ["2024-01-09"]);
    assert_eq!(counts(&sheet, "101", "2024-01-09"), (1, 1));
    assert_eq!(sheet.get("101").unwrap().name, "Alice");
}

#[test]
fn test_new_student_gets_zero_for_past_dates() {
    let env = TestEnv::initialized();
    env.add_student("101", "Alice");
    env.mark(&["101"], date(2024, 1, 10));

    env.add_student("102", "Bob");

    assert_eq!(counts(&env.sheet(), "102", "2024-01-10"), (0, 0));
}

#[test]
fn test_export_returns_raw_bytes() {
    let env = TestEnv::initialized();
    env.add_student("101", "Alice");

    let bytes = env.manager.export().unwrap();

    assert_eq!(bytes, env.contents().into_bytes());
}
