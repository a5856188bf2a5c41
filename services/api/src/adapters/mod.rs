//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the `RecordStore` port, one per storage engine.

pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use chrono::NaiveDate;
use medilog_core::domain::RecordDraft;

/// The example rows inserted when the table is found empty at startup.
/// The test suite uses the same fixture.
pub fn seed_drafts() -> Vec<RecordDraft> {
    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    vec![
        RecordDraft {
            medicine: "Aspirin".to_string(),
            dosage: "100mg".to_string(),
            duration: "30 days".to_string(),
            start_date: date(2024, 1, 5),
            end_date: date(2024, 2, 4),
            condition: Some("Mild headache".to_string()),
        },
        RecordDraft {
            medicine: "Amoxicillin".to_string(),
            dosage: "500mg".to_string(),
            duration: "7 days".to_string(),
            start_date: date(2024, 3, 10),
            end_date: date(2024, 3, 17),
            condition: Some("Throat infection".to_string()),
        },
        RecordDraft {
            medicine: "Vitamin D".to_string(),
            dosage: "1000 IU".to_string(),
            duration: "90 days".to_string(),
            start_date: date(2024, 2, 1),
            end_date: date(2024, 5, 1),
            condition: None,
        },
    ]
}
