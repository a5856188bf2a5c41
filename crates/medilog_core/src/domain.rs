//! crates/medilog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};

/// A single medication entry as stored by the application.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecord {
    pub id: i64,
    pub medicine: String,
    pub dosage: String,
    pub duration: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub condition: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The client-supplied subset of a record: the six user fields, without the
/// store-assigned id and timestamps. Used for both inserts and full replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub medicine: String,
    pub dosage: String,
    pub duration: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub condition: Option<String>,
}

/// A validation failure for a submitted draft.
///
/// Messages are surfaced verbatim to the caller, so they name fields the way
/// they appear on the wire (snake_case).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The '{0}' field is required")]
    MissingField(&'static str),
    #[error("start_date must not be after end_date")]
    DateOrder,
}

impl RecordDraft {
    /// Checks that every required field is present and that the date range is
    /// well ordered. An empty `condition` is allowed; callers normalize empty
    /// strings to `None` before building the draft.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.medicine.trim().is_empty() {
            return Err(ValidationError::MissingField("medicine"));
        }
        if self.dosage.trim().is_empty() {
            return Err(ValidationError::MissingField("dosage"));
        }
        if self.duration.trim().is_empty() {
            return Err(ValidationError::MissingField("duration"));
        }
        if self.start_date > self.end_date {
            return Err(ValidationError::DateOrder);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecordDraft {
        RecordDraft {
            medicine: "Ibuprofen".to_string(),
            dosage: "200mg".to_string(),
            duration: "5 days".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 11, 6).unwrap(),
            condition: Some("Pain".to_string()),
        }
    }

    #[test]
    fn accepts_a_complete_draft() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn accepts_a_single_day_range() {
        let mut d = draft();
        d.end_date = d.start_date;
        assert_eq!(d.validate(), Ok(()));
    }

    #[test]
    fn accepts_a_missing_condition() {
        let mut d = draft();
        d.condition = None;
        assert_eq!(d.validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_required_fields() {
        for field in ["medicine", "dosage", "duration"] {
            let mut d = draft();
            match field {
                "medicine" => d.medicine = "   ".to_string(),
                "dosage" => d.dosage = String::new(),
                _ => d.duration = String::new(),
            }
            assert_eq!(d.validate(), Err(ValidationError::MissingField(field)));
        }
    }

    #[test]
    fn rejects_an_inverted_date_range() {
        let mut d = draft();
        d.start_date = NaiveDate::from_ymd_opt(2024, 11, 10).unwrap();
        d.end_date = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        assert_eq!(d.validate(), Err(ValidationError::DateOrder));
    }
}
