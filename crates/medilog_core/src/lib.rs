pub mod domain;
pub mod ports;

pub use domain::{MedicalRecord, RecordDraft, ValidationError};
pub use ports::{RecordStore, StoreError, StoreResult};
