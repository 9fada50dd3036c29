//! Persistence seams for participant and coordinator records.
//!
//! The engine talks to storage through these traits only; binaries supply an
//! implementation (the bundled service ships an in-memory one).

use super::roster::domain::{CoordinatorRecord, StudentRecord};

/// Errors shared by every directory implementation.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("a record with this identifier already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Directory of student records, addressed by uid.
pub trait StudentDirectory: Send + Sync {
    fn insert(&self, record: StudentRecord) -> Result<StudentRecord, DirectoryError>;
    fn fetch(&self, uid: &str) -> Result<Option<StudentRecord>, DirectoryError>;
    /// Replaces an existing record wholesale. Fails with `NotFound` when no
    /// record carries the uid.
    fn update(&self, record: StudentRecord) -> Result<(), DirectoryError>;
    /// Every record, in insertion order.
    fn all(&self) -> Result<Vec<StudentRecord>, DirectoryError>;
}

/// Directory of coordinator records, addressed by uid.
pub trait CoordinatorDirectory: Send + Sync {
    fn insert(&self, record: CoordinatorRecord) -> Result<CoordinatorRecord, DirectoryError>;
    fn fetch(&self, uid: &str) -> Result<Option<CoordinatorRecord>, DirectoryError>;
    fn update(&self, record: CoordinatorRecord) -> Result<(), DirectoryError>;
    fn all(&self) -> Result<Vec<CoordinatorRecord>, DirectoryError>;
}
