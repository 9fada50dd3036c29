//! Student and coordinator records plus CSV roster intake.

pub mod domain;
pub mod intake;
pub mod router;

pub use domain::{
    ApprovalStatus, CoordinatorRecord, PaymentStatus, RankProfile, RankResult, RankStanding,
    Scope, ScoreEntry, StudentRecord, TestKind,
};
pub use intake::{ImportSummary, RejectedRow, RosterImportError, RosterImporter};
pub use router::roster_router;
