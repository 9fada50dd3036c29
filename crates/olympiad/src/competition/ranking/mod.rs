//! Rank tables, score recording, and certificates.

pub mod certificates;
pub mod recorder;
pub mod resolver;
pub mod router;
pub mod tables;

#[cfg(test)]
mod tests;

pub use certificates::{CertificateIndex, CertificateRecord};
pub use recorder::{MarksSubmission, ScoreError, ScoreRecorder, ScoreReport};
pub use resolver::{resolve, resolve_profile};
pub use router::ranking_router;
pub use tables::{RankBand, RankBook, RankBookError, RankTable, RankTableEntry};
