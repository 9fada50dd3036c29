//! Score recording and rank refresh.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::certificates::{self, CertificateIndex, CertificateRecord};
use super::resolver;
use super::tables::RankBook;
use crate::competition::clock::Clock;
use crate::competition::random::RandomSource;
use crate::competition::roster::domain::{RankProfile, ScoreEntry, TestKind};
use crate::competition::store::{DirectoryError, StudentDirectory};

/// Marks payload accepted from the test player.
///
/// Clients have been seen sending numeric fields as strings, so `score` and
/// `total` accept either shape.
#[derive(Debug, Clone, Deserialize)]
pub struct MarksSubmission {
    #[serde(rename = "type")]
    pub kind: TestKind,
    #[serde(deserialize_with = "numeric_field")]
    pub score: u32,
    #[serde(deserialize_with = "numeric_field")]
    pub total: u32,
}

fn numeric_field<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(u32),
        Text(String),
    }

    match Wire::deserialize(deserializer)? {
        Wire::Number(value) => Ok(value),
        Wire::Text(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| serde::de::Error::custom(format!("'{raw}' is not a whole number"))),
    }
}

/// Outcome returned to the caller once a submission has been scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub uid: String,
    pub kind: TestKind,
    pub test_id: String,
    pub entry: ScoreEntry,
    pub ranks: RankProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_code: Option<String>,
}

/// Failures raised while recording a submission.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("score {score} exceeds the submitted total {total}")]
    ScoreAboveTotal { score: u32, total: u32 },
    #[error("total {total} exceeds the {kind} test maximum of {max}")]
    TotalAboveMaximum { kind: TestKind, total: u32, max: u32 },
    #[error("student {0} not found")]
    StudentNotFound(String),
    #[error("certificate {0} not found")]
    CertificateNotFound(String),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Records score entries, refreshes per-kind rank profiles, and issues
/// certificates for completed live tests.
pub struct ScoreRecorder<S, C> {
    students: Arc<S>,
    certificates: Arc<C>,
    book: Arc<RankBook>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl<S, C> ScoreRecorder<S, C>
where
    S: StudentDirectory + 'static,
    C: CertificateIndex + 'static,
{
    pub fn new(
        students: Arc<S>,
        certificates: Arc<C>,
        book: Arc<RankBook>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        ScoreRecorder {
            students,
            certificates,
            book,
            random,
            clock,
        }
    }

    /// Records one submission for a student.
    ///
    /// The score entry is written before ranks are resolved; when the write
    /// fails the student keeps their previous rank profile. A live test
    /// taken at the full total also issues a certificate and marks the
    /// student as done with the competition.
    pub fn record(&self, uid: &str, submission: MarksSubmission) -> Result<ScoreReport, ScoreError> {
        let MarksSubmission { kind, score, total } = submission;
        let max = kind.max_score();
        if total > max {
            return Err(ScoreError::TotalAboveMaximum { kind, total, max });
        }
        if score > total {
            return Err(ScoreError::ScoreAboveTotal { score, total });
        }

        let mut student = self
            .students
            .fetch(uid)?
            .ok_or_else(|| ScoreError::StudentNotFound(uid.to_string()))?;

        let entry = ScoreEntry {
            score,
            total,
            recorded_at: self.clock.now(),
        };
        let test_id = format!("test-{}", Uuid::new_v4());
        let completed_live = kind == TestKind::Live && total == max;

        student
            .marks
            .entry(kind)
            .or_default()
            .insert(test_id.clone(), entry.clone());
        if kind == TestKind::Mock {
            student.practice_tests_attempted += 1;
        }
        if completed_live {
            student.test_completed = true;
        }
        self.students.update(student.clone())?;

        let ranks = resolver::resolve_profile(score, kind, &self.book, self.random.as_ref());
        student.ranks.insert(kind, ranks.clone());

        let mut certificate_code = None;
        if completed_live {
            let certificate = CertificateRecord {
                code: certificates::generate_code(),
                student_uid: student.uid.clone(),
                student_name: student.name.clone(),
                rankings: ranks.clone(),
                issued_at: entry.recorded_at,
            };
            self.certificates.insert(certificate.clone())?;
            student.certificate_codes.push(certificate.code.clone());
            certificate_code = Some(certificate.code);
        }

        self.students.update(student)?;

        Ok(ScoreReport {
            uid: uid.to_string(),
            kind,
            test_id,
            entry,
            ranks,
            certificate_code,
        })
    }

    /// The stored rank profiles for a student, one per attempted kind.
    pub fn rank_profiles(&self, uid: &str) -> Result<BTreeMap<TestKind, RankProfile>, ScoreError> {
        let student = self
            .students
            .fetch(uid)?
            .ok_or_else(|| ScoreError::StudentNotFound(uid.to_string()))?;
        Ok(student.ranks)
    }

    /// Looks up an issued certificate by its code.
    pub fn certificate(&self, code: &str) -> Result<CertificateRecord, ScoreError> {
        self.certificates
            .fetch(code)?
            .ok_or_else(|| ScoreError::CertificateNotFound(code.to_string()))
    }
}
