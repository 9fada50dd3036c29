//! Bulk roster import from coordinator-supplied CSV files.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{PaymentStatus, ScoreEntry, StudentRecord, TestKind};
use crate::competition::clock::Clock;
use crate::competition::random::RandomSource;
use crate::competition::ranking::resolver;
use crate::competition::ranking::tables::RankBook;
use crate::competition::store::StudentDirectory;

/// One roster file row. Column names follow the upload template handed to
/// coordinators, so several are not snake case.
#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    username: String,
    password: String,
    #[serde(rename = "PhoneNumber")]
    phone_number: String,
    #[serde(rename = "teacherPhoneNumber")]
    teacher_phone_number: String,
    #[serde(rename = "whatsappNumber")]
    whatsapp_number: String,
    standard: String,
    #[serde(rename = "schoolName")]
    school_name: String,
    country: String,
    state: String,
    city: String,
    #[serde(rename = "mockScore", default)]
    mock_score: Option<u32>,
    #[serde(rename = "liveScore", default)]
    live_score: Option<u32>,
}

impl RosterRow {
    fn validate(&self) -> Result<(), String> {
        let required = [
            ("name", &self.name),
            ("username", &self.username),
            ("password", &self.password),
            ("PhoneNumber", &self.phone_number),
            ("teacherPhoneNumber", &self.teacher_phone_number),
            ("whatsappNumber", &self.whatsapp_number),
            ("standard", &self.standard),
            ("schoolName", &self.school_name),
            ("country", &self.country),
            ("state", &self.state),
            ("city", &self.city),
        ];
        for (column, value) in required {
            if value.trim().is_empty() {
                return Err(format!("column '{column}' is required"));
            }
        }

        if let Some(score) = self.mock_score {
            let max = TestKind::Mock.max_score();
            if score > max {
                return Err(format!("mockScore {score} exceeds the mock maximum of {max}"));
            }
        }
        if let Some(score) = self.live_score {
            let max = TestKind::Live.max_score();
            if score > max {
                return Err(format!("liveScore {score} exceeds the live maximum of {max}"));
            }
        }

        Ok(())
    }
}

/// Outcome of one import: how many rows enrolled, and which were turned
/// away. A bad row never aborts the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: u32,
    pub rejected: Vec<RejectedRow>,
}

/// A row the importer refused, with its 1-based data row number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow {
    pub row: u32,
    pub reason: String,
}

/// Failures raised before any row is processed.
#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
}

/// Enrolls students from a roster CSV, resolving initial rank profiles for
/// any scores the file carries.
pub struct RosterImporter<S> {
    students: Arc<S>,
    book: Arc<RankBook>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl<S> RosterImporter<S>
where
    S: StudentDirectory + 'static,
{
    pub fn new(
        students: Arc<S>,
        book: Arc<RankBook>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        RosterImporter {
            students,
            book,
            random,
            clock,
        }
    }

    /// Imports a roster file from disk.
    pub fn import_path<P: AsRef<Path>>(
        &self,
        added_by: Option<&str>,
        path: P,
    ) -> Result<ImportSummary, RosterImportError> {
        let file = File::open(path)?;
        Ok(self.import_reader(added_by, file))
    }

    /// Imports roster rows from any reader. Row failures, whether parse
    /// errors or validation rejects, are collected in the summary.
    pub fn import_reader<R: Read>(&self, added_by: Option<&str>, reader: R) -> ImportSummary {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut imported = 0;
        let mut rejected = Vec::new();
        for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
            let row_number = index as u32 + 1;
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    rejected.push(RejectedRow {
                        row: row_number,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            match self.enroll(row, added_by) {
                Ok(()) => imported += 1,
                Err(reason) => rejected.push(RejectedRow {
                    row: row_number,
                    reason,
                }),
            }
        }

        ImportSummary { imported, rejected }
    }

    fn enroll(&self, row: RosterRow, added_by: Option<&str>) -> Result<(), String> {
        row.validate()?;

        // Credential and contact columns are required on the template but
        // not persisted here; account provisioning is handled elsewhere.
        let now = self.clock.now();
        let mut student = StudentRecord {
            uid: Uuid::new_v4().to_string(),
            name: row.name,
            username: row.username,
            school_name: row.school_name,
            standard: row.standard,
            country: row.country,
            state: row.state,
            city: row.city,
            payment_status: PaymentStatus::Unpaid,
            practice_tests_attempted: 0,
            test_completed: false,
            added_by: added_by.map(str::to_string),
            marks: BTreeMap::new(),
            ranks: BTreeMap::new(),
            certificate_codes: Vec::new(),
            created_at: now,
        };

        if let Some(score) = row.mock_score {
            self.seed_score(&mut student, TestKind::Mock, score, now);
        }
        if let Some(score) = row.live_score {
            self.seed_score(&mut student, TestKind::Live, score, now);
        }

        self.students.insert(student).map_err(|err| err.to_string())?;
        Ok(())
    }

    /// Backfills one historical score: the entry is stored against a fresh
    /// test id and the rank profile for that kind is resolved immediately.
    fn seed_score(
        &self,
        student: &mut StudentRecord,
        kind: TestKind,
        score: u32,
        recorded_at: DateTime<Utc>,
    ) {
        let entry = ScoreEntry {
            score,
            total: kind.max_score(),
            recorded_at,
        };
        student
            .marks
            .entry(kind)
            .or_default()
            .insert(format!("test-{}", Uuid::new_v4()), entry);
        let profile = resolver::resolve_profile(score, kind, &self.book, self.random.as_ref());
        student.ranks.insert(kind, profile);
    }
}
