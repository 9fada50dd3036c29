use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};

use crate::competition::clock::Clock;
use crate::competition::random::RandomSource;
use crate::competition::ranking::certificates::{CertificateIndex, CertificateRecord};
use crate::competition::ranking::recorder::ScoreRecorder;
use crate::competition::ranking::tables::{RankBand, RankBook, RankTable, RankTableEntry, ScopeTables};
use crate::competition::roster::domain::StudentRecord;
use crate::competition::store::{DirectoryError, StudentDirectory};

#[derive(Default)]
pub(super) struct MemoryStudents {
    records: Mutex<Vec<StudentRecord>>,
}

impl MemoryStudents {
    pub(super) fn with(records: Vec<StudentRecord>) -> Self {
        MemoryStudents {
            records: Mutex::new(records),
        }
    }
}

impl StudentDirectory for MemoryStudents {
    fn insert(&self, record: StudentRecord) -> Result<StudentRecord, DirectoryError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|existing| existing.uid == record.uid) {
            return Err(DirectoryError::Conflict);
        }
        records.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, uid: &str) -> Result<Option<StudentRecord>, DirectoryError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|record| record.uid == uid).cloned())
    }

    fn update(&self, record: StudentRecord) -> Result<(), DirectoryError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|existing| existing.uid == record.uid) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(DirectoryError::NotFound),
        }
    }

    fn all(&self) -> Result<Vec<StudentRecord>, DirectoryError> {
        Ok(self.records.lock().unwrap().clone())
    }
}

/// Serves reads from the wrapped directory but refuses every write.
pub(super) struct ReadOnlyStudents {
    pub(super) inner: MemoryStudents,
}

impl StudentDirectory for ReadOnlyStudents {
    fn insert(&self, _record: StudentRecord) -> Result<StudentRecord, DirectoryError> {
        Err(DirectoryError::Unavailable("directory is read-only".to_string()))
    }

    fn fetch(&self, uid: &str) -> Result<Option<StudentRecord>, DirectoryError> {
        self.inner.fetch(uid)
    }

    fn update(&self, _record: StudentRecord) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unavailable("directory is read-only".to_string()))
    }

    fn all(&self) -> Result<Vec<StudentRecord>, DirectoryError> {
        self.inner.all()
    }
}

#[derive(Default)]
pub(super) struct MemoryCertificates {
    records: Mutex<Vec<CertificateRecord>>,
}

impl MemoryCertificates {
    pub(super) fn all(&self) -> Vec<CertificateRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl CertificateIndex for MemoryCertificates {
    fn insert(&self, record: CertificateRecord) -> Result<(), DirectoryError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|existing| existing.code == record.code) {
            return Err(DirectoryError::Conflict);
        }
        records.push(record);
        Ok(())
    }

    fn fetch(&self, code: &str) -> Result<Option<CertificateRecord>, DirectoryError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|record| record.code == code).cloned())
    }
}

/// Replays a fixed sequence of draws, asserting each one fits the band it is
/// asked for.
pub(super) struct ScriptedSource {
    picks: Mutex<VecDeque<u32>>,
}

impl ScriptedSource {
    pub(super) fn new(picks: &[u32]) -> Self {
        ScriptedSource {
            picks: Mutex::new(picks.iter().copied().collect()),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn pick(&self, start: u32, end: u32) -> u32 {
        let value = self
            .picks
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted source exhausted");
        assert!(
            start <= value && value <= end,
            "scripted pick {value} outside band {start} to {end}"
        );
        value
    }
}

pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()
}

pub(super) fn student(uid: &str, name: &str) -> StudentRecord {
    StudentRecord {
        uid: uid.to_string(),
        name: name.to_string(),
        username: format!("{uid}-login"),
        school_name: "Meadow Public School".to_string(),
        standard: "8".to_string(),
        country: "India".to_string(),
        state: "Karnataka".to_string(),
        city: "Bengaluru".to_string(),
        payment_status: Default::default(),
        practice_tests_attempted: 0,
        test_completed: false,
        added_by: None,
        marks: Default::default(),
        ranks: Default::default(),
        certificate_codes: Vec::new(),
        created_at: day(1),
    }
}

/// A deliberately small book with distinct bands per scope, so tests can
/// tell which table a result came from.
pub(super) fn small_book() -> RankBook {
    RankBook {
        mock: ScopeTables {
            global: table(&[(95, 2, 10, "Gold"), (80, 11, 40, "Silver")]),
            country: table(&[(95, 2, 6, "Gold"), (80, 7, 20, "Silver")]),
            state: table(&[(95, 2, 4, "Gold"), (80, 5, 12, "Silver")]),
            city: table(&[(95, 2, 3, "Gold"), (80, 4, 8, "Silver")]),
        },
        live: ScopeTables {
            global: table(&[(390, 2, 8, "Gold"), (350, 9, 30, "Silver")]),
            country: table(&[(390, 2, 6, "Gold"), (350, 7, 20, "Silver")]),
            state: table(&[(390, 2, 4, "Gold"), (350, 5, 12, "Silver")]),
            city: table(&[(390, 2, 3, "Gold"), (350, 4, 8, "Silver")]),
        },
    }
}

pub(super) fn table(rows: &[(u32, u32, u32, &str)]) -> RankTable {
    RankTable::new(
        rows.iter()
            .map(|&(score, start, end, category)| RankTableEntry {
                score,
                band: RankBand { start, end },
                category: category.to_string(),
            })
            .collect(),
    )
}

pub(super) fn recorder_with(
    students: Arc<MemoryStudents>,
    certificates: Arc<MemoryCertificates>,
    picks: &[u32],
) -> ScoreRecorder<MemoryStudents, MemoryCertificates> {
    ScoreRecorder::new(
        students,
        certificates,
        Arc::new(small_book()),
        Arc::new(ScriptedSource::new(picks)),
        Arc::new(FixedClock(day(1))),
    )
}

pub(super) async fn read_json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");
    serde_json::from_slice(&bytes).expect("response body should be json")
}
