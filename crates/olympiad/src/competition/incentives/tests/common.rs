use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};

use crate::competition::clock::Clock;
use crate::competition::incentives::engine::IncentiveEngine;
use crate::competition::incentives::schedule::IncentiveSchedule;
use crate::competition::roster::domain::{CoordinatorRecord, PaymentStatus, StudentRecord};
use crate::competition::store::{CoordinatorDirectory, DirectoryError, StudentDirectory};

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

#[derive(Default)]
pub(super) struct MemoryCoordinators {
    records: Mutex<Vec<CoordinatorRecord>>,
}

impl MemoryCoordinators {
    pub(super) fn with(records: Vec<CoordinatorRecord>) -> Self {
        MemoryCoordinators {
            records: Mutex::new(records),
        }
    }
}

impl CoordinatorDirectory for MemoryCoordinators {
    fn insert(&self, record: CoordinatorRecord) -> Result<CoordinatorRecord, DirectoryError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|existing| existing.uid == record.uid) {
            return Err(DirectoryError::Conflict);
        }
        records.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, uid: &str) -> Result<Option<CoordinatorRecord>, DirectoryError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|record| record.uid == uid).cloned())
    }

    fn update(&self, record: CoordinatorRecord) -> Result<(), DirectoryError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|existing| existing.uid == record.uid) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(DirectoryError::NotFound),
        }
    }

    fn all(&self) -> Result<Vec<CoordinatorRecord>, DirectoryError> {
        Ok(self.records.lock().unwrap().clone())
    }
}

pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, day, 12, 0, 0).unwrap()
}

pub(super) fn coordinator(uid: &str, name: &str) -> CoordinatorRecord {
    CoordinatorRecord {
        uid: uid.to_string(),
        name: name.to_string(),
        country: "India".to_string(),
        state: "Karnataka".to_string(),
        city: "Bengaluru".to_string(),
        status: Default::default(),
        category: None,
        total_paid_students: 0,
        total_incentives: 0,
        bonus_amount: 0,
        total_earnings: 0,
        rank: None,
        last_incentive_calculation: None,
        created_at: day(1),
    }
}

pub(super) fn with_earnings(mut record: CoordinatorRecord, total_earnings: u64) -> CoordinatorRecord {
    record.total_earnings = total_earnings;
    record
}

pub(super) fn managed_student(
    uid: &str,
    coordinator_uid: &str,
    payment_status: PaymentStatus,
    practice_tests_attempted: u32,
) -> StudentRecord {
    StudentRecord {
        uid: uid.to_string(),
        name: format!("Student {uid}"),
        username: format!("{uid}-login"),
        school_name: "Meadow Public School".to_string(),
        standard: "8".to_string(),
        country: "India".to_string(),
        state: "Karnataka".to_string(),
        city: "Bengaluru".to_string(),
        payment_status,
        practice_tests_attempted,
        test_completed: false,
        added_by: Some(coordinator_uid.to_string()),
        marks: Default::default(),
        ranks: Default::default(),
        certificate_codes: Vec::new(),
        created_at: day(1),
    }
}

/// A batch of paid students for one coordinator, `uid-0` upward.
pub(super) fn paid_batch(coordinator_uid: &str, count: u32) -> Vec<StudentRecord> {
    (0..count)
        .map(|index| {
            managed_student(
                &format!("{coordinator_uid}-stu-{index}"),
                coordinator_uid,
                PaymentStatus::PaidButNotAttempted,
                0,
            )
        })
        .collect()
}

pub(super) fn engine_with(
    students: Arc<MemoryStudents>,
    coordinators: Arc<MemoryCoordinators>,
) -> IncentiveEngine<MemoryStudents, MemoryCoordinators> {
    IncentiveEngine::new(
        students,
        coordinators,
        IncentiveSchedule::standard(),
        Arc::new(FixedClock(day(2))),
    )
}

pub(super) async fn read_json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");
    serde_json::from_slice(&bytes).expect("response body should be json")
}
