use metrics_exporter_prometheus::PrometheusHandle;
use olympiad::competition::ranking::{CertificateIndex, CertificateRecord};
use olympiad::competition::roster::{CoordinatorRecord, StudentRecord};
use olympiad::competition::store::{CoordinatorDirectory, DirectoryError, StudentDirectory};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Vec-backed so `all()` yields records in insertion order, which standings
/// tie-breaking depends on.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStudentDirectory {
    records: Arc<Mutex<Vec<StudentRecord>>>,
}

impl StudentDirectory for InMemoryStudentDirectory {
    fn insert(&self, record: StudentRecord) -> Result<StudentRecord, DirectoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("student directory mutex poisoned");
        if guard.iter().any(|existing| existing.uid == record.uid) {
            return Err(DirectoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, uid: &str) -> Result<Option<StudentRecord>, DirectoryError> {
        let guard = self
            .records
            .lock()
            .expect("student directory mutex poisoned");
        Ok(guard.iter().find(|record| record.uid == uid).cloned())
    }

    fn update(&self, record: StudentRecord) -> Result<(), DirectoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("student directory mutex poisoned");
        match guard.iter_mut().find(|existing| existing.uid == record.uid) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(DirectoryError::NotFound),
        }
    }

    fn all(&self) -> Result<Vec<StudentRecord>, DirectoryError> {
        let guard = self
            .records
            .lock()
            .expect("student directory mutex poisoned");
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCoordinatorDirectory {
    records: Arc<Mutex<Vec<CoordinatorRecord>>>,
}

impl CoordinatorDirectory for InMemoryCoordinatorDirectory {
    fn insert(&self, record: CoordinatorRecord) -> Result<CoordinatorRecord, DirectoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("coordinator directory mutex poisoned");
        if guard.iter().any(|existing| existing.uid == record.uid) {
            return Err(DirectoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, uid: &str) -> Result<Option<CoordinatorRecord>, DirectoryError> {
        let guard = self
            .records
            .lock()
            .expect("coordinator directory mutex poisoned");
        Ok(guard.iter().find(|record| record.uid == uid).cloned())
    }

    fn update(&self, record: CoordinatorRecord) -> Result<(), DirectoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("coordinator directory mutex poisoned");
        match guard.iter_mut().find(|existing| existing.uid == record.uid) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(DirectoryError::NotFound),
        }
    }

    fn all(&self) -> Result<Vec<CoordinatorRecord>, DirectoryError> {
        let guard = self
            .records
            .lock()
            .expect("coordinator directory mutex poisoned");
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCertificateIndex {
    records: Arc<Mutex<Vec<CertificateRecord>>>,
}

impl CertificateIndex for InMemoryCertificateIndex {
    fn insert(&self, record: CertificateRecord) -> Result<(), DirectoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("certificate index mutex poisoned");
        guard.push(record);
        Ok(())
    }

    fn fetch(&self, code: &str) -> Result<Option<CertificateRecord>, DirectoryError> {
        let guard = self
            .records
            .lock()
            .expect("certificate index mutex poisoned");
        Ok(guard.iter().find(|record| record.code == code).cloned())
    }
}
