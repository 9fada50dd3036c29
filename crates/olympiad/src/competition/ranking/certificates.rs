//! Certificates issued for completed live tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::competition::roster::domain::RankProfile;
use crate::competition::store::DirectoryError;

const CODE_PREFIX: &str = "GSO";

/// Snapshot stored when a completed live test earns a certificate.
///
/// The rankings are frozen at issuance; later submissions never touch an
/// issued certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub code: String,
    pub student_uid: String,
    pub student_name: String,
    pub rankings: RankProfile,
    pub issued_at: DateTime<Utc>,
}

/// Global index of issued certificates, addressed by code.
pub trait CertificateIndex: Send + Sync {
    fn insert(&self, record: CertificateRecord) -> Result<(), DirectoryError>;
    fn fetch(&self, code: &str) -> Result<Option<CertificateRecord>, DirectoryError>;
}

/// Mints a fresh certificate code: the `GSO-` prefix plus 128 bits of hex.
pub fn generate_code() -> String {
    format!("{CODE_PREFIX}-{}", Uuid::new_v4().simple())
}
