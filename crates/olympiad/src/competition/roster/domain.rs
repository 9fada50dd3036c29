//! Participant and coordinator records plus the enums they carry.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The two scored test tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Mock,
    Live,
}

impl TestKind {
    /// Highest total a test of this kind can carry.
    pub const fn max_score(self) -> u32 {
        match self {
            TestKind::Mock => 100,
            TestKind::Live => 400,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TestKind::Mock => "mock",
            TestKind::Live => "live",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Geographic partitions a rank is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Global,
    Country,
    State,
    City,
}

impl Scope {
    /// Every scope, widest first. Rank resolution walks all four.
    pub const fn ordered() -> [Scope; 4] {
        [Scope::Global, Scope::Country, Scope::State, Scope::City]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Country => "country",
            Scope::State => "state",
            Scope::City => "city",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved rank position, or the explicit unranked marker.
///
/// On the wire a ranked value is a bare number and the unranked case is the
/// string `"Unranked"`, so the two share one field in stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankStanding {
    Ranked(u32),
    Unranked,
}

impl Serialize for RankStanding {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RankStanding::Ranked(rank) => serializer.serialize_u32(*rank),
            RankStanding::Unranked => serializer.serialize_str("Unranked"),
        }
    }
}

impl<'de> Deserialize<'de> for RankStanding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
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
            Wire::Number(rank) => Ok(RankStanding::Ranked(rank)),
            Wire::Text(value) if value == "Unranked" => Ok(RankStanding::Unranked),
            Wire::Text(other) => Err(serde::de::Error::custom(format!(
                "'{other}' is not a rank value"
            ))),
        }
    }
}

/// Rank and medal category resolved for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankResult {
    pub rank: RankStanding,
    pub category: String,
}

impl RankResult {
    pub fn unranked() -> Self {
        RankResult {
            rank: RankStanding::Unranked,
            category: "Unranked".to_string(),
        }
    }
}

/// Rank results for one test kind across all four scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankProfile {
    pub global: RankResult,
    pub country: RankResult,
    pub state: RankResult,
    pub city: RankResult,
}

impl RankProfile {
    pub fn unranked() -> Self {
        RankProfile {
            global: RankResult::unranked(),
            country: RankResult::unranked(),
            state: RankResult::unranked(),
            city: RankResult::unranked(),
        }
    }

    pub fn get(&self, scope: Scope) -> &RankResult {
        match scope {
            Scope::Global => &self.global,
            Scope::Country => &self.country,
            Scope::State => &self.state,
            Scope::City => &self.city,
        }
    }
}

/// One recorded attempt at a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    pub total: u32,
    #[serde(rename = "timestamp")]
    pub recorded_at: DateTime<Utc>,
}

/// Where a student sits in the payment funnel.
///
/// Only `paid_but_not_attempted` counts toward coordinator incentives; a paid
/// student who has already sat the live test has left the funnel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    PaidButNotAttempted,
    PaidAndAttempted,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::PaidButNotAttempted => "paid_but_not_attempted",
            PaymentStatus::PaidAndAttempted => "paid_and_attempted",
        }
    }

    pub const fn counts_toward_incentives(self) -> bool {
        matches!(self, PaymentStatus::PaidButNotAttempted)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Review state of a coordinator account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A registered participant.
///
/// `marks` holds every recorded attempt keyed by kind and then test id, while
/// `ranks` holds only the profile from the latest attempt per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub uid: String,
    pub name: String,
    pub username: String,
    pub school_name: String,
    pub standard: String,
    pub country: String,
    pub state: String,
    pub city: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub practice_tests_attempted: u32,
    #[serde(default)]
    pub test_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default)]
    pub marks: BTreeMap<TestKind, BTreeMap<String, ScoreEntry>>,
    #[serde(default)]
    pub ranks: BTreeMap<TestKind, RankProfile>,
    #[serde(default)]
    pub certificate_codes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl StudentRecord {
    /// Sum of every recorded score across both test kinds. Standings boards
    /// order students by this value.
    pub fn cumulative_score(&self) -> u64 {
        self.marks
            .values()
            .flat_map(|entries| entries.values())
            .map(|entry| u64::from(entry.score))
            .sum()
    }

    pub fn is_managed_by(&self, coordinator_uid: &str) -> bool {
        self.added_by.as_deref() == Some(coordinator_uid)
    }
}

/// A partner coordinator together with the incentive aggregates from the
/// most recent recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorRecord {
    pub uid: String,
    pub name: String,
    pub country: String,
    pub state: String,
    pub city: String,
    #[serde(default)]
    pub status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub total_paid_students: u32,
    #[serde(default)]
    pub total_incentives: u64,
    #[serde(default)]
    pub bonus_amount: u64,
    #[serde(default)]
    pub total_earnings: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_incentive_calculation: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
