//! Cumulative standings boards.
//!
//! Unlike per-test rank profiles, standings are computed on read from the
//! sum of every recorded score, partitioned by geography and capped per
//! scope.

pub mod router;

pub use router::standings_router;

use std::sync::Arc;

use serde::Serialize;

use super::roster::domain::{Scope, StudentRecord};
use super::store::{DirectoryError, StudentDirectory};

const UNRANKED: &str = "Unranked";

/// Rank ceilings per scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsPolicy {
    pub global_cap: u32,
    pub country_cap: u32,
    pub state_cap: u32,
    pub city_cap: u32,
}

impl StandingsPolicy {
    /// The production ceilings.
    pub fn standard() -> Self {
        StandingsPolicy {
            global_cap: 10_000,
            country_cap: 2_500,
            state_cap: 500,
            city_cap: 100,
        }
    }

    pub fn cap(&self, scope: Scope) -> u32 {
        match scope {
            Scope::Global => self.global_cap,
            Scope::Country => self.country_cap,
            Scope::State => self.state_cap,
            Scope::City => self.city_cap,
        }
    }
}

/// Percentile label for a rank inside a capped partition: top 1% Gold, top
/// 5% Silver, top 10% Bronze, everything beyond unranked. Pure integer
/// arithmetic, so the cutoffs land exactly on cap / 100, cap / 20, cap / 10.
pub fn percentile_category(rank: u32, cap: u32) -> &'static str {
    if rank * 100 <= cap {
        "Gold"
    } else if rank * 20 <= cap {
        "Silver"
    } else if rank * 10 <= cap {
        "Bronze"
    } else {
        UNRANKED
    }
}

/// One row of a standings board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingEntry {
    pub uid: String,
    pub name: String,
    pub school_name: String,
    pub cumulative_score: u64,
    pub rank: u32,
    pub category: &'static str,
}

/// A student's standing within one scope's partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeStanding {
    pub rank: u32,
    pub category: &'static str,
    pub cohort: u32,
}

/// A student's standings across all four scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStandings {
    pub uid: String,
    pub name: String,
    pub cumulative_score: u64,
    pub global: ScopeStanding,
    pub country: ScopeStanding,
    pub state: ScopeStanding,
    pub city: ScopeStanding,
}

/// Failures raised while computing standings.
#[derive(Debug, thiserror::Error)]
pub enum StandingsError {
    #[error("student {0} not found")]
    StudentNotFound(String),
    #[error("{0} standings require a partition name")]
    MissingPartition(Scope),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Orders one partition by cumulative score, highest first, assigning
/// sequential positions clamped to the partition cap.
///
/// The sort is stable, so students on equal sums keep their directory order.
pub fn rank_partition(students: &[&StudentRecord], cap: u32) -> Vec<StandingEntry> {
    let mut entries: Vec<StandingEntry> = students
        .iter()
        .map(|student| StandingEntry {
            uid: student.uid.clone(),
            name: student.name.clone(),
            school_name: student.school_name.clone(),
            cumulative_score: student.cumulative_score(),
            rank: 0,
            category: UNRANKED,
        })
        .collect();
    entries.sort_by(|a, b| b.cumulative_score.cmp(&a.cumulative_score));
    for (index, entry) in entries.iter_mut().enumerate() {
        let position = index as u32 + 1;
        entry.rank = position.min(cap);
        entry.category = percentile_category(entry.rank, cap);
    }
    entries
}

/// Read-side service assembling standings boards from the student directory.
pub struct StandingsBoard<S> {
    students: Arc<S>,
    policy: StandingsPolicy,
}

impl<S> StandingsBoard<S>
where
    S: StudentDirectory + 'static,
{
    pub fn new(students: Arc<S>, policy: StandingsPolicy) -> Self {
        StandingsBoard { students, policy }
    }

    /// The board for one scope. Geographic scopes need a partition name;
    /// the global board covers everyone.
    pub fn board(
        &self,
        scope: Scope,
        partition: Option<&str>,
    ) -> Result<Vec<StandingEntry>, StandingsError> {
        let students = self.students.all()?;
        let cap = self.policy.cap(scope);
        let selected: Vec<&StudentRecord> = match scope {
            Scope::Global => students.iter().collect(),
            _ => {
                let Some(name) = partition else {
                    return Err(StandingsError::MissingPartition(scope));
                };
                students
                    .iter()
                    .filter(|student| partition_value(student, scope).eq_ignore_ascii_case(name))
                    .collect()
            }
        };
        Ok(rank_partition(&selected, cap))
    }

    /// Where one student sits in each of their four partitions.
    pub fn for_student(&self, uid: &str) -> Result<StudentStandings, StandingsError> {
        let students = self.students.all()?;
        let subject = students
            .iter()
            .find(|student| student.uid == uid)
            .ok_or_else(|| StandingsError::StudentNotFound(uid.to_string()))?;

        Ok(StudentStandings {
            uid: subject.uid.clone(),
            name: subject.name.clone(),
            cumulative_score: subject.cumulative_score(),
            global: self.scope_standing(&students, subject, Scope::Global),
            country: self.scope_standing(&students, subject, Scope::Country),
            state: self.scope_standing(&students, subject, Scope::State),
            city: self.scope_standing(&students, subject, Scope::City),
        })
    }

    fn scope_standing(
        &self,
        students: &[StudentRecord],
        subject: &StudentRecord,
        scope: Scope,
    ) -> ScopeStanding {
        let cap = self.policy.cap(scope);
        let cohort: Vec<&StudentRecord> = students
            .iter()
            .filter(|student| {
                scope == Scope::Global
                    || partition_value(student, scope)
                        .eq_ignore_ascii_case(partition_value(subject, scope))
            })
            .collect();
        let entries = rank_partition(&cohort, cap);
        let cohort_size = entries.len() as u32;
        match entries.into_iter().find(|entry| entry.uid == subject.uid) {
            Some(entry) => ScopeStanding {
                rank: entry.rank,
                category: entry.category,
                cohort: cohort_size,
            },
            None => ScopeStanding {
                rank: cap,
                category: UNRANKED,
                cohort: cohort_size,
            },
        }
    }
}

fn partition_value(student: &StudentRecord, scope: Scope) -> &str {
    match scope {
        Scope::Global => "",
        Scope::Country => &student.country,
        Scope::State => &student.state,
        Scope::City => &student.city,
    }
}
