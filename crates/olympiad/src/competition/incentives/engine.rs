//! Coordinator incentive recalculation.

use std::sync::Arc;

use serde::Serialize;

use super::leaderboard::{self, LeaderboardEntry, PartnerRank, PUBLIC_BOARD_SIZE};
use super::schedule::IncentiveSchedule;
use crate::competition::clock::Clock;
use crate::competition::roster::domain::PaymentStatus;
use crate::competition::store::{CoordinatorDirectory, DirectoryError, StudentDirectory};

/// Result of one incentive recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncentiveReport {
    pub coordinator_uid: String,
    pub category: String,
    pub total_paid_students: u32,
    pub base_incentive: u64,
    pub bonus_amount: u64,
    pub total_earnings: u64,
}

/// Failures raised by incentive operations.
#[derive(Debug, thiserror::Error)]
pub enum IncentiveError {
    #[error("coordinator {0} not found")]
    CoordinatorNotFound(String),
    #[error("student {0} not found")]
    StudentNotFound(String),
    #[error("student {student} is not managed by coordinator {coordinator}")]
    NotManagedBy { student: String, coordinator: String },
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Recomputes coordinator earnings from the student directory.
///
/// Every calculation starts from scratch, so repeating a call without a
/// roster change yields the same result.
pub struct IncentiveEngine<S, C> {
    students: Arc<S>,
    coordinators: Arc<C>,
    schedule: IncentiveSchedule,
    clock: Arc<dyn Clock>,
}

impl<S, C> IncentiveEngine<S, C>
where
    S: StudentDirectory + 'static,
    C: CoordinatorDirectory + 'static,
{
    pub fn new(
        students: Arc<S>,
        coordinators: Arc<C>,
        schedule: IncentiveSchedule,
        clock: Arc<dyn Clock>,
    ) -> Self {
        IncentiveEngine {
            students,
            coordinators,
            schedule,
            clock,
        }
    }

    /// Recalculates one coordinator's earnings and persists the aggregates
    /// on their record.
    ///
    /// Only students in the `paid_but_not_attempted` state count: they paid
    /// through this coordinator and have not yet sat the live test.
    pub fn calculate(&self, coordinator_uid: &str) -> Result<IncentiveReport, IncentiveError> {
        let mut coordinator = self
            .coordinators
            .fetch(coordinator_uid)?
            .ok_or_else(|| IncentiveError::CoordinatorNotFound(coordinator_uid.to_string()))?;

        let students = self.students.all()?;
        let paid: Vec<_> = students
            .iter()
            .filter(|student| student.is_managed_by(coordinator_uid))
            .filter(|student| student.payment_status.counts_toward_incentives())
            .collect();

        let total_paid_students = paid.len() as u32;
        let tier = self.schedule.category_for(total_paid_students);
        let base_incentive = tier.per_student_share * u64::from(total_paid_students);
        let bonus_amount: u64 = paid
            .iter()
            .map(|student| self.schedule.engagement_bonus(student.practice_tests_attempted))
            .sum();
        let total_earnings = base_incentive + bonus_amount;

        coordinator.category = Some(tier.name.to_string());
        coordinator.total_paid_students = total_paid_students;
        coordinator.total_incentives = base_incentive;
        coordinator.bonus_amount = bonus_amount;
        coordinator.total_earnings = total_earnings;
        coordinator.last_incentive_calculation = Some(self.clock.now());
        self.coordinators.update(coordinator)?;

        Ok(IncentiveReport {
            coordinator_uid: coordinator_uid.to_string(),
            category: tier.name.to_string(),
            total_paid_students,
            base_incentive,
            bonus_amount,
            total_earnings,
        })
    }

    /// Moves a managed student through the payment funnel, then recalculates
    /// the coordinator's earnings so the aggregates never lag the change.
    pub fn update_payment_status(
        &self,
        coordinator_uid: &str,
        student_uid: &str,
        status: PaymentStatus,
    ) -> Result<IncentiveReport, IncentiveError> {
        let mut student = self
            .students
            .fetch(student_uid)?
            .ok_or_else(|| IncentiveError::StudentNotFound(student_uid.to_string()))?;
        if !student.is_managed_by(coordinator_uid) {
            return Err(IncentiveError::NotManagedBy {
                student: student_uid.to_string(),
                coordinator: coordinator_uid.to_string(),
            });
        }

        student.payment_status = status;
        self.students.update(student)?;

        self.calculate(coordinator_uid)
    }

    /// The public earnings board.
    pub fn leaderboard(&self, approved_only: bool) -> Result<Vec<LeaderboardEntry>, IncentiveError> {
        let coordinators = self.coordinators.all()?;
        Ok(leaderboard::top_earners(
            &coordinators,
            approved_only,
            PUBLIC_BOARD_SIZE,
        ))
    }

    /// A coordinator's position among all coordinators, persisted on their
    /// record for later reads.
    pub fn partner_rank(&self, coordinator_uid: &str) -> Result<PartnerRank, IncentiveError> {
        let mut coordinator = self
            .coordinators
            .fetch(coordinator_uid)?
            .ok_or_else(|| IncentiveError::CoordinatorNotFound(coordinator_uid.to_string()))?;

        let standings = leaderboard::rank_by_earnings(&self.coordinators.all()?);
        let rank = standings
            .iter()
            .position(|entry| entry.uid == coordinator_uid)
            .map(|index| index as u32 + 1)
            .ok_or_else(|| IncentiveError::CoordinatorNotFound(coordinator_uid.to_string()))?;

        coordinator.rank = Some(rank);
        self.coordinators.update(coordinator)?;

        Ok(PartnerRank {
            rank,
            total_coordinators: standings.len() as u32,
        })
    }
}
