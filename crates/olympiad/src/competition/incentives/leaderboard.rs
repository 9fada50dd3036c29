//! Coordinator earnings ordering.

use serde::Serialize;

use crate::competition::roster::domain::{ApprovalStatus, CoordinatorRecord};

/// Rows shown on the public leaderboard.
pub const PUBLIC_BOARD_SIZE: usize = 10;

/// One row of the coordinator earnings board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub uid: String,
    pub name: String,
    pub category: String,
    pub total_incentives: u64,
    pub bonus_amount: u64,
    pub total_earnings: u64,
}

/// A coordinator's 1-based position among all coordinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRank {
    pub rank: u32,
    pub total_coordinators: u32,
}

fn entry_for(coordinator: &CoordinatorRecord) -> LeaderboardEntry {
    LeaderboardEntry {
        uid: coordinator.uid.clone(),
        name: coordinator.name.clone(),
        category: coordinator
            .category
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        total_incentives: coordinator.total_incentives,
        bonus_amount: coordinator.bonus_amount,
        total_earnings: coordinator.total_earnings,
    }
}

/// Every coordinator ordered by earnings, highest first.
///
/// The sort is stable, so equal earners keep their directory order.
pub fn rank_by_earnings(coordinators: &[CoordinatorRecord]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = coordinators.iter().map(entry_for).collect();
    entries.sort_by(|a, b| b.total_earnings.cmp(&a.total_earnings));
    entries
}

/// The board itself: ordered, optionally restricted to approved
/// coordinators, and truncated to `limit` rows.
pub fn top_earners(
    coordinators: &[CoordinatorRecord],
    approved_only: bool,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = coordinators
        .iter()
        .filter(|coordinator| !approved_only || coordinator.status == ApprovalStatus::Approved)
        .map(entry_for)
        .collect();
    entries.sort_by(|a, b| b.total_earnings.cmp(&a.total_earnings));
    entries.truncate(limit);
    entries
}
