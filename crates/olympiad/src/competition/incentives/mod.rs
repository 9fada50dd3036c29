//! Coordinator incentives: the category ladder, earnings recalculation, and
//! the public leaderboard.

pub mod engine;
pub mod leaderboard;
pub mod router;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use engine::{IncentiveEngine, IncentiveError, IncentiveReport};
pub use leaderboard::{LeaderboardEntry, PartnerRank, PUBLIC_BOARD_SIZE};
pub use router::incentive_router;
pub use schedule::{CategoryTier, EngagementBonusTier, IncentiveSchedule, ScheduleError};
