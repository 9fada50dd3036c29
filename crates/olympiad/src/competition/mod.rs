//! Competition domain: participant records, score recording, rank
//! resolution, cumulative standings, and coordinator incentives.

pub mod clock;
pub mod incentives;
pub mod random;
pub mod ranking;
pub mod roster;
pub mod standings;
pub mod store;
