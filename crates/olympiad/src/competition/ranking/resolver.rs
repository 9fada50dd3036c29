//! Score to rank resolution.

use super::tables::{RankBook, RankTable};
use crate::competition::random::RandomSource;
use crate::competition::roster::domain::{RankProfile, RankResult, RankStanding, Scope, TestKind};

/// Category awarded for a perfect score, whatever the tables say.
const PERFECT_CATEGORY: &str = "Gold";

/// Resolves one score against one table.
///
/// A perfect score short-circuits to rank 1 Gold. Otherwise the table row for
/// the exact score decides: the rank is drawn uniformly from the row's band,
/// so two students with the same score usually land on different positions.
/// A score with no row resolves as unranked.
pub fn resolve(
    score: u32,
    table: &RankTable,
    max_score: u32,
    random: &dyn RandomSource,
) -> RankResult {
    if score == max_score {
        return RankResult {
            rank: RankStanding::Ranked(1),
            category: PERFECT_CATEGORY.to_string(),
        };
    }

    match table.lookup(score) {
        Some(entry) => RankResult {
            rank: RankStanding::Ranked(random.pick(entry.band.start, entry.band.end)),
            category: entry.category.clone(),
        },
        None => RankResult::unranked(),
    }
}

/// Resolves one score against all four scopes of its kind.
pub fn resolve_profile(
    score: u32,
    kind: TestKind,
    book: &RankBook,
    random: &dyn RandomSource,
) -> RankProfile {
    let max = kind.max_score();
    RankProfile {
        global: resolve(score, book.table(kind, Scope::Global), max, random),
        country: resolve(score, book.table(kind, Scope::Country), max, random),
        state: resolve(score, book.table(kind, Scope::State), max, random),
        city: resolve(score, book.table(kind, Scope::City), max, random),
    }
}
