//! Percentile rank tables.
//!
//! Each test kind carries one table per geographic scope. A table row maps an
//! exact score to an inclusive band of plausible positions plus a medal
//! category; scores without a row resolve as unranked.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::competition::roster::domain::{Scope, TestKind};

/// Inclusive range of positions a score may land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankBand {
    pub start: u32,
    pub end: u32,
}

impl RankBand {
    pub fn contains(self, rank: u32) -> bool {
        self.start <= rank && rank <= self.end
    }
}

impl fmt::Display for RankBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn parse_band(raw: &str) -> Result<RankBand, String> {
    let mut parts = raw.splitn(2, " to ");
    let start = parts.next().unwrap_or_default().trim();
    let end = parts.next().unwrap_or_default().trim();

    match (start.parse::<u32>(), end.parse::<u32>()) {
        (Ok(start), Ok(end)) => Ok(RankBand { start, end }),
        _ => Err(format!(
            "rank range '{raw}' is not of the form '<start> to <end>'"
        )),
    }
}

fn band_to_wire<S>(band: &RankBand, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(band)
}

fn band_from_wire<'de, D>(deserializer: D) -> Result<RankBand, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_band(&raw).map_err(serde::de::Error::custom)
}

/// One table row: an exact score, its band, and its medal category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTableEntry {
    pub score: u32,
    #[serde(
        rename = "rankRange",
        serialize_with = "band_to_wire",
        deserialize_with = "band_from_wire"
    )]
    pub band: RankBand,
    pub category: String,
}

/// Score lookup rows for one (kind, scope) pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankTable {
    entries: Vec<RankTableEntry>,
}

impl RankTable {
    pub fn new(entries: Vec<RankTableEntry>) -> Self {
        RankTable { entries }
    }

    /// The row whose score matches exactly, if any.
    pub fn lookup(&self, score: u32) -> Option<&RankTableEntry> {
        self.entries.iter().find(|entry| entry.score == score)
    }

    pub fn entries(&self) -> &[RankTableEntry] {
        &self.entries
    }

    fn validate(&self, kind: TestKind, scope: Scope) -> Result<(), RankBookError> {
        let mut seen = BTreeSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.score) {
                return Err(RankBookError::DuplicateScore {
                    kind,
                    scope,
                    score: entry.score,
                });
            }
            if entry.band.start > entry.band.end {
                return Err(RankBookError::InvertedBand {
                    kind,
                    scope,
                    score: entry.score,
                    band: entry.band,
                });
            }
        }
        Ok(())
    }
}

/// The four per-scope tables of one test kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeTables {
    pub global: RankTable,
    pub country: RankTable,
    pub state: RankTable,
    pub city: RankTable,
}

impl ScopeTables {
    pub fn get(&self, scope: Scope) -> &RankTable {
        match scope {
            Scope::Global => &self.global,
            Scope::Country => &self.country,
            Scope::State => &self.state,
            Scope::City => &self.city,
        }
    }

    fn validate(&self, kind: TestKind) -> Result<(), RankBookError> {
        for scope in Scope::ordered() {
            self.get(scope).validate(kind, scope)?;
        }
        Ok(())
    }
}

/// All eight rank tables, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankBook {
    pub mock: ScopeTables,
    pub live: ScopeTables,
}

impl RankBook {
    /// Reads and validates a rank table document from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RankBookError> {
        let file = File::open(path)?;
        RankBook::from_reader(file)
    }

    /// Reads and validates a rank table document from any reader.
    ///
    /// A document that parses but violates a table invariant is rejected;
    /// startup must fail rather than serve a broken book.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RankBookError> {
        let book: RankBook = serde_json::from_reader(reader)?;
        book.validate()?;
        Ok(book)
    }

    pub fn table(&self, kind: TestKind, scope: Scope) -> &RankTable {
        match kind {
            TestKind::Mock => self.mock.get(scope),
            TestKind::Live => self.live.get(scope),
        }
    }

    pub fn validate(&self) -> Result<(), RankBookError> {
        self.mock.validate(TestKind::Mock)?;
        self.live.validate(TestKind::Live)?;
        Ok(())
    }

    /// The compiled-in tables used when no document is configured.
    ///
    /// Bands widen as the scope does: a score that lands in a handful of
    /// city positions spreads across thousands of global ones.
    pub fn standard() -> Self {
        RankBook {
            mock: ScopeTables {
                global: table(&[
                    (99, 2, 50, "Gold"),
                    (98, 51, 200, "Gold"),
                    (97, 201, 500, "Gold"),
                    (96, 501, 900, "Silver"),
                    (95, 901, 1500, "Silver"),
                    (94, 1501, 2400, "Silver"),
                    (93, 2401, 3600, "Bronze"),
                    (92, 3601, 5000, "Bronze"),
                    (91, 5001, 6800, "Bronze"),
                    (90, 6801, 9000, "Bronze"),
                ]),
                country: table(&[
                    (99, 2, 10, "Gold"),
                    (98, 11, 40, "Gold"),
                    (97, 41, 100, "Gold"),
                    (96, 101, 180, "Silver"),
                    (95, 181, 300, "Silver"),
                    (94, 301, 450, "Silver"),
                    (93, 451, 640, "Bronze"),
                    (92, 641, 900, "Bronze"),
                    (91, 901, 1200, "Bronze"),
                    (90, 1201, 1600, "Bronze"),
                ]),
                state: table(&[
                    (99, 2, 5, "Gold"),
                    (98, 6, 15, "Gold"),
                    (97, 16, 30, "Gold"),
                    (96, 31, 55, "Silver"),
                    (95, 56, 90, "Silver"),
                    (94, 91, 140, "Silver"),
                    (93, 141, 210, "Bronze"),
                    (92, 211, 300, "Bronze"),
                    (91, 301, 400, "Bronze"),
                    (90, 401, 520, "Bronze"),
                ]),
                city: table(&[
                    (99, 2, 3, "Gold"),
                    (98, 4, 6, "Gold"),
                    (97, 7, 12, "Gold"),
                    (96, 13, 20, "Silver"),
                    (95, 21, 32, "Silver"),
                    (94, 33, 48, "Silver"),
                    (93, 49, 70, "Bronze"),
                    (92, 71, 95, "Bronze"),
                    (91, 96, 120, "Bronze"),
                    (90, 121, 150, "Bronze"),
                ]),
            },
            live: ScopeTables {
                global: table(&[
                    (390, 2, 60, "Gold"),
                    (380, 61, 240, "Gold"),
                    (370, 241, 600, "Gold"),
                    (360, 601, 1100, "Silver"),
                    (350, 1101, 1900, "Silver"),
                    (340, 1901, 3000, "Silver"),
                    (330, 3001, 4500, "Bronze"),
                    (320, 4501, 6500, "Bronze"),
                    (310, 6501, 9000, "Bronze"),
                    (300, 9001, 12000, "Bronze"),
                ]),
                country: table(&[
                    (390, 2, 12, "Gold"),
                    (380, 13, 48, "Gold"),
                    (370, 49, 120, "Gold"),
                    (360, 121, 220, "Silver"),
                    (350, 221, 380, "Silver"),
                    (340, 381, 600, "Silver"),
                    (330, 601, 900, "Bronze"),
                    (320, 901, 1300, "Bronze"),
                    (310, 1301, 1800, "Bronze"),
                    (300, 1801, 2400, "Bronze"),
                ]),
                state: table(&[
                    (390, 2, 6, "Gold"),
                    (380, 7, 18, "Gold"),
                    (370, 19, 36, "Gold"),
                    (360, 37, 66, "Silver"),
                    (350, 67, 110, "Silver"),
                    (340, 111, 170, "Silver"),
                    (330, 171, 250, "Bronze"),
                    (320, 251, 350, "Bronze"),
                    (310, 351, 470, "Bronze"),
                    (300, 471, 610, "Bronze"),
                ]),
                city: table(&[
                    (390, 2, 4, "Gold"),
                    (380, 5, 8, "Gold"),
                    (370, 9, 14, "Gold"),
                    (360, 15, 24, "Silver"),
                    (350, 25, 38, "Silver"),
                    (340, 39, 56, "Silver"),
                    (330, 57, 80, "Bronze"),
                    (320, 81, 108, "Bronze"),
                    (310, 109, 140, "Bronze"),
                    (300, 141, 180, "Bronze"),
                ]),
            },
        }
    }
}

fn table(rows: &[(u32, u32, u32, &str)]) -> RankTable {
    RankTable::new(
        rows.iter()
            .map(|&(score, start, end, category)| RankTableEntry {
                score,
                band: RankBand { start, end },
                category: category.to_string(),
            })
            .collect(),
    )
}

/// Failures raised while loading or validating a rank table document.
#[derive(Debug, thiserror::Error)]
pub enum RankBookError {
    #[error("failed to read rank tables: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rank table document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{kind} {scope} table lists score {score} more than once")]
    DuplicateScore {
        kind: TestKind,
        scope: Scope,
        score: u32,
    },
    #[error("{kind} {scope} table has inverted band '{band}' for score {score}")]
    InvertedBand {
        kind: TestKind,
        scope: Scope,
        score: u32,
        band: RankBand,
    },
}
