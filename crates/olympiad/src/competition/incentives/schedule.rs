//! Incentive schedule: the partner category ladder and engagement bonuses.

/// One rung of the partner ladder.
///
/// A coordinator whose paid-student count falls in `[min, max]` holds this
/// category and earns `per_student_share` per paid student. The final rung
/// leaves `max` open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTier {
    pub name: &'static str,
    pub min: u32,
    pub max: Option<u32>,
    pub per_student_share: u64,
}

impl CategoryTier {
    fn covers(&self, total_paid_students: u32) -> bool {
        total_paid_students >= self.min
            && self.max.map_or(true, |max| total_paid_students <= max)
    }
}

/// Per-student bonus awarded once practice activity reaches a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementBonusTier {
    pub threshold: u32,
    pub bonus: u64,
}

/// The resolved incentive configuration used by the engine.
///
/// Construction validates the shape once so lookups never fail: the category
/// ladder is contiguous from one paid student upward, and the engagement
/// ladder descends to a zero-threshold fallback.
#[derive(Debug, Clone)]
pub struct IncentiveSchedule {
    categories: Vec<CategoryTier>,
    engagement: Vec<EngagementBonusTier>,
}

/// Shape violations caught while building a schedule.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("the category ladder is empty")]
    EmptyCategories,
    #[error("the category ladder must start at one paid student, not {0}")]
    LadderStart(u32),
    #[error("category '{name}' starts at {found} but {expected} was expected")]
    CategoryGap {
        name: &'static str,
        expected: u32,
        found: u32,
    },
    #[error("category '{0}' ends before it starts")]
    InvertedCategory(&'static str),
    #[error("category '{0}' is unbounded but not last in the ladder")]
    UnboundedMidLadder(&'static str),
    #[error("the final category '{0}' must be unbounded")]
    BoundedLadder(&'static str),
    #[error("engagement threshold {found} must sit below the previous {previous}")]
    EngagementOrder { previous: u32, found: u32 },
    #[error("the engagement ladder must end with a zero-threshold fallback")]
    EngagementCoverage,
}

impl IncentiveSchedule {
    /// The production schedule.
    pub fn standard() -> Self {
        IncentiveSchedule {
            categories: vec![
                CategoryTier {
                    name: "Starter Partner",
                    min: 1,
                    max: Some(100),
                    per_student_share: 75,
                },
                CategoryTier {
                    name: "Bronze Partner",
                    min: 101,
                    max: Some(200),
                    per_student_share: 85,
                },
                CategoryTier {
                    name: "Silver Partner",
                    min: 201,
                    max: Some(300),
                    per_student_share: 95,
                },
                CategoryTier {
                    name: "Gold Partner",
                    min: 301,
                    max: Some(400),
                    per_student_share: 110,
                },
                CategoryTier {
                    name: "Platinum Partner",
                    min: 401,
                    max: None,
                    per_student_share: 125,
                },
            ],
            engagement: vec![
                EngagementBonusTier {
                    threshold: 50,
                    bonus: 20,
                },
                EngagementBonusTier {
                    threshold: 20,
                    bonus: 15,
                },
                EngagementBonusTier {
                    threshold: 10,
                    bonus: 10,
                },
                EngagementBonusTier {
                    threshold: 5,
                    bonus: 5,
                },
                EngagementBonusTier {
                    threshold: 0,
                    bonus: 0,
                },
            ],
        }
    }

    /// Builds and validates a custom schedule.
    pub fn new(
        categories: Vec<CategoryTier>,
        engagement: Vec<EngagementBonusTier>,
    ) -> Result<Self, ScheduleError> {
        let schedule = IncentiveSchedule {
            categories,
            engagement,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        let Some(first) = self.categories.first() else {
            return Err(ScheduleError::EmptyCategories);
        };
        if first.min != 1 {
            return Err(ScheduleError::LadderStart(first.min));
        }

        let mut expected_next = None;
        for (index, tier) in self.categories.iter().enumerate() {
            if let Some(expected) = expected_next {
                if tier.min != expected {
                    return Err(ScheduleError::CategoryGap {
                        name: tier.name,
                        expected,
                        found: tier.min,
                    });
                }
            }
            match tier.max {
                Some(max) if max < tier.min => {
                    return Err(ScheduleError::InvertedCategory(tier.name))
                }
                Some(max) => expected_next = Some(max + 1),
                None if index + 1 != self.categories.len() => {
                    return Err(ScheduleError::UnboundedMidLadder(tier.name));
                }
                None => expected_next = None,
            }
        }
        match self.categories.last() {
            Some(last) if last.max.is_some() => {
                return Err(ScheduleError::BoundedLadder(last.name))
            }
            _ => {}
        }

        match self.engagement.last() {
            Some(last) if last.threshold == 0 => {}
            _ => return Err(ScheduleError::EngagementCoverage),
        }
        for pair in self.engagement.windows(2) {
            if pair[1].threshold >= pair[0].threshold {
                return Err(ScheduleError::EngagementOrder {
                    previous: pair[0].threshold,
                    found: pair[1].threshold,
                });
            }
        }

        Ok(())
    }

    /// The rung covering a paid-student count. A count below the ladder
    /// (zero paid students) falls back to the first rung.
    pub fn category_for(&self, total_paid_students: u32) -> &CategoryTier {
        self.categories
            .iter()
            .find(|tier| tier.covers(total_paid_students))
            .unwrap_or(&self.categories[0])
    }

    /// The bonus earned by one paid student's practice activity: the first
    /// threshold the count reaches, scanning from the top.
    pub fn engagement_bonus(&self, practice_tests_attempted: u32) -> u64 {
        self.engagement
            .iter()
            .find(|tier| practice_tests_attempted >= tier.threshold)
            .map_or(0, |tier| tier.bonus)
    }

    pub fn categories(&self) -> &[CategoryTier] {
        &self.categories
    }
}
