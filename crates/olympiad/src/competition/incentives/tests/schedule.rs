use crate::competition::incentives::schedule::{
    CategoryTier, EngagementBonusTier, IncentiveSchedule, ScheduleError,
};

fn zero_fallback() -> Vec<EngagementBonusTier> {
    vec![EngagementBonusTier {
        threshold: 0,
        bonus: 0,
    }]
}

#[test]
fn standard_schedule_is_valid() {
    assert!(IncentiveSchedule::standard().validate().is_ok());
}

#[test]
fn category_boundaries_follow_the_ladder() {
    let schedule = IncentiveSchedule::standard();

    let expectations = [
        (1, "Starter Partner"),
        (100, "Starter Partner"),
        (101, "Bronze Partner"),
        (200, "Bronze Partner"),
        (201, "Silver Partner"),
        (300, "Silver Partner"),
        (301, "Gold Partner"),
        (400, "Gold Partner"),
        (401, "Platinum Partner"),
        (5000, "Platinum Partner"),
    ];
    for (count, expected) in expectations {
        assert_eq!(
            schedule.category_for(count).name,
            expected,
            "count {count} should map to {expected}"
        );
    }
}

#[test]
fn zero_paid_students_fall_back_to_the_first_rung() {
    let schedule = IncentiveSchedule::standard();

    assert_eq!(schedule.category_for(0).name, "Starter Partner");
}

#[test]
fn per_student_shares_match_the_category() {
    let schedule = IncentiveSchedule::standard();

    assert_eq!(schedule.category_for(50).per_student_share, 75);
    assert_eq!(schedule.category_for(150).per_student_share, 85);
    assert_eq!(schedule.category_for(250).per_student_share, 95);
    assert_eq!(schedule.category_for(350).per_student_share, 110);
    assert_eq!(schedule.category_for(450).per_student_share, 125);
}

#[test]
fn engagement_bonus_takes_the_highest_threshold_reached() {
    let schedule = IncentiveSchedule::standard();

    assert_eq!(schedule.engagement_bonus(80), 20);
    assert_eq!(schedule.engagement_bonus(50), 20);
    assert_eq!(schedule.engagement_bonus(49), 15);
    assert_eq!(schedule.engagement_bonus(20), 15);
    assert_eq!(schedule.engagement_bonus(19), 10);
    assert_eq!(schedule.engagement_bonus(10), 10);
    assert_eq!(schedule.engagement_bonus(9), 5);
    assert_eq!(schedule.engagement_bonus(5), 5);
    assert_eq!(schedule.engagement_bonus(4), 0);
    assert_eq!(schedule.engagement_bonus(0), 0);
}

#[test]
fn an_empty_ladder_is_rejected() {
    let result = IncentiveSchedule::new(Vec::new(), zero_fallback());

    assert!(matches!(result, Err(ScheduleError::EmptyCategories)));
}

#[test]
fn a_ladder_starting_above_one_is_rejected() {
    let result = IncentiveSchedule::new(
        vec![CategoryTier {
            name: "Late Start",
            min: 10,
            max: None,
            per_student_share: 50,
        }],
        zero_fallback(),
    );

    assert!(matches!(result, Err(ScheduleError::LadderStart(10))));
}

#[test]
fn gaps_between_rungs_are_rejected() {
    let result = IncentiveSchedule::new(
        vec![
            CategoryTier {
                name: "First",
                min: 1,
                max: Some(100),
                per_student_share: 50,
            },
            CategoryTier {
                name: "Second",
                min: 102,
                max: None,
                per_student_share: 60,
            },
        ],
        zero_fallback(),
    );

    assert!(matches!(
        result,
        Err(ScheduleError::CategoryGap {
            name: "Second",
            expected: 101,
            found: 102
        })
    ));
}

#[test]
fn inverted_rungs_are_rejected() {
    let result = IncentiveSchedule::new(
        vec![CategoryTier {
            name: "Backwards",
            min: 1,
            max: Some(0),
            per_student_share: 50,
        }],
        zero_fallback(),
    );

    assert!(matches!(result, Err(ScheduleError::InvertedCategory("Backwards"))));
}

#[test]
fn only_the_final_rung_may_be_unbounded() {
    let result = IncentiveSchedule::new(
        vec![
            CategoryTier {
                name: "Open Middle",
                min: 1,
                max: None,
                per_student_share: 50,
            },
            CategoryTier {
                name: "Last",
                min: 101,
                max: None,
                per_student_share: 60,
            },
        ],
        zero_fallback(),
    );

    assert!(matches!(
        result,
        Err(ScheduleError::UnboundedMidLadder("Open Middle"))
    ));
}

#[test]
fn a_bounded_final_rung_is_rejected() {
    let result = IncentiveSchedule::new(
        vec![CategoryTier {
            name: "Capped",
            min: 1,
            max: Some(100),
            per_student_share: 50,
        }],
        zero_fallback(),
    );

    assert!(matches!(result, Err(ScheduleError::BoundedLadder("Capped"))));
}

#[test]
fn engagement_ladder_must_end_at_zero() {
    let result = IncentiveSchedule::new(
        vec![CategoryTier {
            name: "Only",
            min: 1,
            max: None,
            per_student_share: 50,
        }],
        vec![EngagementBonusTier {
            threshold: 10,
            bonus: 10,
        }],
    );

    assert!(matches!(result, Err(ScheduleError::EngagementCoverage)));
}

#[test]
fn engagement_thresholds_must_descend() {
    let result = IncentiveSchedule::new(
        vec![CategoryTier {
            name: "Only",
            min: 1,
            max: None,
            per_student_share: 50,
        }],
        vec![
            EngagementBonusTier {
                threshold: 10,
                bonus: 10,
            },
            EngagementBonusTier {
                threshold: 20,
                bonus: 15,
            },
            EngagementBonusTier {
                threshold: 0,
                bonus: 0,
            },
        ],
    );

    assert!(matches!(
        result,
        Err(ScheduleError::EngagementOrder {
            previous: 10,
            found: 20
        })
    ));
}
