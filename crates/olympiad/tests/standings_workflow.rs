//! Integration specifications for cumulative standings.
//!
//! Scenarios cover boards computed on read from every recorded score:
//! global ordering, geographic partitions, per-student fan-out across all
//! four scopes, and the HTTP query surface.

mod common {
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};

    use olympiad::competition::roster::domain::{ScoreEntry, StudentRecord, TestKind};
    use olympiad::competition::standings::{StandingsBoard, StandingsPolicy};
    use olympiad::competition::store::{DirectoryError, StudentDirectory};

    #[derive(Default)]
    pub(super) struct MemoryStudents {
        records: Mutex<Vec<StudentRecord>>,
    }

    impl StudentDirectory for MemoryStudents {
        fn insert(&self, record: StudentRecord) -> Result<StudentRecord, DirectoryError> {
            let mut records = self.records.lock().expect("lock");
            if records.iter().any(|existing| existing.uid == record.uid) {
                return Err(DirectoryError::Conflict);
            }
            records.push(record.clone());
            Ok(record)
        }

        fn fetch(&self, uid: &str) -> Result<Option<StudentRecord>, DirectoryError> {
            let records = self.records.lock().expect("lock");
            Ok(records.iter().find(|record| record.uid == uid).cloned())
        }

        fn update(&self, record: StudentRecord) -> Result<(), DirectoryError> {
            let mut records = self.records.lock().expect("lock");
            match records.iter_mut().find(|existing| existing.uid == record.uid) {
                Some(slot) => {
                    *slot = record;
                    Ok(())
                }
                None => Err(DirectoryError::NotFound),
            }
        }

        fn all(&self) -> Result<Vec<StudentRecord>, DirectoryError> {
            Ok(self.records.lock().expect("lock").clone())
        }
    }

    pub(super) fn scoring_student(
        uid: &str,
        name: &str,
        state: &str,
        city: &str,
        attempts: &[(TestKind, u32)],
    ) -> StudentRecord {
        let recorded_at = Utc
            .with_ymd_and_hms(2026, 5, 1, 9, 0, 0)
            .single()
            .expect("valid date");
        let mut student = StudentRecord {
            uid: uid.to_string(),
            name: name.to_string(),
            username: format!("{uid}-login"),
            school_name: "Meadow Public School".to_string(),
            standard: "8".to_string(),
            country: "India".to_string(),
            state: state.to_string(),
            city: city.to_string(),
            payment_status: Default::default(),
            practice_tests_attempted: 0,
            test_completed: false,
            added_by: None,
            marks: Default::default(),
            ranks: Default::default(),
            certificate_codes: Vec::new(),
            created_at: recorded_at,
        };
        for (index, &(kind, score)) in attempts.iter().enumerate() {
            student.marks.entry(kind).or_default().insert(
                format!("test-{index}"),
                ScoreEntry {
                    score,
                    total: kind.max_score(),
                    recorded_at,
                },
            );
        }
        student
    }

    /// Four students: two in Bengaluru, one in Surat, one in Mysuru.
    pub(super) fn seeded_board() -> (Arc<StandingsBoard<MemoryStudents>>, Arc<MemoryStudents>) {
        let students = Arc::new(MemoryStudents::default());
        students
            .insert(scoring_student(
                "stu-a",
                "Asha Rao",
                "Karnataka",
                "Bengaluru",
                &[(TestKind::Mock, 80), (TestKind::Mock, 95), (TestKind::Live, 350)],
            ))
            .expect("insert");
        students
            .insert(scoring_student(
                "stu-b",
                "Vikram Shah",
                "Gujarat",
                "Surat",
                &[(TestKind::Mock, 90), (TestKind::Live, 200)],
            ))
            .expect("insert");
        students
            .insert(scoring_student(
                "stu-c",
                "Meera Pillai",
                "Karnataka",
                "Bengaluru",
                &[(TestKind::Live, 290)],
            ))
            .expect("insert");
        students
            .insert(scoring_student(
                "stu-d",
                "Dev Patel",
                "Karnataka",
                "Mysuru",
                &[],
            ))
            .expect("insert");
        let board = Arc::new(StandingsBoard::new(
            students.clone(),
            StandingsPolicy::standard(),
        ));
        (board, students)
    }
}

mod boards {
    use super::common::*;
    use olympiad::competition::roster::domain::Scope;
    use olympiad::competition::standings::StandingsError;

    #[test]
    fn the_global_board_orders_by_total_scored_marks() {
        let (board, _) = seeded_board();

        let entries = board.board(Scope::Global, None).expect("global board");

        let order: Vec<&str> = entries.iter().map(|entry| entry.uid.as_str()).collect();
        // stu-b and stu-c both total 290; the earlier directory entry wins.
        assert_eq!(order, vec!["stu-a", "stu-b", "stu-c", "stu-d"]);
        assert_eq!(entries[0].cumulative_score, 525);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].category, "Gold");
        assert_eq!(entries[3].cumulative_score, 0);
        assert_eq!(entries[3].rank, 4);
    }

    #[test]
    fn geographic_boards_rank_within_the_partition() {
        let (board, _) = seeded_board();

        let entries = board
            .board(Scope::City, Some("bengaluru"))
            .expect("city board");

        let order: Vec<&str> = entries.iter().map(|entry| entry.uid.as_str()).collect();
        assert_eq!(order, vec!["stu-a", "stu-c"]);
        assert_eq!(entries[1].rank, 2);

        let missing = board.board(Scope::State, None).expect_err("partition required");
        assert!(matches!(missing, StandingsError::MissingPartition(Scope::State)));
    }

    #[test]
    fn per_student_standings_fan_out_across_scopes() {
        let (board, _) = seeded_board();

        let standings = board.for_student("stu-a").expect("standings");

        assert_eq!(standings.cumulative_score, 525);
        assert_eq!(standings.global.rank, 1);
        assert_eq!(standings.global.cohort, 4);
        assert_eq!(standings.country.cohort, 4);
        assert_eq!(standings.state.cohort, 3);
        assert_eq!(standings.city.cohort, 2);
        assert_eq!(standings.city.rank, 1);
        assert_eq!(standings.city.category, "Gold");

        let missing = board.for_student("stu-z").expect_err("unknown student");
        assert!(matches!(missing, StandingsError::StudentNotFound(_)));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use olympiad::competition::standings::standings_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload = serde_json::from_slice(&body).expect("json");
        (status, payload)
    }

    #[tokio::test]
    async fn standings_are_served_with_scope_filters() {
        let (board, _) = seeded_board();
        let router = standings_router(board);

        let (status, payload) = get(router.clone(), "/api/v1/standings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.as_array().expect("array").len(), 4);
        assert_eq!(payload[0]["uid"], json!("stu-a"));
        assert_eq!(payload[0]["cumulativeScore"], json!(525));

        let (status, payload) =
            get(router.clone(), "/api/v1/standings?scope=city&name=Bengaluru").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.as_array().expect("array").len(), 2);
        assert_eq!(payload[1]["uid"], json!("stu-c"));

        let (status, payload) = get(router.clone(), "/api/v1/standings?scope=state").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload.get("error").is_some());

        let (status, payload) = get(router.clone(), "/api/v1/students/stu-a/standings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["cumulativeScore"], json!(525));
        assert_eq!(payload["city"]["cohort"], json!(2));
        assert_eq!(payload["global"]["rank"], json!(1));

        let (status, _) = get(router, "/api/v1/students/stu-z/standings").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
