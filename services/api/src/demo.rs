use crate::infra::{
    InMemoryCertificateIndex, InMemoryCoordinatorDirectory, InMemoryStudentDirectory,
};
use clap::Args;
use olympiad::competition::clock::{Clock, SystemClock};
use olympiad::competition::incentives::{IncentiveEngine, IncentiveSchedule};
use olympiad::competition::random::{RandomSource, ThreadRngSource};
use olympiad::competition::ranking::{CertificateIndex, MarksSubmission, RankBook, ScoreRecorder};
use olympiad::competition::roster::{
    ApprovalStatus, CoordinatorRecord, PaymentStatus, RankResult, RankStanding, RosterImporter,
    Scope, TestKind,
};
use olympiad::competition::standings::{StandingsBoard, StandingsPolicy};
use olympiad::competition::store::{CoordinatorDirectory, StudentDirectory};
use olympiad::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_COORDINATOR: &str = "coordinator-demo";

const DEMO_ROSTER: &str = "\
name,username,password,PhoneNumber,teacherPhoneNumber,whatsappNumber,standard,schoolName,country,state,city,mockScore,liveScore
Asha Rao,asha.rao,changeme,9800000101,9800000201,9800000301,8,Meadow Public School,India,Karnataka,Bengaluru,,
Vikram Shah,vikram.shah,changeme,9800000102,9800000202,9800000302,9,Riverside Academy,India,Gujarat,Surat,,
Meera Pillai,meera.pillai,changeme,9800000103,9800000203,9800000303,8,Lakeside High,India,Kerala,Kochi,96,
Dev Patel,dev.patel,changeme,9800000104,9800000204,9800000304,7,Meadow Public School,India,Karnataka,Bengaluru,91,
";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional roster CSV to enroll instead of the bundled cohort.
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Include the full global standings board in the output.
    #[arg(long)]
    pub(crate) list_standings: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        roster_csv,
        list_standings,
    } = args;

    println!("Olympiad competition demo");

    let book = Arc::new(RankBook::standard());
    let students = Arc::new(InMemoryStudentDirectory::default());
    let coordinators = Arc::new(InMemoryCoordinatorDirectory::default());
    let certificates = Arc::new(InMemoryCertificateIndex::default());
    let random: Arc<dyn RandomSource> = Arc::new(ThreadRngSource);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let importer = RosterImporter::new(
        students.clone(),
        book.clone(),
        random.clone(),
        clock.clone(),
    );
    let recorder = ScoreRecorder::new(
        students.clone(),
        certificates.clone(),
        book,
        random,
        clock.clone(),
    );
    let engine = IncentiveEngine::new(
        students.clone(),
        coordinators.clone(),
        IncentiveSchedule::standard(),
        clock.clone(),
    );

    let coordinator = CoordinatorRecord {
        uid: DEMO_COORDINATOR.to_string(),
        name: "Priya Nair".to_string(),
        country: "India".to_string(),
        state: "Karnataka".to_string(),
        city: "Bengaluru".to_string(),
        status: ApprovalStatus::Approved,
        category: None,
        total_paid_students: 0,
        total_incentives: 0,
        bonus_amount: 0,
        total_earnings: 0,
        rank: None,
        last_incentive_calculation: None,
        created_at: clock.now(),
    };
    if let Err(err) = coordinators.insert(coordinator) {
        println!("  Coordinator setup failed: {}", err);
        return Ok(());
    }

    println!("\nRoster import");
    let summary = match roster_csv {
        Some(path) => importer.import_path(Some(DEMO_COORDINATOR), path)?,
        None => importer.import_reader(Some(DEMO_COORDINATOR), DEMO_ROSTER.as_bytes()),
    };
    println!(
        "- {} students enrolled, {} rows rejected",
        summary.imported,
        summary.rejected.len()
    );
    for rejected in &summary.rejected {
        println!("  - row {}: {}", rejected.row, rejected.reason);
    }

    let roster = match students.all() {
        Ok(roster) => roster,
        Err(err) => {
            println!("  Student directory unavailable: {}", err);
            return Ok(());
        }
    };
    let Some(candidate) = roster.first().cloned() else {
        println!("  The roster produced no students to score");
        return Ok(());
    };

    println!("\nPayment funnel");
    for student in &roster {
        match engine.update_payment_status(
            DEMO_COORDINATOR,
            &student.uid,
            PaymentStatus::PaidButNotAttempted,
        ) {
            Ok(report) => println!(
                "- {} marked paid ({} in the funnel)",
                student.name, report.total_paid_students
            ),
            Err(err) => println!("  Payment update failed for {}: {}", student.name, err),
        }
    }

    println!("\nScore recording");
    for score in [92, 97] {
        match recorder.record(
            &candidate.uid,
            MarksSubmission {
                kind: TestKind::Mock,
                score,
                total: 100,
            },
        ) {
            Ok(report) => println!(
                "- {} practice run {}/100 -> global {}",
                candidate.name,
                score,
                standing_label(&report.ranks.global)
            ),
            Err(err) => println!("  Practice run failed for {}: {}", candidate.name, err),
        }
    }

    if let Some(runner_up) = roster.get(1) {
        for score in [88, 90, 92, 95, 97] {
            if let Err(err) = recorder.record(
                &runner_up.uid,
                MarksSubmission {
                    kind: TestKind::Mock,
                    score,
                    total: 100,
                },
            ) {
                println!("  Practice run failed for {}: {}", runner_up.name, err);
            }
        }
        println!("- {} completed five practice runs", runner_up.name);
        match recorder.record(
            &runner_up.uid,
            MarksSubmission {
                kind: TestKind::Live,
                score: 350,
                total: 400,
            },
        ) {
            Ok(report) => println!(
                "- {} live test 350/400 -> global {}",
                runner_up.name,
                standing_label(&report.ranks.global)
            ),
            Err(err) => println!("  Live submission failed for {}: {}", runner_up.name, err),
        }
    }

    let report = match recorder.record(
        &candidate.uid,
        MarksSubmission {
            kind: TestKind::Live,
            score: 400,
            total: 400,
        },
    ) {
        Ok(report) => report,
        Err(err) => {
            println!("  Live submission failed for {}: {}", candidate.name, err);
            return Ok(());
        }
    };
    println!(
        "- {} live test 400/400 -> global {}",
        candidate.name,
        standing_label(&report.ranks.global)
    );

    match report.certificate_code.as_deref() {
        Some(code) => {
            println!("\nCertificate {}", code);
            match certificates.fetch(code) {
                Ok(Some(certificate)) => match serde_json::to_string_pretty(&certificate) {
                    Ok(json) => println!("{}", json),
                    Err(err) => println!("  Certificate payload unavailable: {}", err),
                },
                Ok(None) => println!("  Certificate lookup returned no record"),
                Err(err) => println!("  Certificate index unavailable: {}", err),
            }
        }
        None => println!("  No certificate issued for the perfect run"),
    }

    println!("\nIncentives");
    match engine.update_payment_status(
        DEMO_COORDINATOR,
        &candidate.uid,
        PaymentStatus::PaidAndAttempted,
    ) {
        Ok(report) => println!(
            "- {} left the paid funnel after the live test ({} remain)",
            candidate.name, report.total_paid_students
        ),
        Err(err) => println!("  Payment update failed for {}: {}", candidate.name, err),
    }

    match engine.calculate(DEMO_COORDINATOR) {
        Ok(report) => println!(
            "- {} | {} paid students | base {} | bonus {} | total earnings {}",
            report.category,
            report.total_paid_students,
            report.base_incentive,
            report.bonus_amount,
            report.total_earnings
        ),
        Err(err) => {
            println!("  Incentive calculation unavailable: {}", err);
            return Ok(());
        }
    }

    match engine.leaderboard(false) {
        Ok(board) => {
            println!("- Leaderboard");
            for (index, entry) in board.iter().enumerate() {
                println!(
                    "  {}. {} [{}] earning {}",
                    index + 1,
                    entry.name,
                    entry.category,
                    entry.total_earnings
                );
            }
        }
        Err(err) => println!("  Leaderboard unavailable: {}", err),
    }

    match engine.partner_rank(DEMO_COORDINATOR) {
        Ok(rank) => println!("- Partner rank {} of {}", rank.rank, rank.total_coordinators),
        Err(err) => println!("  Partner rank unavailable: {}", err),
    }

    println!("\nStandings");
    let standings = StandingsBoard::new(students.clone(), StandingsPolicy::standard());
    match standings.for_student(&candidate.uid) {
        Ok(view) => {
            println!(
                "- {} holds {} cumulative marks",
                view.name, view.cumulative_score
            );
            println!(
                "  - global {} of {} ({})",
                view.global.rank, view.global.cohort, view.global.category
            );
            println!(
                "  - {}: {} of {} ({})",
                candidate.state, view.state.rank, view.state.cohort, view.state.category
            );
            println!(
                "  - {}: {} of {} ({})",
                candidate.city, view.city.rank, view.city.cohort, view.city.category
            );
        }
        Err(err) => println!("  Standings unavailable: {}", err),
    }

    if list_standings {
        match standings.board(Scope::Global, None) {
            Ok(entries) => {
                println!("\nGlobal board");
                for entry in entries {
                    println!(
                        "- {}. {} ({}) with {} marks [{}]",
                        entry.rank,
                        entry.name,
                        entry.school_name,
                        entry.cumulative_score,
                        entry.category
                    );
                }
            }
            Err(err) => println!("  Global board unavailable: {}", err),
        }
    }

    Ok(())
}

fn standing_label(result: &RankResult) -> String {
    match result.rank {
        RankStanding::Ranked(rank) => format!("rank {} ({})", rank, result.category),
        RankStanding::Unranked => "Unranked".to_string(),
    }
}
