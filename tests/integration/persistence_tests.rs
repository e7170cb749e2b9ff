//! Persistence verification tests.

use crate::common::{config, scenario_a_with};
use kanban_e2e::board::SubtaskSummary;
use kanban_e2e::report::Phase;
use kanban_e2e::{BoardSpec, CardSpec, FixtureBoard, Layout, ScenarioRunner, StepOutcome};

/// Test that a check the app drops is reported without failing the run
#[tokio::test]
async fn test_unpersisted_check_is_unverified() {
    let config = config();
    let board = scenario_a_with(Layout {
        persist_checks: false,
        ..Layout::default()
    });

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert!(report.subtask_completed);
    assert!(matches!(
        report.outcome(Phase::VerifyPersistence),
        Some(StepOutcome::Unverified(_))
    ));
    let persistence = report.persistence.unwrap();
    assert_eq!(persistence.after, Some(persistence.before));
    assert!(!persistence.increased());
    assert!(!persistence.decreased());
}

/// Test that the completed count never goes down across a run
#[tokio::test]
async fn test_completed_count_is_monotonic() {
    let config = config();
    let board = FixtureBoard::new(
        BoardSpec::new()
            .column("To Do", vec![CardSpec::new("Audit permissions", 0, 1)])
            .column(
                "Doing",
                vec![
                    CardSpec::new("Refresh icons", 4, 4),
                    CardSpec::new("Localize footer", 3, 5),
                ],
            ),
    );

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert_eq!(report.card_title, "Localize footer");
    let persistence = report.persistence.unwrap();
    assert_eq!(persistence.before.completed, 3);
    assert!(persistence.after.unwrap().completed >= persistence.before.completed);
    assert_eq!(
        board.summary_of("Localize footer"),
        Some(SubtaskSummary {
            completed: 4,
            total: 5
        })
    );
    // Untouched cards keep their counts.
    assert_eq!(
        board.summary_of("Audit permissions"),
        Some(SubtaskSummary {
            completed: 0,
            total: 1
        })
    );
}

/// Test that the card is found again in the column it was moved to
#[tokio::test]
async fn test_moved_card_is_found_in_first_column() {
    let config = config();
    let board = scenario_a_with(Layout::default());

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    let persistence = report.persistence.unwrap();
    assert_eq!(persistence.column_index, 0);
    assert_eq!(
        persistence.after,
        Some(SubtaskSummary {
            completed: 2,
            total: 3
        })
    );
}
