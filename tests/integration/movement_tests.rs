//! Column move tests.
//!
//! Moving is best effort: none of these failures may fail the run.

use crate::common::{config, scenario_a_with};
use kanban_e2e::fixture::Interaction;
use kanban_e2e::locator::{StatusStrategy, Target};
use kanban_e2e::report::Phase;
use kanban_e2e::{BoardSpec, CardSpec, Config, FixtureBoard, Layout, ScenarioRunner, StepOutcome};

fn renamed_statuses(labels: &[&str]) -> FixtureBoard {
    FixtureBoard::new(
        BoardSpec::new()
            .column("Backlog", vec![])
            .column("In Flight", vec![CardSpec::new("Tune cache eviction", 1, 2)])
            .layout(Layout {
                status_labels: labels.iter().map(|l| l.to_string()).collect(),
                ..Layout::default()
            }),
    )
}

/// Test that the disabled-input control is used when it is rendered
#[tokio::test]
async fn test_disabled_input_control_is_tried_first() {
    let config = config();
    let board = scenario_a_with(Layout {
        status_control: vec![StatusStrategy::DisabledInput, StatusStrategy::NearLabel],
        ..Layout::default()
    });

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert!(report.moved);
    let status_queries: Vec<_> = board
        .interactions()
        .into_iter()
        .filter(|i| matches!(i, Interaction::Query(Target::StatusControl(_))))
        .collect();
    assert_eq!(
        status_queries,
        vec![Interaction::Query(Target::StatusControl(
            StatusStrategy::DisabledInput
        ))]
    );
}

/// Test that later strategies are tried until one finds the control
#[tokio::test]
async fn test_falls_through_to_near_label_strategy() {
    let config = config();
    let board = scenario_a_with(Layout {
        status_control: vec![StatusStrategy::NearLabel],
        ..Layout::default()
    });

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert!(report.moved);
    assert_eq!(board.column_of("Build settings page"), Some(0));
}

/// Test that a dialog without a status control leaves the card in place
#[tokio::test]
async fn test_missing_status_control_is_soft_failure() {
    let config = config();
    let board = scenario_a_with(Layout {
        status_control: vec![],
        ..Layout::default()
    });

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert!(!report.moved);
    assert!(matches!(
        report.outcome(Phase::MoveCard),
        Some(StepOutcome::SoftFailed(_))
    ));
    assert_eq!(board.column_of("Build settings page"), Some(1));
    assert_eq!(report.scorecard.score(), 6);
    assert!(report.subtask_completed);
}

/// Test that a loosely matching option is accepted
#[tokio::test]
async fn test_partial_option_match() {
    let config = config();
    let board = renamed_statuses(&["Product backlog", "In flight"]);

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert!(report.moved);
    assert_eq!(board.column_of("Tune cache eviction"), Some(0));
}

/// Test that unknown option labels leave the card where it was
#[tokio::test]
async fn test_unmatched_options_are_listed_and_skipped() {
    let config = config();
    let board = renamed_statuses(&["Icebox", "Active"]);

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert!(!report.moved);
    assert_eq!(board.column_of("Tune cache eviction"), Some(1));
    assert!(board
        .interactions()
        .contains(&Interaction::Query(Target::OptionCandidate)));
}

/// Test that the configured allow-list is the last resort
#[tokio::test]
async fn test_allow_list_option_is_clicked() {
    let config: Config = config().with_fallback_options(vec!["icebox".to_string()]);
    let board = renamed_statuses(&["Icebox", "Active"]);

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert!(report.moved);
    assert_eq!(board.column_of("Tune cache eviction"), Some(0));
}
