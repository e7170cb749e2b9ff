//! Dialog closing tests.

use crate::common::{config, escapes, scenario_a_with};
use kanban_e2e::fixture::{FixtureElement, Interaction};
use kanban_e2e::report::Phase;
use kanban_e2e::{BoardSpec, CardSpec, FixtureBoard, Layout, ScenarioRunner, StepOutcome};

/// Test that the close button is preferred over Escape
#[tokio::test]
async fn test_close_button_is_clicked() {
    let config = config();
    let board = scenario_a_with(Layout::default());

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert_eq!(report.outcome(Phase::CloseDialog), Some(&StepOutcome::Passed));
    assert!(board
        .interactions()
        .contains(&Interaction::Click(FixtureElement::CloseButton)));
    assert_eq!(escapes(&board), 0);
}

/// Test that Escape closes dialogs that have no close button
#[tokio::test]
async fn test_escape_when_no_close_button() {
    let config = config();
    let board = scenario_a_with(Layout {
        close_button: false,
        ..Layout::default()
    });

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert_eq!(report.outcome(Phase::CloseDialog), Some(&StepOutcome::Passed));
    assert_eq!(escapes(&board), 1);
    assert!(!board.dialog_open());
}

/// Test that a dialog ignoring Escape is reported but does not fail the run
#[tokio::test]
async fn test_stuck_dialog_gets_extra_escape() {
    let config = config();
    let board = scenario_a_with(Layout {
        close_button: false,
        escape_closes: false,
        ..Layout::default()
    });

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert!(matches!(
        report.outcome(Phase::CloseDialog),
        Some(StepOutcome::Unverified(_))
    ));
    assert_eq!(escapes(&board), 2);
    assert_eq!(report.scorecard.score(), 7);
}

/// Test that a dropdown left open by a failed move is dismissed first
#[tokio::test]
async fn test_open_dropdown_is_dismissed_before_dialog() {
    let config = config();
    let board = FixtureBoard::new(
        BoardSpec::new()
            .column("Backlog", vec![])
            .column("Doing", vec![CardSpec::new("Tune cache eviction", 1, 2)])
            .layout(Layout {
                close_button: false,
                status_labels: vec!["Icebox".to_string(), "Active".to_string()],
                ..Layout::default()
            }),
    );

    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();

    assert!(!report.moved);
    assert!(matches!(
        report.outcome(Phase::CloseDialog),
        Some(StepOutcome::Unverified(_))
    ));
    assert_eq!(escapes(&board), 2);
    assert!(!board.dialog_open());
}
