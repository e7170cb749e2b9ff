//! Suite and fixture-file tests.

use std::io::Write;

use crate::common::{config, scenario_a};
use kanban_e2e::suite::{run_case, run_suite};
use kanban_e2e::{Case, CaseOutcome, FixtureBoard};

/// Test that the suite runs edit-card and skips the disabled delete case
#[tokio::test]
async fn test_suite_skips_disabled_cases() {
    let config = config();
    let board = FixtureBoard::new(scenario_a());

    let results = run_suite(&board, &config).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, Case::EditCard);
    assert!(matches!(&results[0].1, Ok(CaseOutcome::Passed(report)) if report.scorecard.score() == 7));
    assert_eq!(results[1].0, Case::DeleteCard);
    assert!(matches!(results[1].1, Ok(CaseOutcome::Skipped)));
}

/// Test that a disabled case never touches the page
#[tokio::test]
async fn test_disabled_case_has_no_interactions() {
    let config = config();
    let board = FixtureBoard::new(scenario_a());

    let outcome = run_case(&board, &config, Case::DeleteCard).await.unwrap();

    assert!(matches!(outcome, CaseOutcome::Skipped));
    assert!(board.interactions().is_empty());
}

/// Test that a board described in a JSON file can be run
#[tokio::test]
async fn test_board_loaded_from_file() {
    let config = config();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "columns": [
                {{"name": "Ideas", "cards": []}},
                {{"name": "Building", "cards": [
                    {{"title": "Offline mode", "subtasks": [
                        {{"title": "Cache assets", "done": true}},
                        {{"title": "Queue writes"}}
                    ]}}
                ]}}
            ],
            "layout": {{"close_button": false}}
        }}"#
    )
    .unwrap();

    let board = FixtureBoard::load(file.path()).unwrap();
    let outcome = run_case(&board, &config, Case::EditCard).await.unwrap();

    let CaseOutcome::Passed(report) = outcome else {
        panic!("edit-card should run");
    };
    assert_eq!(report.card_title, "Offline mode");
    assert_eq!(report.initial_summary, "1 of 2 subtasks");
    assert_eq!(board.column_of("Offline mode"), Some(0));
}

/// Test that a missing fixture file is an I/O error
#[test]
fn test_missing_fixture_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(FixtureBoard::load(dir.path().join("board.json")).is_err());
}
