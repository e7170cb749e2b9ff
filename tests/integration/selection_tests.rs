//! Card selection tests.
//!
//! Selection must be a pure function of the rendered board: same board,
//! same card.

use crate::common::{config, scenario_a};
use kanban_e2e::board::{self, parse_subtask_summary};
use kanban_e2e::{BoardSpec, CardSpec, FixtureBoard, Layout, ScenarioRunner};

async fn selected_title(spec: BoardSpec) -> (String, usize) {
    let config = config();
    let board = FixtureBoard::new(spec);
    let mut runner = ScenarioRunner::new(&board, &config);
    let columns = runner.load_board().await.unwrap();
    let selected = runner.select_card(&columns).await.unwrap();
    (selected.title, selected.column_index)
}

/// Test that selection skips the first column when a later one qualifies
#[tokio::test]
async fn test_prefers_cards_outside_first_column() {
    let spec = BoardSpec::new()
        .column("To Do", vec![CardSpec::new("Sketch wireframes", 0, 4)])
        .column("Doing", vec![CardSpec::new("Wire up API", 2, 3)])
        .column("Review", vec![CardSpec::new("Check contrast", 0, 1)]);

    assert_eq!(selected_title(spec).await, ("Wire up API".to_string(), 1));
}

/// Test that the first qualifying card in rendered order wins
#[tokio::test]
async fn test_first_incomplete_card_wins() {
    let spec = BoardSpec::new()
        .column("To Do", vec![])
        .column(
            "Doing",
            vec![
                CardSpec::new("Finished already", 3, 3),
                CardSpec::new("Almost there", 2, 3),
                CardSpec::new("Barely started", 0, 5),
            ],
        );

    assert_eq!(selected_title(spec).await, ("Almost there".to_string(), 1));
}

/// Test that the first column is searched last
#[tokio::test]
async fn test_falls_back_to_first_column() {
    let spec = BoardSpec::new()
        .column("To Do", vec![CardSpec::new("Only open card", 0, 1)])
        .column("Doing", vec![CardSpec::new("Done here", 1, 1)])
        .column("Done", vec![]);

    assert_eq!(selected_title(spec).await, ("Only open card".to_string(), 0));
}

/// Test that cards without subtasks are never selected
#[tokio::test]
async fn test_cards_without_subtasks_are_skipped() {
    let spec = BoardSpec::new()
        .column("To Do", vec![])
        .column(
            "Doing",
            vec![CardSpec::new("No checklist", 0, 0), CardSpec::new("Checklist", 0, 2)],
        );

    assert_eq!(selected_title(spec).await, ("Checklist".to_string(), 1));
}

/// Test that "substasks" summaries are parsed like "subtasks"
#[tokio::test]
async fn test_misspelled_summaries_are_understood() {
    let spec = scenario_a().layout(Layout {
        misspell_summary: true,
        ..Layout::default()
    });

    assert_eq!(
        selected_title(spec).await,
        ("Build settings page".to_string(), 1)
    );
}

/// Test that the same snapshot always yields the same card
#[tokio::test]
async fn test_selection_is_deterministic() {
    let first = selected_title(scenario_a()).await;
    let second = selected_title(scenario_a()).await;
    assert_eq!(first, second);
}

/// Test that re-reading the board without changes gives identical counts
#[tokio::test]
async fn test_rereading_board_is_idempotent() {
    let config = config();
    let fixture = FixtureBoard::new(scenario_a());
    ScenarioRunner::new(&fixture, &config)
        .load_board()
        .await
        .unwrap();

    let mut reads = Vec::new();
    for _ in 0..2 {
        let mut snapshot = Vec::new();
        for column in board::columns(&fixture).await.unwrap() {
            let mut summaries = Vec::new();
            for card in board::cards(&fixture, &column).await.unwrap() {
                let text = board::card_summary(&fixture, &card).await.unwrap();
                summaries.push(parse_subtask_summary(&text));
            }
            snapshot.push((column.label, summaries));
        }
        reads.push(snapshot);
    }

    assert_eq!(reads[0], reads[1]);
    assert_eq!(reads[0][0].0, "To Do (2)");
    assert_eq!(reads[0][2].0, "Done (0)");
}
