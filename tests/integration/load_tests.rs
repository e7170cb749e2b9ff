//! Board loading tests.
//!
//! Column headings may render after the page goes idle, so loading polls
//! for them until the column timeout.

use std::time::{Duration, Instant};

use crate::common::{config, heading_queries, scenario_a_with};
use kanban_e2e::report::Phase;
use kanban_e2e::{Config, Layout, ScenarioError, ScenarioRunner, StepOutcome};

fn polling_config(column_timeout: Duration) -> Config {
    Config {
        column_timeout,
        ..config()
    }
}

/// Test that headings rendered late are picked up before the deadline
#[tokio::test]
async fn test_late_headings_are_awaited() {
    let config = polling_config(Duration::from_secs(5));
    let board = scenario_a_with(Layout {
        headings_after_reads: 3,
        ..Layout::default()
    });

    let started = Instant::now();
    let report = ScenarioRunner::new(&board, &config).run().await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.outcome(Phase::LoadBoard), Some(&StepOutcome::Passed));
    assert_eq!(report.card_title, "Build settings page");
    assert_eq!(report.scorecard.score(), 7);
    // Three empty reads, so at least three polls of 250 ms.
    assert!(elapsed >= Duration::from_millis(750), "{:?}", elapsed);
    assert!(elapsed < config.column_timeout, "{:?}", elapsed);
}

/// Test that a board whose headings never render fails after the timeout
#[tokio::test]
async fn test_missing_headings_fail_after_timeout() {
    let config = polling_config(Duration::from_millis(600));
    let board = scenario_a_with(Layout {
        headings_after_reads: usize::MAX,
        ..Layout::default()
    });

    let started = Instant::now();
    let err = ScenarioRunner::new(&board, &config).run().await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, ScenarioError::NoColumns));
    assert!(elapsed >= config.column_timeout, "{:?}", elapsed);
    // Polled at 0, 250, 500 and once more at the deadline.
    assert!(heading_queries(&board) >= 3);
}

/// Test that a zero timeout reads the headings exactly once
#[tokio::test]
async fn test_zero_timeout_reads_once() {
    let config = polling_config(Duration::ZERO);
    let board = scenario_a_with(Layout {
        headings_after_reads: 1,
        ..Layout::default()
    });

    let err = ScenarioRunner::new(&board, &config).run().await.unwrap_err();

    assert!(matches!(err, ScenarioError::NoColumns));
    assert_eq!(heading_queries(&board), 1);
}
