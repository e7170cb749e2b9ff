use super::ScenarioRunner;
use crate::board::{self, Column, SubtaskSummary, parse_subtask_summary};
use crate::driver::Page;
use crate::error::{ScenarioError, ScenarioResult};
use crate::report::{Phase, StepOutcome};

/// The card the run works on, as captured when it was selected.
#[derive(Debug, Clone)]
pub struct SelectedCard<E> {
    pub element: E,
    pub column_index: usize,
    pub title: String,
    pub summary_text: String,
    pub summary: SubtaskSummary,
}

/// Column indices in the order they are searched: everything after the
/// first column, then the first column, so that moving the card to the
/// first column actually changes something.
pub fn scan_order(column_count: usize) -> Vec<usize> {
    if column_count > 1 {
        (1..column_count).chain(std::iter::once(0)).collect()
    } else {
        (0..column_count).collect()
    }
}

impl<P: Page> ScenarioRunner<'_, P> {
    /// First card, in scan order, with fewer completed than total subtasks.
    pub async fn select_card(
        &mut self,
        columns: &[Column<P::Element>],
    ) -> ScenarioResult<SelectedCard<P::Element>> {
        for column in scan_order(columns.len()).into_iter().map(|i| &columns[i]) {
            tracing::info!("Checking column {}: {}", column.index + 1, column.label);

            let cards = board::cards(self.page, column).await?;
            tracing::info!("  Found {} cards in this column", cards.len());

            for (card_index, card) in cards.into_iter().enumerate() {
                let summary_text = board::card_summary(self.page, &card).await?;
                tracing::debug!("  Card {}: {}", card_index, summary_text);

                let Some(summary) = parse_subtask_summary(&summary_text) else {
                    continue;
                };
                if !summary.is_incomplete() {
                    continue;
                }

                let title = board::card_title(self.page, &card).await?;
                tracing::info!(
                    "Selected card \"{}\" in column {} with {} incomplete subtasks",
                    title,
                    column.index + 1,
                    summary.remaining()
                );
                self.record(Phase::SelectCard, StepOutcome::Passed);
                return Ok(SelectedCard {
                    element: card,
                    column_index: column.index,
                    title,
                    summary_text,
                    summary,
                });
            }
        }

        self.record(
            Phase::SelectCard,
            StepOutcome::SoftFailed("no card with incomplete subtasks".into()),
        );
        Err(ScenarioError::NoIncompleteCard)
    }
}
