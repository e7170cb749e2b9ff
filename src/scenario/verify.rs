use super::{ScenarioRunner, SelectedCard};
use crate::board::{self, parse_subtask_summary};
use crate::driver::{self, Page};
use crate::report::{PersistenceCheck, Phase, StepOutcome};

impl<P: Page> ScenarioRunner<'_, P> {
    /// Re-reads the board and compares the selected card's completed count
    /// with the one captured at selection. Logs only; never fails the run.
    pub async fn verify_persistence(
        &mut self,
        selected: &SelectedCard<P::Element>,
    ) -> Option<PersistenceCheck> {
        tracing::info!("=== VERIFICATION PHASE ===");

        let (outcome, check) = match self.find_persisted(selected).await {
            Ok(Some(check)) if check.increased() => {
                tracing::info!("VERIFIED: Subtask completion count increased and persisted");
                (StepOutcome::Passed, Some(check))
            }
            Ok(Some(check)) if check.decreased() => {
                tracing::warn!(
                    "Subtask count went down from {} to {:?}",
                    check.before.completed,
                    check.after.map(|a| a.completed)
                );
                (
                    StepOutcome::SoftFailed("completed count decreased".into()),
                    Some(check),
                )
            }
            Ok(Some(check)) => {
                tracing::warn!("Subtask count unchanged after dialog close");
                (
                    StepOutcome::Unverified("completed count unchanged".into()),
                    Some(check),
                )
            }
            Ok(None) => {
                tracing::warn!("Card \"{}\" not found after closing dialog", selected.title);
                (StepOutcome::Unverified("card not found".into()), None)
            }
            Err(e) => {
                tracing::warn!("Could not re-read board: {}", e);
                (StepOutcome::Unverified(e.to_string()), None)
            }
        };
        self.record(Phase::VerifyPersistence, outcome);
        check
    }

    async fn find_persisted(
        &self,
        selected: &SelectedCard<P::Element>,
    ) -> driver::Result<Option<PersistenceCheck>> {
        let wanted = selected.title.trim();
        if wanted.is_empty() {
            return Ok(None);
        }

        for column in board::columns(self.page).await? {
            for card in board::cards(self.page, &column).await? {
                let title = board::card_title(self.page, &card).await?;
                if title.trim() != wanted {
                    continue;
                }

                let current = board::card_summary(self.page, &card).await?;
                tracing::info!("Found card in column {}", column.index + 1);
                tracing::info!("Current subtask status: \"{}\"", current);
                tracing::info!("Initial subtask status: \"{}\"", selected.summary_text);

                return Ok(Some(PersistenceCheck {
                    column_index: column.index,
                    before: selected.summary,
                    after: parse_subtask_summary(&current),
                }));
            }
        }

        Ok(None)
    }
}
