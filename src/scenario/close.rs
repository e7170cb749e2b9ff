use super::{ScenarioRunner, settle};
use crate::board;
use crate::driver::{self, Page, Scope};
use crate::locator::Target;
use crate::report::{Phase, StepOutcome};

impl<P: Page> ScenarioRunner<'_, P> {
    /// Closes the edit dialog with its close button, or Escape when there is
    /// none. Never fails: whatever happens, the board must be queryable
    /// afterwards, so errors end in one more Escape.
    pub async fn close_dialog(&mut self) {
        tracing::info!("=== CLOSING CARD EDIT PAGE ===");

        let outcome = match self.try_close().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Dialog closing error: {}", e);
                if let Err(e) = self.page.press_escape().await {
                    tracing::warn!("Fallback Escape failed: {}", e);
                }
                settle(self.config.settle.after_extra_escape).await;
                StepOutcome::Unverified(e.to_string())
            }
        };
        self.record(Phase::CloseDialog, outcome);
    }

    async fn try_close(&self) -> driver::Result<StepOutcome> {
        let buttons = self.page.query(Scope::Page, &Target::CloseControl).await?;
        match buttons.first() {
            Some(button) => {
                self.page.click(button).await?;
                tracing::info!("Closed dialog using close button");
            }
            None => {
                self.page.press_escape().await?;
                tracing::info!("Closed dialog using Escape key");
            }
        }
        settle(self.config.settle.after_close).await;

        if self.board_visible().await? {
            tracing::info!("VERIFIED: Card edit page closed - main board is visible");
            return Ok(StepOutcome::Passed);
        }

        self.page.press_escape().await?;
        settle(self.config.settle.after_extra_escape).await;
        tracing::info!("Used additional Escape to ensure dialog closure");
        Ok(StepOutcome::Unverified(
            "board hidden after close, sent extra Escape".into(),
        ))
    }

    async fn board_visible(&self) -> driver::Result<bool> {
        match board::columns(self.page).await?.first() {
            Some(column) => self.page.is_visible(&column.heading).await,
            None => Ok(false),
        }
    }
}
