use super::{DialogScope, ScenarioRunner, settle};
use crate::board;
use crate::driver::{self, Page, Scope};
use crate::locator::{OptionStrategy, StatusStrategy, Target, first_non_empty};
use crate::report::{Phase, StepOutcome};

const CANDIDATES_LOGGED: usize = 5;

enum MoveAttempt {
    Moved(String),
    NoControl,
    NoOption(String),
}

impl<P: Page> ScenarioRunner<'_, P> {
    /// Best-effort move of the card to the first column through the dialog's
    /// "Current Status" dropdown. Cards already in the first column count as
    /// moved without touching the dropdown.
    pub async fn move_to_first_column(
        &mut self,
        scope: &DialogScope<P::Element>,
        column_index: usize,
    ) -> bool {
        tracing::info!("=== CARD MOVEMENT ASSESSMENT ===");

        if column_index == 0 {
            tracing::info!("Card was selected from first column - no movement required");
            self.record(
                Phase::MoveCard,
                StepOutcome::Skipped("card already in first column".into()),
            );
            return true;
        }

        tracing::info!("Attempting to move card to first column using Current Status dropdown");
        match self.pick_first_column(scope).await {
            Ok(MoveAttempt::Moved(option)) => {
                tracing::info!("Selected dropdown option \"{}\"", option);
                self.record(Phase::MoveCard, StepOutcome::Passed);
                true
            }
            Ok(MoveAttempt::NoControl) => {
                tracing::warn!("Current Status dropdown not found in edit dialog");
                self.record(
                    Phase::MoveCard,
                    StepOutcome::SoftFailed("status control not found".into()),
                );
                false
            }
            Ok(MoveAttempt::NoOption(name)) => {
                tracing::warn!("Could not find any dropdown options to click");
                self.record(
                    Phase::MoveCard,
                    StepOutcome::SoftFailed(format!("no option for \"{}\"", name)),
                );
                false
            }
            Err(e) => {
                tracing::warn!("Card movement error: {}", e);
                self.record(Phase::MoveCard, StepOutcome::SoftFailed(e.to_string()));
                false
            }
        }
    }

    async fn pick_first_column(
        &self,
        scope: &DialogScope<P::Element>,
    ) -> driver::Result<MoveAttempt> {
        let Some((strategy, controls)) =
            first_non_empty(self.page, scope.scope(), StatusStrategy::targets()).await?
        else {
            return Ok(MoveAttempt::NoControl);
        };
        tracing::info!(
            "Found {} potential Current Status dropdowns via {:?}",
            controls.len(),
            strategy
        );

        self.page.click(&controls[0]).await?;
        tracing::info!("Clicked Current Status dropdown");
        settle(self.config.settle.after_dropdown).await;

        let first_column = board::columns(self.page)
            .await?
            .into_iter()
            .next()
            .map(|c| c.name)
            .unwrap_or_default();
        tracing::info!("Looking for first column option: \"{}\"", first_column);

        let strategies = OptionStrategy::ordered(&first_column, &self.config.fallback_options)
            .into_iter()
            .map(Target::StatusOption);
        let Some((_, options)) = first_non_empty(self.page, Scope::Page, strategies).await?
        else {
            self.log_option_candidates().await;
            return Ok(MoveAttempt::NoOption(first_column));
        };

        let option = &options[0];
        let label = self.page.text(option).await?.trim().to_string();
        self.page.click(option).await?;
        settle(self.config.settle.after_dropdown).await;
        Ok(MoveAttempt::Moved(label))
    }

    async fn log_option_candidates(&self) {
        let candidates = match self.page.query(Scope::Page, &Target::OptionCandidate).await {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("Could not list dropdown candidates: {}", e);
                return;
            }
        };
        tracing::info!(
            "Found {} potential dropdown options for debugging:",
            candidates.len()
        );
        for (i, candidate) in candidates.iter().take(CANDIDATES_LOGGED).enumerate() {
            match self.page.text(candidate).await {
                Ok(text) => tracing::info!("  Option {}: \"{}\"", i, text.trim()),
                Err(_) => tracing::info!("  Option {}: Could not read text", i),
            }
        }
    }
}
