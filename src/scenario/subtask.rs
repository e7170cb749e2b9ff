use super::{DialogScope, ScenarioRunner, settle};
use crate::driver::{self, Page};
use crate::locator::Target;
use crate::report::{Phase, StepOutcome};

impl<P: Page> ScenarioRunner<'_, P> {
    /// Checks the first unchecked subtask in the dialog. Returns whether the
    /// checkbox was set; this is the run's binding outcome.
    pub async fn complete_subtask(&mut self, scope: &DialogScope<P::Element>) -> bool {
        tracing::info!("=== COMPLETING SUBTASK ===");

        let unchecked = match self
            .page
            .query(scope.scope(), &Target::UncheckedCheckbox)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Could not list checkboxes: {}", e);
                self.record(Phase::CompleteSubtask, StepOutcome::SoftFailed(e.to_string()));
                return false;
            }
        };
        tracing::info!("Found {} unchecked checkboxes", unchecked.len());

        let Some(checkbox) = unchecked.first() else {
            self.record(
                Phase::CompleteSubtask,
                StepOutcome::SoftFailed("no unchecked checkbox".into()),
            );
            return false;
        };

        let checkbox_id = match self.check(checkbox).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Subtask completion failed: {}", e);
                self.record(Phase::CompleteSubtask, StepOutcome::SoftFailed(e.to_string()));
                return false;
            }
        };

        tracing::info!("Subtask completed successfully");
        self.record(Phase::CompleteSubtask, StepOutcome::Passed);
        settle(self.config.settle.after_check).await;

        let outcome = match checkbox_id {
            Some(id) => self.verify_strikethrough(scope, &id).await,
            None => StepOutcome::Unverified("checkbox has no id".into()),
        };
        self.record(Phase::Strikethrough, outcome);
        true
    }

    // Pointer clicks on these checkboxes are unreliable, so the state is set
    // directly and the change event dispatched by the driver.
    async fn check(&self, checkbox: &P::Element) -> driver::Result<Option<String>> {
        let id = self.page.attribute(checkbox, "id").await?;
        tracing::info!("Completing subtask: {:?}", id);
        self.page.force_check(checkbox).await?;
        Ok(id)
    }

    async fn verify_strikethrough(
        &self,
        scope: &DialogScope<P::Element>,
        checkbox_id: &str,
    ) -> StepOutcome {
        match self.label_struck_through(scope, checkbox_id).await {
            Ok(Some(true)) => {
                tracing::info!("VERIFIED: Subtask shows strikethrough effect");
                StepOutcome::Passed
            }
            Ok(Some(false)) => {
                tracing::info!("Subtask label is not struck through");
                StepOutcome::Unverified("label not struck through".into())
            }
            Ok(None) => StepOutcome::Unverified(format!("no label for {}", checkbox_id)),
            Err(e) => {
                tracing::info!("Could not verify strikethrough effect: {}", e);
                StepOutcome::Unverified(e.to_string())
            }
        }
    }

    async fn label_struck_through(
        &self,
        scope: &DialogScope<P::Element>,
        checkbox_id: &str,
    ) -> driver::Result<Option<bool>> {
        let labels = self
            .page
            .query(scope.scope(), &Target::LabelFor(checkbox_id.to_string()))
            .await?;
        let Some(label) = labels.first() else {
            return Ok(None);
        };
        let decoration = self.page.computed_style(label, "text-decoration").await?;
        Ok(Some(decoration.contains("line-through")))
    }
}
