use super::{ScenarioRunner, SelectedCard, settle};
use crate::board::title_prefix;
use crate::driver::{self, Page, Scope};
use crate::error::ScenarioResult;
use crate::locator::Target;
use crate::report::{Phase, StepOutcome};

/// Where the dialog's controls are looked up. Falls back to the whole page
/// when the edit dialog could not be told apart from other overlays.
#[derive(Debug, Clone)]
pub enum DialogScope<E> {
    Dialog(E),
    Page,
}

impl<E> DialogScope<E> {
    pub fn scope(&self) -> Scope<'_, E> {
        match self {
            DialogScope::Dialog(element) => Scope::Within(element),
            DialogScope::Page => Scope::Page,
        }
    }
}

impl<P: Page> ScenarioRunner<'_, P> {
    /// Clicks the card and locates its edit dialog. Only the click itself
    /// can fail the run.
    pub async fn open_dialog(
        &mut self,
        selected: &SelectedCard<P::Element>,
    ) -> ScenarioResult<DialogScope<P::Element>> {
        self.page.click(&selected.element).await?;
        tracing::info!("Clicked on card to open subtask edit dialog");
        settle(self.config.settle.after_open).await;

        let scope = match self.find_dialog(&selected.title).await {
            Ok(Some(dialog)) => {
                self.record(Phase::OpenDialog, StepOutcome::Passed);
                DialogScope::Dialog(dialog)
            }
            Ok(None) => {
                tracing::warn!("Edit dialog not found, using the whole page as scope");
                self.record(
                    Phase::OpenDialog,
                    StepOutcome::Unverified("dialog not found, searching page".into()),
                );
                DialogScope::Page
            }
            Err(e) => {
                tracing::warn!("Edit dialog lookup failed: {}", e);
                self.record(Phase::OpenDialog, StepOutcome::SoftFailed(e.to_string()));
                DialogScope::Page
            }
        };
        Ok(scope)
    }

    /// First visible overlay with a title and checkboxes whose title
    /// contains the start of the card's title.
    async fn find_dialog(&self, card_title: &str) -> driver::Result<Option<P::Element>> {
        let prefix = title_prefix(card_title.trim(), self.config.title_prefix_len);
        if prefix.is_empty() {
            return Ok(None);
        }

        let overlays = self.page.query(Scope::Page, &Target::Overlay).await?;
        tracing::debug!("Found {} overlay elements", overlays.len());

        for overlay in overlays {
            if !self.page.is_visible(&overlay).await? {
                continue;
            }
            let titles = self
                .page
                .query(Scope::Within(&overlay), &Target::DialogTitle)
                .await?;
            let Some(title) = titles.first() else {
                continue;
            };
            let checkboxes = self
                .page
                .query(Scope::Within(&overlay), &Target::Checkbox)
                .await?;
            if checkboxes.is_empty() {
                continue;
            }

            let title_text = self.page.text(title).await?;
            if title_text.contains(prefix) {
                tracing::info!(
                    "Found subtask edit dialog with {} checkboxes",
                    checkboxes.len()
                );
                return Ok(Some(overlay));
            }
        }

        Ok(None)
    }
}
