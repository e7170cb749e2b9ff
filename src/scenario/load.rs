use std::time::{Duration, Instant};

use super::{ScenarioRunner, settle};
use crate::board::{self, Column};
use crate::driver::{self, Page};
use crate::error::{ScenarioError, ScenarioResult};
use crate::report::{Phase, StepOutcome};

const COLUMN_POLL: Duration = Duration::from_millis(250);

impl<P: Page> ScenarioRunner<'_, P> {
    /// Navigates to the app and waits for column headings. A board without
    /// columns is not something the rest of the run can work with.
    pub async fn load_board(&mut self) -> ScenarioResult<Vec<Column<P::Element>>> {
        self.page.goto(&self.config.base_url).await?;
        tracing::info!("Navigated to Kanban application at {}", self.config.base_url);

        self.page.wait_for_idle(self.config.idle_timeout).await?;
        settle(self.config.settle.after_load).await;

        let columns = self.wait_for_columns().await?;
        if columns.is_empty() {
            self.record(
                Phase::LoadBoard,
                StepOutcome::SoftFailed("no column headings".into()),
            );
            return Err(ScenarioError::NoColumns);
        }

        tracing::info!("Found {} kanban columns with task counts", columns.len());
        self.record(Phase::LoadBoard, StepOutcome::Passed);
        Ok(columns)
    }

    async fn wait_for_columns(&self) -> driver::Result<Vec<Column<P::Element>>> {
        let deadline = Instant::now() + self.config.column_timeout;
        loop {
            let columns = board::columns(self.page).await?;
            let now = Instant::now();
            if !columns.is_empty() || now >= deadline {
                return Ok(columns);
            }
            tokio::time::sleep(COLUMN_POLL.min(deadline - now)).await;
        }
    }
}
