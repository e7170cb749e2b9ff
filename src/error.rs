use thiserror::Error;

use crate::driver::DriverError;
use crate::report::Scorecard;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("No column headings with task counts found on the board")]
    NoColumns,

    #[error("No card with incomplete subtasks found in any column")]
    NoIncompleteCard,

    #[error("Subtask was not completed (score {}/{})", .0.score(), .0.total())]
    SubtaskNotCompleted(Box<Scorecard>),
}

impl ScenarioError {
    /// Fatal preconditions mean the board was not in the expected starting
    /// state, as opposed to the app misbehaving.
    pub fn is_precondition(&self) -> bool {
        matches!(self, ScenarioError::NoColumns | ScenarioError::NoIncompleteCard)
    }
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
