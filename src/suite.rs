use std::fmt;
use std::str::FromStr;

use crate::config::Config;
use crate::driver::Page;
use crate::error::ScenarioResult;
use crate::report::ScenarioReport;
use crate::scenario::{self, ScenarioRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    EditCard,
    /// Placeholder for card deletion. Disabled, no steps yet.
    DeleteCard,
}

impl Case {
    pub const ALL: [Case; 2] = [Case::EditCard, Case::DeleteCard];

    pub fn name(&self) -> &'static str {
        match self {
            Case::EditCard => scenario::NAME,
            Case::DeleteCard => "Delete Kanban Card",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            Case::EditCard => true,
            Case::DeleteCard => false,
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Case::EditCard => write!(f, "edit-card"),
            Case::DeleteCard => write!(f, "delete-card"),
        }
    }
}

impl FromStr for Case {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit-card" => Ok(Case::EditCard),
            "delete-card" => Ok(Case::DeleteCard),
            other => Err(format!(
                "unknown case '{}', expected edit-card or delete-card",
                other
            )),
        }
    }
}

#[derive(Debug)]
pub enum CaseOutcome {
    Passed(Box<ScenarioReport>),
    Skipped,
}

pub async fn run_case<P: Page>(page: &P, config: &Config, case: Case) -> ScenarioResult<CaseOutcome> {
    if !case.is_enabled() {
        tracing::info!("Skipping disabled case: {}", case.name());
        return Ok(CaseOutcome::Skipped);
    }

    tracing::info!("Running case: {}", case.name());
    match case {
        Case::EditCard => {
            let report = ScenarioRunner::new(page, config).run().await?;
            Ok(CaseOutcome::Passed(Box::new(report)))
        }
        Case::DeleteCard => Ok(CaseOutcome::Skipped),
    }
}

/// Runs every case in order against the same page.
pub async fn run_suite<P: Page>(
    page: &P,
    config: &Config,
) -> Vec<(Case, ScenarioResult<CaseOutcome>)> {
    let mut results = Vec::with_capacity(Case::ALL.len());
    for case in Case::ALL {
        let result = run_case(page, config, case).await;
        results.push((case, result));
    }
    results
}
