use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::driver::{Page, Result, Scope};
use crate::locator::Target;

static COLUMN_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*(\d+)\s*\)").expect("column count pattern"));

static COUNT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\s*\d+\s*\)\s*").expect("count suffix pattern"));

// Accepts "subtask(s)" and the "substask(s)" spelling some boards render.
static SUBTASK_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s+of\s+(\d+)\s+subs?tasks?").expect("subtask summary pattern")
});

/// A column heading such as `Doing (3)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeading {
    pub name: String,
    /// Informational only. `None` when the number does not fit a `u64`.
    pub count: Option<u64>,
}

/// Parses a heading into name and task count. Headings without a `(n)`
/// count are not columns.
pub fn parse_column_heading(text: &str) -> Option<ColumnHeading> {
    let caps = COLUMN_COUNT.captures(text)?;
    Some(ColumnHeading {
        name: column_name(text),
        count: caps[1].parse().ok(),
    })
}

/// Strips the first `(n)` count from a heading.
pub fn column_name(heading: &str) -> String {
    COUNT_SUFFIX.replacen(heading, 1, "").trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubtaskSummary {
    pub completed: u64,
    pub total: u64,
}

impl SubtaskSummary {
    pub fn is_incomplete(&self) -> bool {
        self.completed < self.total
    }

    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.completed)
    }
}

impl fmt::Display for SubtaskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} subtasks", self.completed, self.total)
    }
}

pub fn parse_subtask_summary(text: &str) -> Option<SubtaskSummary> {
    let caps = SUBTASK_SUMMARY.captures(text)?;
    Some(SubtaskSummary {
        completed: caps[1].parse().ok()?,
        total: caps[2].parse().ok()?,
    })
}

/// First `len` characters of a title, used to recognise the card again in
/// the edit dialog.
pub fn title_prefix(title: &str, len: usize) -> &str {
    match title.char_indices().nth(len) {
        Some((idx, _)) => &title[..idx],
        None => title,
    }
}

#[derive(Debug, Clone)]
pub struct Column<E> {
    pub index: usize,
    pub heading: E,
    pub label: String,
    pub name: String,
}

/// Column headings in rendered order.
pub async fn columns<P: Page>(page: &P) -> Result<Vec<Column<P::Element>>> {
    let headings = page.query(Scope::Page, &Target::Heading).await?;
    let mut columns = Vec::new();
    for heading in headings {
        let label = page.text(&heading).await?;
        if let Some(parsed) = parse_column_heading(&label) {
            columns.push(Column {
                index: columns.len(),
                heading,
                label,
                name: parsed.name,
            });
        }
    }
    Ok(columns)
}

pub async fn cards<P: Page>(
    page: &P,
    column: &Column<P::Element>,
) -> Result<Vec<P::Element>> {
    page.query(Scope::Within(&column.heading), &Target::Card).await
}

/// Text of the first match of `target` under `element`, or empty.
async fn first_text<P: Page>(page: &P, element: &P::Element, target: Target) -> Result<String> {
    match page.query(Scope::Within(element), &target).await?.first() {
        Some(found) => page.text(found).await,
        None => Ok(String::new()),
    }
}

pub async fn card_summary<P: Page>(page: &P, card: &P::Element) -> Result<String> {
    first_text(page, card, Target::CardSummary).await
}

pub async fn card_title<P: Page>(page: &P, card: &P::Element) -> Result<String> {
    first_text(page, card, Target::CardTitle).await
}
