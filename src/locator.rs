//! Queries against the rendered board and the ordered fallback strategies
//! used where the board's markup is only partly known.

use serde::{Deserialize, Serialize};

use crate::driver::{self, Page, Scope};

/// What to look for on the board. Each driver maps a target to its own
/// query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `h2` headings; column headings are the ones carrying a `(n)` count.
    Heading,
    /// `article` cards in the section two levels above a column heading.
    Card,
    /// `h3` title inside a card.
    CardTitle,
    /// `p` subtask summary inside a card.
    CardSummary,
    /// Floating surfaces (`.absolute`).
    Overlay,
    /// `h4` title inside the edit dialog.
    DialogTitle,
    Checkbox,
    UncheckedCheckbox,
    /// `label[for=<id>]`
    LabelFor(String),
    StatusControl(StatusStrategy),
    StatusOption(OptionStrategy),
    /// Anything that looks like a dropdown entry. Diagnostics only.
    OptionCandidate,
    CloseControl,
}

/// Ways of finding the "Current Status" control, tried in [`StatusStrategy::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusStrategy {
    /// `input[disabled]` styled with `cursor-pointer`
    DisabledInput,
    /// The element following a "Current Status" label
    LabelSibling,
    /// A `cursor-pointer` wrapper holding a disabled input
    ClickableWrapper,
    /// Any clickable element under the label's parent
    NearLabel,
}

impl StatusStrategy {
    pub const ORDER: [StatusStrategy; 4] = [
        StatusStrategy::DisabledInput,
        StatusStrategy::LabelSibling,
        StatusStrategy::ClickableWrapper,
        StatusStrategy::NearLabel,
    ];

    pub fn targets() -> Vec<Target> {
        Self::ORDER.into_iter().map(Target::StatusControl).collect()
    }
}

/// Ways of picking the first column's entry once the status dropdown is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionStrategy {
    /// Trimmed text equals the column name.
    Exact(String),
    /// Text contains the column name, ignoring case.
    Partial(String),
    /// Text contains one of the configured entries, ignoring case.
    AllowList(Vec<String>),
}

impl OptionStrategy {
    /// Strategies in the order they are tried. Empty names and an empty
    /// allow-list produce no strategy, since they would match anything
    /// or nothing.
    pub fn ordered(column_name: &str, allow_list: &[String]) -> Vec<OptionStrategy> {
        let mut strategies = Vec::with_capacity(3);
        if !column_name.is_empty() {
            strategies.push(OptionStrategy::Exact(column_name.to_string()));
            strategies.push(OptionStrategy::Partial(column_name.to_string()));
        }
        if !allow_list.is_empty() {
            strategies.push(OptionStrategy::AllowList(allow_list.to_vec()));
        }
        strategies
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            OptionStrategy::Exact(name) => text.trim() == name,
            OptionStrategy::Partial(name) => contains_ignore_case(text, name),
            OptionStrategy::AllowList(entries) => entries
                .iter()
                .filter(|e| !e.is_empty())
                .any(|e| contains_ignore_case(text, e)),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Runs `targets` in order and returns the first one that matched at least
/// one element, together with its matches. Later targets are not queried.
pub async fn first_non_empty<P: Page>(
    page: &P,
    scope: Scope<'_, P::Element>,
    targets: impl IntoIterator<Item = Target>,
) -> driver::Result<Option<(Target, Vec<P::Element>)>> {
    for target in targets {
        let found = page.query(scope, &target).await?;
        tracing::debug!(?target, count = found.len(), "strategy evaluated");
        if !found.is_empty() {
            return Ok(Some((target, found)));
        }
    }
    Ok(None)
}
