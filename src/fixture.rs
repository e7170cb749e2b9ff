//! An in-memory kanban board that behaves like the rendered app: cards open
//! an edit dialog, checkboxes update the card summary, the status dropdown
//! moves cards and Escape dismisses things.
//!
//! Used by `--fixture` dry runs and by the test suite. Layout quirks let a
//! board reproduce markup the scenario has to work around.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::board::SubtaskSummary;
use crate::driver::{DriverError, Page, Result, Scope};
use crate::locator::{StatusStrategy, Target};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSpec {
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default)]
    pub cards: Vec<CardSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSpec {
    pub title: String,
    #[serde(default)]
    pub subtasks: Vec<SubtaskSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtaskSpec {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

/// How the simulated app renders and reacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Render the edit dialog as an overlay. When false the dialog content
    /// is only reachable from the page scope.
    pub dialog_overlay: bool,
    /// Visible overlays (tooltips, menus) rendered before the dialog.
    pub decoy_overlays: usize,
    /// Which status-control strategies find the control.
    pub status_control: Vec<StatusStrategy>,
    pub close_button: bool,
    pub escape_closes: bool,
    pub strikethrough: bool,
    /// Whether checking a box updates the card.
    pub persist_checks: bool,
    /// Render summaries as "n of m substasks".
    pub misspell_summary: bool,
    /// Dialog shows subtasks as plain text, without checkboxes.
    pub read_only: bool,
    /// Dropdown labels per column, when they differ from the headings.
    pub status_labels: Vec<String>,
    /// Heading queries after navigation that find nothing, as when the app
    /// renders its columns after the page went idle.
    pub headings_after_reads: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            dialog_overlay: true,
            decoy_overlays: 0,
            status_control: vec![StatusStrategy::LabelSibling, StatusStrategy::NearLabel],
            close_button: true,
            escape_closes: true,
            strikethrough: true,
            persist_checks: true,
            misspell_summary: false,
            read_only: false,
            status_labels: Vec::new(),
            headings_after_reads: 0,
        }
    }
}

impl BoardSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: &str, cards: Vec<CardSpec>) -> Self {
        self.columns.push(ColumnSpec {
            name: name.to_string(),
            cards,
        });
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

impl CardSpec {
    /// A card with `total` subtasks, the first `completed` of them done.
    pub fn new(title: &str, completed: usize, total: usize) -> Self {
        Self {
            title: title.to_string(),
            subtasks: (0..total)
                .map(|i| SubtaskSpec {
                    title: format!("{} step {}", title, i + 1),
                    done: i < completed,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureElement {
    Body,
    Heading(usize),
    Card(usize),
    CardTitle(usize),
    CardSummary(usize),
    Overlay,
    Decoy(usize),
    DialogTitle,
    Checkbox { card: usize, index: usize },
    Label { card: usize, index: usize },
    StatusControl,
    StatusOption(usize),
    CloseButton,
}

/// Everything the scenario did to the board, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Goto(String),
    Query(Target),
    Click(FixtureElement),
    ForceCheck(FixtureElement),
    Escape,
}

#[derive(Debug)]
struct Card {
    id: usize,
    title: String,
    subtasks: Vec<SubtaskSpec>,
}

impl Card {
    fn summary(&self) -> SubtaskSummary {
        SubtaskSummary {
            completed: self.subtasks.iter().filter(|s| s.done).count() as u64,
            total: self.subtasks.len() as u64,
        }
    }
}

#[derive(Debug)]
struct Column {
    name: String,
    cards: Vec<Card>,
}

#[derive(Debug, Default)]
struct BoardState {
    columns: Vec<Column>,
    loaded: bool,
    heading_reads: usize,
    dialog: Option<usize>,
    dropdown_open: bool,
    interactions: Vec<Interaction>,
}

impl BoardState {
    fn card(&self, id: usize) -> Result<&Card> {
        self.columns
            .iter()
            .flat_map(|c| &c.cards)
            .find(|c| c.id == id)
            .ok_or_else(|| DriverError::Detached(format!("card {}", id)))
    }

    fn card_mut(&mut self, id: usize) -> Result<&mut Card> {
        self.columns
            .iter_mut()
            .flat_map(|c| &mut c.cards)
            .find(|c| c.id == id)
            .ok_or_else(|| DriverError::Detached(format!("card {}", id)))
    }

    fn dialog_card(&self) -> Result<&Card> {
        match self.dialog {
            Some(id) => self.card(id),
            None => Err(DriverError::Detached("edit dialog is closed".into())),
        }
    }

    fn move_card(&mut self, id: usize, to: usize) -> Result<()> {
        let from = self
            .columns
            .iter()
            .position(|c| c.cards.iter().any(|card| card.id == id))
            .ok_or_else(|| DriverError::Detached(format!("card {}", id)))?;
        if from == to || to >= self.columns.len() {
            return Ok(());
        }
        let pos = self.columns[from]
            .cards
            .iter()
            .position(|card| card.id == id)
            .ok_or_else(|| DriverError::Detached(format!("card {}", id)))?;
        let card = self.columns[from].cards.remove(pos);
        self.columns[to].cards.push(card);
        Ok(())
    }
}

pub fn checkbox_id(card: usize, index: usize) -> String {
    format!("subtask-{}-{}", card, index)
}

pub struct FixtureBoard {
    layout: Layout,
    state: Mutex<BoardState>,
}

impl FixtureBoard {
    pub fn new(spec: BoardSpec) -> Self {
        let mut next_id = 0;
        let columns = spec
            .columns
            .into_iter()
            .map(|column| Column {
                name: column.name,
                cards: column
                    .cards
                    .into_iter()
                    .map(|card| {
                        next_id += 1;
                        Card {
                            id: next_id,
                            title: card.title,
                            subtasks: card.subtasks,
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            layout: spec.layout,
            state: Mutex::new(BoardState {
                columns,
                ..BoardState::default()
            }),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let spec: BoardSpec = serde_json::from_str(json)?;
        Ok(Self::new(spec))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.state().interactions.clone()
    }

    pub fn dialog_open(&self) -> bool {
        self.state().dialog.is_some()
    }

    pub fn summary_of(&self, title: &str) -> Option<SubtaskSummary> {
        let state = self.state();
        state
            .columns
            .iter()
            .flat_map(|c| &c.cards)
            .find(|c| c.title == title)
            .map(Card::summary)
    }

    pub fn column_of(&self, title: &str) -> Option<usize> {
        self.state()
            .columns
            .iter()
            .position(|c| c.cards.iter().any(|card| card.title == title))
    }

    fn summary_text(&self, summary: SubtaskSummary) -> String {
        let noun = if self.layout.misspell_summary {
            "substasks"
        } else {
            "subtasks"
        };
        format!("{} of {} {}", summary.completed, summary.total, noun)
    }

    fn option_label(&self, state: &BoardState, col: usize) -> String {
        match self.layout.status_labels.get(col) {
            Some(label) => label.clone(),
            None => state
                .columns
                .get(col)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
        }
    }

    fn dialog_scoped(&self, scope: Scope<'_, FixtureElement>) -> bool {
        match scope {
            Scope::Page | Scope::Within(FixtureElement::Body) => true,
            Scope::Within(FixtureElement::Overlay) => self.layout.dialog_overlay,
            Scope::Within(_) => false,
        }
    }
}

#[async_trait]
impl Page for FixtureBoard {
    type Element = FixtureElement;

    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state();
        state.interactions.push(Interaction::Goto(url.to_string()));
        state.loaded = true;
        state.heading_reads = 0;
        state.dialog = None;
        state.dropdown_open = false;
        Ok(())
    }

    async fn wait_for_idle(&self, timeout: Duration) -> Result<()> {
        if self.state().loaded {
            Ok(())
        } else {
            Err(DriverError::Timeout(timeout, "board to load".into()))
        }
    }

    async fn query(
        &self,
        scope: Scope<'_, FixtureElement>,
        target: &Target,
    ) -> Result<Vec<FixtureElement>> {
        let mut state = self.state();
        state.interactions.push(Interaction::Query(target.clone()));
        if !state.loaded {
            return Ok(Vec::new());
        }

        let dialog_open = state.dialog.is_some();
        let in_dialog = dialog_open && self.dialog_scoped(scope);

        let found: Vec<FixtureElement> = match target {
            Target::Heading => {
                state.heading_reads += 1;
                if state.heading_reads > self.layout.headings_after_reads {
                    (0..state.columns.len()).map(FixtureElement::Heading).collect()
                } else {
                    Vec::new()
                }
            }
            Target::Card => match scope {
                Scope::Within(FixtureElement::Heading(col)) => state
                    .columns
                    .get(*col)
                    .map(|c| c.cards.iter().map(|card| FixtureElement::Card(card.id)).collect())
                    .unwrap_or_default(),
                Scope::Page => state
                    .columns
                    .iter()
                    .flat_map(|c| &c.cards)
                    .map(|card| FixtureElement::Card(card.id))
                    .collect(),
                Scope::Within(_) => Vec::new(),
            },
            Target::CardTitle | Target::CardSummary => match scope {
                Scope::Within(FixtureElement::Card(id)) => {
                    state.card(*id)?;
                    if *target == Target::CardTitle {
                        vec![FixtureElement::CardTitle(*id)]
                    } else {
                        vec![FixtureElement::CardSummary(*id)]
                    }
                }
                _ => Vec::new(),
            },
            Target::Overlay => {
                let mut overlays: Vec<FixtureElement> = (0..self.layout.decoy_overlays)
                    .map(FixtureElement::Decoy)
                    .collect();
                if dialog_open && self.layout.dialog_overlay {
                    overlays.push(FixtureElement::Overlay);
                }
                overlays
            }
            Target::DialogTitle if in_dialog => vec![FixtureElement::DialogTitle],
            Target::Checkbox | Target::UncheckedCheckbox if in_dialog && !self.layout.read_only => {
                let card = state.dialog_card()?;
                card.subtasks
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| *target == Target::Checkbox || !s.done)
                    .map(|(index, _)| FixtureElement::Checkbox {
                        card: card.id,
                        index,
                    })
                    .collect()
            }
            Target::LabelFor(id) if in_dialog => {
                let card = state.dialog_card()?;
                (0..card.subtasks.len())
                    .filter(|index| checkbox_id(card.id, *index) == *id)
                    .map(|index| FixtureElement::Label {
                        card: card.id,
                        index,
                    })
                    .collect()
            }
            Target::StatusControl(strategy)
                if in_dialog && self.layout.status_control.contains(strategy) =>
            {
                vec![FixtureElement::StatusControl]
            }
            Target::StatusOption(strategy) if state.dropdown_open => (0..state.columns.len())
                .filter(|col| strategy.matches(&self.option_label(&state, *col)))
                .map(FixtureElement::StatusOption)
                .collect(),
            Target::OptionCandidate if state.dropdown_open => (0..state.columns.len())
                .map(FixtureElement::StatusOption)
                .collect(),
            Target::CloseControl if dialog_open && self.layout.close_button => {
                vec![FixtureElement::CloseButton]
            }
            _ => Vec::new(),
        };

        Ok(found)
    }

    async fn text(&self, element: &FixtureElement) -> Result<String> {
        let state = self.state();
        let text = match element {
            FixtureElement::Heading(col) => {
                let column = state
                    .columns
                    .get(*col)
                    .ok_or_else(|| DriverError::Detached(format!("column {}", col)))?;
                format!("{} ({})", column.name, column.cards.len())
            }
            FixtureElement::Card(id) => {
                let card = state.card(*id)?;
                format!("{}\n{}", card.title, self.summary_text(card.summary()))
            }
            FixtureElement::CardTitle(id) => state.card(*id)?.title.clone(),
            FixtureElement::CardSummary(id) => self.summary_text(state.card(*id)?.summary()),
            FixtureElement::DialogTitle => state.dialog_card()?.title.clone(),
            FixtureElement::Label { card, index } => state
                .card(*card)?
                .subtasks
                .get(*index)
                .map(|s| s.title.clone())
                .unwrap_or_default(),
            FixtureElement::StatusOption(col) => self.option_label(&state, *col),
            FixtureElement::StatusControl => {
                let id = state
                    .dialog
                    .ok_or_else(|| DriverError::Detached("edit dialog is closed".into()))?;
                state
                    .columns
                    .iter()
                    .find(|c| c.cards.iter().any(|card| card.id == id))
                    .map(|c| c.name.clone())
                    .unwrap_or_default()
            }
            FixtureElement::CloseButton => "×".to_string(),
            FixtureElement::Body
            | FixtureElement::Overlay
            | FixtureElement::Decoy(_)
            | FixtureElement::Checkbox { .. } => String::new(),
        };
        Ok(text)
    }

    async fn attribute(&self, element: &FixtureElement, name: &str) -> Result<Option<String>> {
        match (element, name) {
            (FixtureElement::Checkbox { card, index }, "id") => {
                Ok(Some(checkbox_id(*card, *index)))
            }
            _ => Ok(None),
        }
    }

    async fn is_visible(&self, element: &FixtureElement) -> Result<bool> {
        let state = self.state();
        Ok(match element {
            FixtureElement::Heading(_) => state.dialog.is_none(),
            FixtureElement::Overlay
            | FixtureElement::DialogTitle
            | FixtureElement::Checkbox { .. }
            | FixtureElement::Label { .. }
            | FixtureElement::StatusControl
            | FixtureElement::CloseButton => state.dialog.is_some(),
            FixtureElement::StatusOption(_) => state.dropdown_open,
            _ => true,
        })
    }

    async fn click(&self, element: &FixtureElement) -> Result<()> {
        let mut state = self.state();
        state.interactions.push(Interaction::Click(element.clone()));
        match element {
            FixtureElement::Card(id) => {
                state.card(*id)?;
                if state.dialog.is_none() {
                    state.dialog = Some(*id);
                }
            }
            FixtureElement::StatusControl => {
                state.dialog_card()?;
                state.dropdown_open = true;
            }
            FixtureElement::StatusOption(col) => {
                if !state.dropdown_open {
                    return Err(DriverError::Detached("status dropdown is closed".into()));
                }
                if let Some(id) = state.dialog {
                    state.move_card(id, *col)?;
                }
                state.dropdown_open = false;
            }
            FixtureElement::CloseButton => {
                state.dialog = None;
                state.dropdown_open = false;
            }
            _ => {}
        }
        Ok(())
    }

    async fn force_check(&self, element: &FixtureElement) -> Result<()> {
        let mut state = self.state();
        state
            .interactions
            .push(Interaction::ForceCheck(element.clone()));
        let FixtureElement::Checkbox { card, index } = element else {
            return Err(DriverError::Script(format!("{:?} is not a checkbox", element)));
        };
        let persist = self.layout.persist_checks;
        let subtask = state
            .card_mut(*card)?
            .subtasks
            .get_mut(*index)
            .ok_or_else(|| DriverError::Detached(checkbox_id(*card, *index)))?;
        if persist {
            subtask.done = true;
        }
        Ok(())
    }

    async fn computed_style(&self, element: &FixtureElement, property: &str) -> Result<String> {
        let state = self.state();
        let struck = match element {
            FixtureElement::Label { card, index } => {
                self.layout.strikethrough
                    && state
                        .card(*card)?
                        .subtasks
                        .get(*index)
                        .is_some_and(|s| s.done)
            }
            _ => false,
        };
        Ok(match property {
            "text-decoration" | "text-decoration-line" if struck => {
                "line-through solid rgb(0, 0, 0)".to_string()
            }
            "text-decoration" | "text-decoration-line" => "none solid rgb(0, 0, 0)".to_string(),
            _ => String::new(),
        })
    }

    async fn press_escape(&self) -> Result<()> {
        let mut state = self.state();
        state.interactions.push(Interaction::Escape);
        if state.dropdown_open {
            state.dropdown_open = false;
        } else if self.layout.escape_closes {
            state.dialog = None;
        }
        Ok(())
    }
}
