use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::locator::Target;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("Could not start WebDriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("Script returned unexpected value: {0}")]
    Script(String),

    #[error("Element is no longer attached to the board: {0}")]
    Detached(String),

    #[error("Timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DriverError>;

/// Where a query is evaluated: the whole document or below one element.
#[derive(Debug)]
pub enum Scope<'a, E> {
    Page,
    Within(&'a E),
}

impl<E> Clone for Scope<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Scope<'_, E> {}

/// The rendered board as seen through a UI automation driver.
///
/// Every method is one round trip to the board; nothing is cached between
/// calls, so element handles may go stale after a mutation.
#[async_trait]
pub trait Page: Send + Sync {
    type Element: Clone + fmt::Debug + Send + Sync;

    async fn goto(&self, url: &str) -> Result<()>;

    /// Resolves once the document finished loading and network activity
    /// settled, or fails with [`DriverError::Timeout`].
    async fn wait_for_idle(&self, timeout: Duration) -> Result<()>;

    /// All elements matching `target` in document order.
    async fn query(
        &self,
        scope: Scope<'_, Self::Element>,
        target: &Target,
    ) -> Result<Vec<Self::Element>>;

    async fn text(&self, element: &Self::Element) -> Result<String>;

    async fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    async fn is_visible(&self, element: &Self::Element) -> Result<bool>;

    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// Sets a checkbox to checked without a pointer event and dispatches a
    /// bubbling `change` event so the app's own handlers run.
    async fn force_check(&self, element: &Self::Element) -> Result<()>;

    async fn computed_style(&self, element: &Self::Element, property: &str) -> Result<String>;

    async fn press_escape(&self) -> Result<()>;
}
