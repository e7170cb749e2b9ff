//! [`Page`] over a WebDriver session.
//!
//! Targets map to CSS or XPath queries against the board's markup. Text
//! filters that WebDriver cannot express are applied after the query.

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use crate::driver::{DriverError, Page, Result, Scope};
use crate::locator::{StatusStrategy, Target};

const IDLE_POLL: Duration = Duration::from_millis(500);

// WebDriver key code for Escape.
const ESCAPE: &str = "\u{e00c}";

const IDLE_PROBE: &str = "return { ready: document.readyState, \
     resources: performance.getEntriesByType('resource').length };";

const TEXT_CONTENT: &str = "return arguments[0].textContent;";

const FORCE_CHECK: &str = "const el = arguments[0]; \
     el.checked = true; \
     el.dispatchEvent(new Event('change', { bubbles: true }));";

// Leaf elements that may render a dropdown entry.
const OPTION_LEAVES: &str = "//*[self::div or self::span or self::li or self::option \
     or @role='option'][not(*)]";

const OPTION_CANDIDATES: &str = "div[class*='text-'], span[class*='text-'], li, option";

const CARDS_UNDER_HEADING: &str = "../..//article";

const STATUS_DISABLED_INPUT: &str = "input[disabled][class*='cursor-pointer']";

const STATUS_LABEL_SIBLING: &str = ".//div[contains(normalize-space(.), 'Current Status') \
     and not(.//div[contains(normalize-space(.), 'Current Status')])]\
     /following-sibling::div[1]";

const STATUS_CLICKABLE_WRAPPER: &str =
    ".//div[contains(@class, 'cursor-pointer')][.//input[@disabled]]";

const STATUS_NEAR_LABEL: &str = ".//*[contains(text(), 'Current Status')]/..//*[(self::div and \
     contains(@class, 'cursor-pointer')) or (self::input and @disabled)]";

const CLOSE_CANDIDATES: &str = "button, [role='button']";

static CLOSE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)close|×|✕").expect("close label pattern"));

/// The WebDriver query behind a [`Target`]. Some targets are narrowed
/// further by text after the query runs.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Css(String),
    XPath(&'static str),
}

impl Selector {
    fn css(selector: &str) -> Self {
        Selector::Css(selector.to_string())
    }

    fn locator(&self) -> Locator<'_> {
        match self {
            Selector::Css(css) => Locator::Css(css),
            Selector::XPath(xpath) => Locator::XPath(xpath),
        }
    }
}

fn status_selector(strategy: StatusStrategy) -> Selector {
    match strategy {
        StatusStrategy::DisabledInput => Selector::css(STATUS_DISABLED_INPUT),
        StatusStrategy::LabelSibling => Selector::XPath(STATUS_LABEL_SIBLING),
        StatusStrategy::ClickableWrapper => Selector::XPath(STATUS_CLICKABLE_WRAPPER),
        StatusStrategy::NearLabel => Selector::XPath(STATUS_NEAR_LABEL),
    }
}

/// `scoped` is true when the query runs below an element rather than the
/// whole document.
fn selector_for(target: &Target, scoped: bool) -> Selector {
    match target {
        Target::Heading => Selector::css("h2"),
        Target::Card if scoped => Selector::XPath(CARDS_UNDER_HEADING),
        Target::Card => Selector::css("article"),
        Target::CardTitle => Selector::css("h3"),
        Target::CardSummary => Selector::css("p"),
        Target::Overlay => Selector::css(".absolute"),
        Target::DialogTitle => Selector::css("h4"),
        Target::Checkbox => Selector::css("input[type='checkbox']"),
        Target::UncheckedCheckbox => Selector::css("input[type='checkbox']:not(:checked)"),
        Target::LabelFor(id) => Selector::Css(format!("label[for=\"{}\"]", css_string(id))),
        Target::StatusControl(strategy) => status_selector(*strategy),
        Target::StatusOption(_) => Selector::XPath(OPTION_LEAVES),
        Target::OptionCandidate => Selector::css(OPTION_CANDIDATES),
        Target::CloseControl => Selector::css(CLOSE_CANDIDATES),
    }
}

pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    pub async fn connect(webdriver_url: &str) -> Result<Self> {
        let client = ClientBuilder::native().connect(webdriver_url).await?;
        tracing::info!("Connected to WebDriver at {}", webdriver_url);
        Ok(Self { client })
    }

    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }

    async fn find_all(&self, scope: Scope<'_, Element>, locator: Locator<'_>) -> Result<Vec<Element>> {
        let found = match scope {
            Scope::Page => self.client.find_all(locator).await?,
            Scope::Within(element) => element.find_all(locator).await?,
        };
        Ok(found)
    }

    async fn close_controls(&self, candidates: Vec<Element>) -> Result<Vec<Element>> {
        let mut found = Vec::new();
        for candidate in candidates {
            if CLOSE_TEXT.is_match(&self.text(&candidate).await?) {
                found.push(candidate);
                continue;
            }
            for attr in ["aria-label", "title"] {
                let labelled = candidate
                    .attr(attr)
                    .await?
                    .is_some_and(|v| v.to_lowercase().contains("close"));
                if labelled {
                    found.push(candidate);
                    break;
                }
            }
        }
        Ok(found)
    }

    async fn text_matching(
        &self,
        candidates: Vec<Element>,
        matches: impl Fn(&str) -> bool,
    ) -> Result<Vec<Element>> {
        let mut found = Vec::new();
        for candidate in candidates {
            if candidate.is_displayed().await? && matches(&self.text(&candidate).await?) {
                found.push(candidate);
            }
        }
        Ok(found)
    }
}

fn element_arg(element: &Element) -> Result<Vec<Value>> {
    Ok(vec![serde_json::to_value(element)?])
}

fn css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[async_trait]
impl Page for WebDriverPage {
    type Element = Element;

    async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn wait_for_idle(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut last_resources = None;
        loop {
            let probe = self.client.execute(IDLE_PROBE, Vec::new()).await?;
            let ready = probe["ready"].as_str() == Some("complete");
            let resources = probe["resources"].as_u64();
            if ready && resources.is_some() && resources == last_resources {
                return Ok(());
            }
            last_resources = resources;

            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(timeout, "network idle".into()));
            }
            tokio::time::sleep(IDLE_POLL).await;
        }
    }

    async fn query(&self, scope: Scope<'_, Element>, target: &Target) -> Result<Vec<Element>> {
        let selector = selector_for(target, matches!(scope, Scope::Within(_)));
        let found = self.find_all(scope, selector.locator()).await?;
        match target {
            Target::StatusOption(strategy) => {
                self.text_matching(found, |text| strategy.matches(text)).await
            }
            Target::CloseControl => self.close_controls(found).await,
            _ => Ok(found),
        }
    }

    async fn text(&self, element: &Element) -> Result<String> {
        let value = self.client.execute(TEXT_CONTENT, element_arg(element)?).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        Ok(element.attr(name).await?)
    }

    async fn is_visible(&self, element: &Element) -> Result<bool> {
        Ok(element.is_displayed().await?)
    }

    async fn click(&self, element: &Element) -> Result<()> {
        element.click().await?;
        Ok(())
    }

    async fn force_check(&self, element: &Element) -> Result<()> {
        self.client.execute(FORCE_CHECK, element_arg(element)?).await?;
        Ok(())
    }

    async fn computed_style(&self, element: &Element, property: &str) -> Result<String> {
        Ok(element.css_value(property).await?)
    }

    async fn press_escape(&self) -> Result<()> {
        self.client.active_element().await?.send_keys(ESCAPE).await?;
        Ok(())
    }
}
