pub mod board;
pub mod config;
pub mod driver;
pub mod error;
pub mod fixture;
pub mod locator;
pub mod report;
pub mod scenario;
pub mod suite;
pub mod webdriver;

pub use config::Config;
pub use driver::{DriverError, Page, Scope};
pub use error::{ScenarioError, ScenarioResult};
pub use fixture::{BoardSpec, CardSpec, FixtureBoard, Layout};
pub use report::{ScenarioReport, Scorecard, StepOutcome};
pub use scenario::ScenarioRunner;
pub use suite::{Case, CaseOutcome};
pub use webdriver::WebDriverPage;
