use argh::FromArgs;
use kanban_e2e::config::{self, Config};
use kanban_e2e::suite::{self, Case, CaseOutcome};
use kanban_e2e::{FixtureBoard, Page, ScenarioResult, WebDriverPage};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(FromArgs, Debug)]
/// kanban-e2e: drive a kanban board through its edit-card scenario.
struct Args {
    /// application root to test
    #[argh(option, default = "String::from(config::DEFAULT_BASE_URL)")]
    base_url: String,

    /// webdriver endpoint (defaults to $WEBDRIVER_URL, then http://localhost:4444)
    #[argh(option)]
    webdriver: Option<String>,

    /// run against a simulated board described by this JSON file
    #[argh(option)]
    fixture: Option<PathBuf>,

    /// case to run: edit-card or delete-card (runs the whole suite if omitted)
    #[argh(option)]
    case: Option<Case>,

    /// dropdown option to click when the first column is not offered (repeatable)
    #[argh(option)]
    fallback_option: Vec<String>,

    /// skip settle delays
    #[argh(switch)]
    fast: bool,

    /// print run results as JSON
    #[argh(switch)]
    json: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = if self.fast {
            Config::instant()
        } else {
            Config::default()
        };
        config.base_url = self.base_url.clone();
        if let Some(url) = &self.webdriver {
            config.webdriver_url = url.clone();
        }
        config.with_fallback_options(self.fallback_option.clone())
    }
}

type CaseResults = Vec<(Case, ScenarioResult<CaseOutcome>)>;

async fn run<P: Page>(page: &P, config: &Config, case: Option<Case>) -> CaseResults {
    match case {
        Some(case) => vec![(case, suite::run_case(page, config, case).await)],
        None => suite::run_suite(page, config).await,
    }
}

fn case_json(case: Case, result: &ScenarioResult<CaseOutcome>) -> serde_json::Value {
    match result {
        Ok(CaseOutcome::Passed(report)) => serde_json::json!({
            "case": case.to_string(),
            "status": "passed",
            "report": report,
        }),
        Ok(CaseOutcome::Skipped) => serde_json::json!({
            "case": case.to_string(),
            "status": "skipped",
        }),
        Err(e) => serde_json::json!({
            "case": case.to_string(),
            "status": "failed",
            "error": e.to_string(),
        }),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kanban_e2e=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Args = argh::from_env();
    let config = args.config();

    let results = match &args.fixture {
        Some(path) => match FixtureBoard::load(path) {
            Ok(board) => run(&board, &config, args.case).await,
            Err(e) => {
                tracing::error!("Failed to load fixture {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => match WebDriverPage::connect(&config.webdriver_url).await {
            Ok(page) => {
                let results = run(&page, &config, args.case).await;
                if let Err(e) = page.close().await {
                    tracing::warn!("Failed to close browser session: {}", e);
                }
                results
            }
            Err(e) => {
                tracing::error!("Failed to connect to {}: {}", config.webdriver_url, e);
                return ExitCode::FAILURE;
            }
        },
    };

    let mut failed = false;
    for (case, result) in &results {
        match result {
            Ok(CaseOutcome::Passed(_)) => tracing::info!("{}: PASSED", case.name()),
            Ok(CaseOutcome::Skipped) => tracing::info!("{}: SKIPPED", case.name()),
            Err(e) => {
                failed = true;
                tracing::error!("{}: FAILED: {}", case.name(), e);
            }
        }
    }

    if args.json {
        let json: Vec<_> = results.iter().map(|(c, r)| case_json(*c, r)).collect();
        match serde_json::to_string_pretty(&json) {
            Ok(out) => println!("{}", out),
            Err(e) => tracing::error!("Failed to serialize results: {}", e),
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
