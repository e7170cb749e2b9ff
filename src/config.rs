use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Fixed pauses that give the app time to react after each interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleDelays {
    pub after_load: Duration,
    pub after_open: Duration,
    pub after_check: Duration,
    pub after_dropdown: Duration,
    pub after_close: Duration,
    pub after_extra_escape: Duration,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            after_load: Duration::from_secs(3),
            after_open: Duration::from_secs(3),
            after_check: Duration::from_secs(1),
            after_dropdown: Duration::from_secs(1),
            after_close: Duration::from_secs(2),
            after_extra_escape: Duration::from_secs(1),
        }
    }
}

impl SettleDelays {
    pub fn none() -> Self {
        Self {
            after_load: Duration::ZERO,
            after_open: Duration::ZERO,
            after_check: Duration::ZERO,
            after_dropdown: Duration::ZERO,
            after_close: Duration::ZERO,
            after_extra_escape: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Application root the scenario navigates to.
    pub base_url: String,
    pub webdriver_url: String,
    pub idle_timeout: Duration,
    /// How long to wait for the first column heading.
    pub column_timeout: Duration,
    pub settle: SettleDelays,
    /// Characters of the card title that must appear in the dialog title.
    pub title_prefix_len: usize,
    /// Option texts clicked when the first column's name is not offered.
    pub fallback_options: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let webdriver_url =
            std::env::var("WEBDRIVER_URL").unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string());

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            webdriver_url,
            idle_timeout: Duration::from_secs(30),
            column_timeout: Duration::from_secs(10),
            settle: SettleDelays::default(),
            title_prefix_len: 10,
            fallback_options: Vec::new(),
        }
    }
}

impl Config {
    /// Config with no settle delays and a single column read, for simulated
    /// boards.
    pub fn instant() -> Self {
        Self {
            idle_timeout: Duration::from_secs(1),
            column_timeout: Duration::ZERO,
            settle: SettleDelays::none(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_fallback_options(mut self, options: Vec<String>) -> Self {
        self.fallback_options = options;
        self
    }
}
