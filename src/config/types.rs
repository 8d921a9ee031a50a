use serde::Deserialize;

/// Default portal page template; `{id}` is replaced with the record id
pub const DEFAULT_URL_TEMPLATE: &str = "https://solutions.oracle.com/scwar/scr/Partner/{id}.html";

/// Default number of concurrent workers
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Default spreadsheet file name
pub const DEFAULT_RESULTS_PATH: &str = "results.xlsx";

/// Default worksheet name
pub const DEFAULT_SHEET_NAME: &str = "oracle_asia_partners";

/// Input file used when none is given on the command line
pub const DEFAULT_INPUT_PATH: &str = "test_data.json";

/// Main configuration structure for Partner-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of concurrent workers draining the queue
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Page URL template containing an `{id}` placeholder
    #[serde(default = "default_url_template")]
    pub url_template: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the spreadsheet written at the end of the run
    #[serde(default = "default_results_path")]
    pub results_path: String,

    /// Name of the single worksheet
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

impl CrawlerConfig {
    /// Renders the page URL for a record id
    pub fn page_url(&self, id: &str) -> String {
        self.url_template.replace("{id}", id)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            url_template: default_url_template(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
            sheet_name: default_sheet_name(),
        }
    }
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_results_path() -> String {
    DEFAULT_RESULTS_PATH.to_string()
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}
