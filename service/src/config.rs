use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;

/// Provider preset used when `PROVIDER` is not set.
pub const DEFAULT_PROVIDER: &str = "tap";

/// `--payload-file` value that reads the payload from standard input.
pub const STDIN_PATH: &str = "-";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Name of the webhook provider preset to verify against (e.g. tap, invoiless).
    #[arg(short, long, env, default_value = DEFAULT_PROVIDER)]
    pub provider: String,

    /// The shared secret the provider signs webhooks with.
    #[arg(long, env, hide_env_values = true)]
    webhook_secret_key: Option<String>,

    /// Path to the JSON webhook body. Use `-` to read it from standard input.
    #[arg(long, env, default_value = STDIN_PATH)]
    payload_file: String,

    /// The signature received with the webhook.
    #[arg(short, long, env, conflicts_with = "headers_file")]
    signature: Option<String>,

    /// Path to a JSON object of the request headers carrying the signature.
    #[arg(long, env)]
    headers_file: Option<String>,

    /// Report received and generated signatures along with the canonical payload.
    #[arg(long, env, default_value_t = false)]
    pub debug: bool,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn set_webhook_secret_key(mut self, webhook_secret_key: String) -> Self {
        self.webhook_secret_key = Some(webhook_secret_key);
        self
    }

    pub fn webhook_secret_key(&self) -> Option<String> {
        self.webhook_secret_key.clone()
    }

    /// Returns the payload path, or `None` when the payload comes from stdin.
    pub fn payload_file(&self) -> Option<&str> {
        Some(self.payload_file.as_str()).filter(|path| *path != STDIN_PATH)
    }

    pub fn signature(&self) -> Option<String> {
        self.signature.clone()
    }

    pub fn headers_file(&self) -> Option<&str> {
        self.headers_file.as_deref()
    }

    /// Log level actually applied: diagnostics are logged at debug level, so
    /// `--debug` raises the threshold to at least `Debug`.
    pub fn effective_log_level_filter(&self) -> LevelFilter {
        if self.debug {
            self.log_level_filter.max(LevelFilter::Debug)
        } else {
            self.log_level_filter
        }
    }
}
