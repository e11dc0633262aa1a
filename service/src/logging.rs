use crate::config::Config;
use log::LevelFilter;
use simplelog::{self, ConfigBuilder};

pub struct Logger {}

impl Logger {
    /// Initializes the global logger with configuration based on the provided Config.
    ///
    /// Log lines go to stderr so that stdout only carries the verification result.
    pub fn init_logger(config: &Config) {
        let log_level_filter = Self::level_filter(config);
        let log_config = Self::build_log_config();

        simplelog::TermLogger::init(
            log_level_filter,
            log_config,
            simplelog::TerminalMode::Stderr,
            simplelog::ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    /// Threshold for the configured level, raised by `--debug`.
    fn level_filter(config: &Config) -> simplelog::LevelFilter {
        Self::convert_level_filter(config.effective_log_level_filter())
    }

    /// Converts log::LevelFilter to simplelog::LevelFilter.
    fn convert_level_filter(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }

    /// Builds a simplelog Config with RFC 3339 timestamps.
    fn build_log_config() -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        builder.build()
    }
}
