//! Pre-defined provider configurations.

mod config;

pub use config::{
    invoiless_config, invoiless_legacy_config, provider_config, provider_names, tap_config,
    tap_legacy_config, ProviderConfigTemplate, WebhookProvider,
};
