//! Pre-configured provider settings.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use crate::error::{configuration_error, ConfigurationErrorKind, Error};
use crate::formatters::{InvoilessFormatter, PayloadFormatter, TransactionFormatter};
use crate::webhook::{Encoding, HashAlgorithm, VerificationConfig, WebhookVerifier};

/// Known webhook providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebhookProvider {
    Invoiless,
    /// Invoiless deliveries signed before the `invoiless-signature` header.
    InvoilessLegacy,
    Tap,
    /// Tap signing rules that gate the transaction block on key presence.
    TapLegacy,
}

impl WebhookProvider {
    pub const ALL: [WebhookProvider; 4] = [
        WebhookProvider::Invoiless,
        WebhookProvider::InvoilessLegacy,
        WebhookProvider::Tap,
        WebhookProvider::TapLegacy,
    ];

    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookProvider::Invoiless => "invoiless",
            WebhookProvider::InvoilessLegacy => "invoiless-legacy",
            WebhookProvider::Tap => "tap",
            WebhookProvider::TapLegacy => "tap-legacy",
        }
    }

    /// The registered preset for this provider.
    pub fn config(&self) -> &'static ProviderConfigTemplate {
        &REGISTRY[self]
    }

    fn build_config(&self) -> ProviderConfigTemplate {
        match self {
            WebhookProvider::Invoiless => invoiless_config(),
            WebhookProvider::InvoilessLegacy => invoiless_legacy_config(),
            WebhookProvider::Tap => tap_config(),
            WebhookProvider::TapLegacy => tap_legacy_config(),
        }
    }
}

impl FromStr for WebhookProvider {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name_lower = name.to_ascii_lowercase();
        WebhookProvider::ALL
            .into_iter()
            .find(|provider| provider.as_str() == name_lower)
            .ok_or_else(|| {
                configuration_error(
                    ConfigurationErrorKind::UnknownProvider,
                    &format!("Unknown webhook provider: {name}"),
                )
            })
    }
}

impl fmt::Display for WebhookProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A provider's signature contract: everything a verifier needs except the
/// secret, which is supplied by the caller.
#[derive(Clone)]
pub struct ProviderConfigTemplate {
    /// Provider identifier.
    pub provider: WebhookProvider,
    /// Header carrying the signature.
    pub signature_header: String,
    /// Prefix the provider puts before the encoded digest.
    pub signature_prefix: Option<String>,
    pub hash_algorithm: HashAlgorithm,
    pub encoding: Encoding,
    pub payload_formatter: Arc<dyn PayloadFormatter>,
}

impl ProviderConfigTemplate {
    /// Complete the preset with the caller's secret.
    pub fn with_secret(&self, secret_key: impl Into<String>) -> VerificationConfig {
        let config = VerificationConfig::new(secret_key, self.signature_header.clone())
            .with_provider_id(self.provider.as_str())
            .with_hash_algorithm(self.hash_algorithm.as_str())
            .with_encoding(self.encoding)
            .with_shared_formatter(Arc::clone(&self.payload_formatter));

        match &self.signature_prefix {
            Some(prefix) => config.with_signature_prefix(prefix.clone()),
            None => config,
        }
    }

    /// Build a verifier for this provider.
    pub fn verifier(&self, secret_key: impl Into<String>) -> Result<WebhookVerifier, Error> {
        WebhookVerifier::new(self.with_secret(secret_key))
    }
}

impl fmt::Debug for ProviderConfigTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfigTemplate")
            .field("provider", &self.provider)
            .field("signature_header", &self.signature_header)
            .field("signature_prefix", &self.signature_prefix)
            .field("hash_algorithm", &self.hash_algorithm)
            .field("encoding", &self.encoding)
            .field("payload_formatter", &self.payload_formatter.name())
            .finish()
    }
}

static REGISTRY: LazyLock<HashMap<WebhookProvider, ProviderConfigTemplate>> =
    LazyLock::new(|| {
        WebhookProvider::ALL
            .into_iter()
            .map(|provider| (provider, provider.build_config()))
            .collect()
    });

/// Look up a preset by provider name, ignoring case.
pub fn provider_config(name: &str) -> Option<&'static ProviderConfigTemplate> {
    name.parse::<WebhookProvider>()
        .ok()
        .map(|provider| provider.config())
}

/// Names of every registered preset.
pub fn provider_names() -> Vec<&'static str> {
    WebhookProvider::ALL
        .iter()
        .map(WebhookProvider::as_str)
        .collect()
}

/// Get Invoiless configuration.
pub fn invoiless_config() -> ProviderConfigTemplate {
    ProviderConfigTemplate {
        provider: WebhookProvider::Invoiless,
        signature_header: "invoiless-signature".to_string(),
        signature_prefix: Some("sha256=".to_string()),
        hash_algorithm: HashAlgorithm::Sha256,
        encoding: Encoding::Base64,
        payload_formatter: Arc::new(InvoilessFormatter),
    }
}

/// Get legacy Invoiless configuration.
pub fn invoiless_legacy_config() -> ProviderConfigTemplate {
    ProviderConfigTemplate {
        provider: WebhookProvider::InvoilessLegacy,
        signature_header: "x-webhook-signature".to_string(),
        signature_prefix: None,
        hash_algorithm: HashAlgorithm::Sha256,
        encoding: Encoding::Hex,
        payload_formatter: Arc::new(InvoilessFormatter),
    }
}

/// Get Tap configuration.
pub fn tap_config() -> ProviderConfigTemplate {
    ProviderConfigTemplate {
        provider: WebhookProvider::Tap,
        signature_header: "hashstring".to_string(),
        signature_prefix: None,
        hash_algorithm: HashAlgorithm::Sha256,
        encoding: Encoding::Hex,
        payload_formatter: Arc::new(TransactionFormatter::new()),
    }
}

/// Get legacy Tap configuration.
pub fn tap_legacy_config() -> ProviderConfigTemplate {
    ProviderConfigTemplate {
        payload_formatter: Arc::new(TransactionFormatter::legacy()),
        provider: WebhookProvider::TapLegacy,
        ..tap_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::formatters::WebhookPayload;
    use crate::webhook::{Headers, WebhookValidator};
    use serde_json::{json, Value};

    fn payload(value: Value) -> WebhookPayload {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_invoiless_config() {
        let config = invoiless_config();
        assert_eq!(config.provider, WebhookProvider::Invoiless);
        assert_eq!(config.signature_header, "invoiless-signature");
        assert_eq!(config.signature_prefix, Some("sha256=".to_string()));
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.encoding, Encoding::Base64);
        assert_eq!(config.payload_formatter.name(), "invoiless");
    }

    #[test]
    fn test_invoiless_legacy_config() {
        let config = invoiless_legacy_config();
        assert_eq!(config.signature_header, "x-webhook-signature");
        assert_eq!(config.signature_prefix, None);
        assert_eq!(config.encoding, Encoding::Hex);
        assert_eq!(config.payload_formatter.name(), "invoiless");
    }

    #[test]
    fn test_tap_configs() {
        let config = tap_config();
        assert_eq!(config.provider, WebhookProvider::Tap);
        assert_eq!(config.signature_header, "hashstring");
        assert_eq!(config.signature_prefix, None);
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.encoding, Encoding::Hex);
        assert_eq!(config.payload_formatter.name(), "tap");

        let legacy = tap_legacy_config();
        assert_eq!(legacy.provider, WebhookProvider::TapLegacy);
        assert_eq!(legacy.signature_header, "hashstring");
        assert_eq!(legacy.payload_formatter.name(), "tap-legacy");
    }

    #[test]
    fn test_registry_lookup_ignores_case() {
        let config = provider_config("TAP").unwrap();
        assert_eq!(config.provider, WebhookProvider::Tap);
        assert!(std::ptr::eq(config, WebhookProvider::Tap.config()));

        assert_eq!(
            provider_config("Invoiless-Legacy").map(|config| config.provider),
            Some(WebhookProvider::InvoilessLegacy)
        );
        assert!(provider_config("stripe").is_none());
        assert!(provider_config("").is_none());
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(
            provider_names(),
            vec!["invoiless", "invoiless-legacy", "tap", "tap-legacy"]
        );
        for name in provider_names() {
            assert_eq!(provider_config(name).unwrap().provider.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_provider_error() {
        let err = "paypal".parse::<WebhookProvider>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown webhook provider: paypal");
        assert_eq!(
            err.error_kind,
            ErrorKind::Configuration(ConfigurationErrorKind::UnknownProvider)
        );
    }

    #[test]
    fn test_with_secret_completes_preset() {
        let config = invoiless_config().with_secret("whsec_test");

        assert_eq!(config.provider_id, "invoiless");
        assert_eq!(config.signature_header, "invoiless-signature");
        assert_eq!(config.signature_prefix.as_deref(), Some("sha256="));
        assert_eq!(config.hash_algorithm, "sha256");
        assert_eq!(config.encoding, Encoding::Base64);
        assert_eq!(
            config.payload_formatter.as_ref().map(|formatter| formatter.name()),
            Some("invoiless")
        );
        assert!(!config.debug);
    }

    #[test]
    fn test_template_debug_lists_formatter() {
        let rendered = format!("{:?}", tap_legacy_config());
        assert!(rendered.contains("TapLegacy"));
        assert!(rendered.contains("\"tap-legacy\""));
    }

    #[test]
    fn test_invoiless_signature_end_to_end() {
        let verifier = provider_config("invoiless")
            .unwrap()
            .verifier("whsec_test")
            .unwrap();
        let body = payload(json!({
            "id": "inv_1",
            "amount": 100,
            "currency": "USD",
            "metadata": { "key": "value" }
        }));
        let headers = Headers::new().with(
            "Invoiless-Signature",
            "sha256=6S1i5gUEDzRh04DbOTeoDJk5Zxbt0PYnh9mBAbN5FN8=",
        );

        let result = verifier.verify(&body, &headers);
        assert!(result.is_valid, "{:?}", result.error);
        assert_eq!(verifier.provider_id(), "invoiless");
        assert!(verifier.validate(&headers, &body).unwrap());

        let legacy = invoiless_legacy_config().verifier("whsec_test").unwrap();
        let legacy_headers = Headers::new().with(
            "x-webhook-signature",
            "e92d62e605040f3461d380db3937a80c99396716edd0f62787d98101b37914df",
        );
        assert!(legacy.verify(&body, legacy_headers).is_valid);
    }

    #[test]
    fn test_tap_signature_end_to_end() {
        let body = payload(json!({
            "id": "chg_1",
            "object": "charge",
            "amount": 10,
            "currency": "BHD",
            "status": "CAPTURED",
            "transaction": { "created": "171" },
            "reference": { "gateway": "g1", "payment": "p1" }
        }));
        let signature = "d139718faedc9dd9152a451090ac62529b1777038ccc993405a828ffdf961278";

        for provider in [WebhookProvider::Tap, WebhookProvider::TapLegacy] {
            let verifier = provider.config().verifier("tap-secret").unwrap();
            assert_eq!(verifier.sign(&body).unwrap(), signature);
            assert!(verifier
                .verify(&body, Headers::new().with("hashstring", signature))
                .is_valid);
        }
    }

    #[test]
    fn test_preset_requires_secret() {
        let err = tap_config().verifier("").unwrap_err();
        assert_eq!(err.to_string(), "Secret key is required");
    }
}
