//! Verifier configuration.

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;

use super::hmac::{Encoding, HashAlgorithm};
use crate::diagnostics::{DiagnosticSink, NoopSink};
use crate::formatters::PayloadFormatter;

/// Provider id used for configurations not built from a preset.
pub const CUSTOM_PROVIDER_ID: &str = "custom";

/// Everything a verifier needs: the caller's secret plus the provider's
/// signature contract.
///
/// # Examples
///
/// ```rust,ignore
/// let config = VerificationConfig::new(secret, "x-signature")
///     .with_signature_prefix("sha256=")
///     .with_encoding(Encoding::Base64);
/// ```
pub struct VerificationConfig {
    /// Identifier reported by `WebhookValidator::provider_id`.
    pub provider_id: String,
    /// Shared signing secret. Must not be empty.
    pub secret_key: SecretString,
    /// Header carrying the signature. Must not be empty.
    pub signature_header: String,
    /// Prepended to the encoded digest, e.g. `sha256=`.
    pub signature_prefix: Option<String>,
    /// Keyed-hash name, resolved when a payload is verified.
    pub hash_algorithm: String,
    pub encoding: Encoding,
    /// Canonicalization; JSON serialization when `None`.
    pub payload_formatter: Option<Arc<dyn PayloadFormatter>>,
    /// Enables reporting to `diagnostics`.
    pub debug: bool,
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

impl VerificationConfig {
    /// Create a configuration with the default algorithm (sha256) and
    /// encoding (hex), no prefix and the JSON formatter.
    pub fn new(secret_key: impl Into<String>, signature_header: impl Into<String>) -> Self {
        Self {
            provider_id: CUSTOM_PROVIDER_ID.to_string(),
            secret_key: SecretString::from(secret_key.into()),
            signature_header: signature_header.into(),
            signature_prefix: None,
            hash_algorithm: HashAlgorithm::Sha256.as_str().to_string(),
            encoding: Encoding::default(),
            payload_formatter: None,
            debug: false,
            diagnostics: Arc::new(NoopSink),
        }
    }

    pub fn with_provider_id(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = provider_id.into();
        self
    }

    /// An empty prefix is the same as no prefix.
    pub fn with_signature_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.signature_prefix = Some(prefix.into()).filter(|p| !p.is_empty());
        self
    }

    pub fn with_hash_algorithm(mut self, hash_algorithm: impl Into<String>) -> Self {
        self.hash_algorithm = hash_algorithm.into();
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_payload_formatter(mut self, formatter: impl PayloadFormatter + 'static) -> Self {
        self.payload_formatter = Some(Arc::new(formatter));
        self
    }

    /// Share a formatter already held elsewhere, such as by a preset.
    pub fn with_shared_formatter(mut self, formatter: Arc<dyn PayloadFormatter>) -> Self {
        self.payload_formatter = Some(formatter);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Arc::new(sink);
        self
    }
}

impl fmt::Debug for VerificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationConfig")
            .field("provider_id", &self.provider_id)
            .field("secret_key", &self.secret_key)
            .field("signature_header", &self.signature_header)
            .field("signature_prefix", &self.signature_prefix)
            .field("hash_algorithm", &self.hash_algorithm)
            .field("encoding", &self.encoding)
            .field(
                "payload_formatter",
                &self.payload_formatter.as_ref().map(|formatter| formatter.name()),
            )
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
