//! HMAC webhook signature verification.

use secrecy::ExposeSecret;
use serde::Serialize;
use subtle::ConstantTimeEq;

use super::config::VerificationConfig;
use super::hmac::HashAlgorithm;
use super::signature::{Headers, SignatureSource};
use super::WebhookValidator;
use crate::diagnostics::{SignatureComparison, VerificationEvent};
use crate::error::{
    configuration_error, extraction_error, mismatch_error, ConfigurationErrorKind, Error,
    ExtractionErrorKind,
};
use crate::formatters::{JsonFormatter, PayloadFormatter, WebhookPayload};

/// Outcome of a single `verify` call.
///
/// `error` is set exactly when `is_valid` is false and `data` exactly when it
/// is true. Error text is advisory and not meant for parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<WebhookPayload>,
}

impl VerificationResult {
    pub fn valid(payload: &WebhookPayload) -> Self {
        Self {
            is_valid: true,
            error: None,
            data: Some(payload.clone()),
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            data: None,
        }
    }
}

/// Verifies webhook signatures against one immutable configuration.
///
/// Holds no per-call state, so a single instance can be shared across
/// threads (e.g. behind an `Arc`).
#[derive(Debug)]
pub struct WebhookVerifier {
    config: VerificationConfig,
}

impl WebhookVerifier {
    /// Create a verifier.
    ///
    /// Fails when the secret key or the signature header name is empty.
    pub fn new(config: VerificationConfig) -> Result<Self, Error> {
        if config.secret_key.expose_secret().is_empty() {
            return Err(configuration_error(
                ConfigurationErrorKind::MissingSecretKey,
                "Secret key is required",
            ));
        }
        if config.signature_header.is_empty() {
            return Err(configuration_error(
                ConfigurationErrorKind::MissingSignatureHeader,
                "Signature header name is required",
            ));
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Verify a payload against a signature or the headers carrying one.
    ///
    /// Never fails: extraction, computation and mismatch errors are all
    /// reported through the returned result.
    pub fn verify(
        &self,
        payload: &WebhookPayload,
        signature_or_headers: impl Into<SignatureSource>,
    ) -> VerificationResult {
        let source = signature_or_headers.into();
        let outcome = self
            .extract_signature(&source)
            .and_then(|received| self.check_signature(payload, received));

        match outcome {
            Ok(true) => VerificationResult::valid(payload),
            Ok(false) => VerificationResult::invalid(mismatch_error().to_string()),
            Err(err) => VerificationResult::invalid(err.to_string()),
        }
    }

    /// Compute the signature a sender would attach to this payload.
    pub fn sign(&self, payload: &WebhookPayload) -> Result<String, Error> {
        let formatted_payload = self.format_payload(payload)?;
        self.generate_signature(&formatted_payload)
    }

    fn extract_signature<'a>(&self, source: &'a SignatureSource) -> Result<&'a str, Error> {
        let signature = match source {
            SignatureSource::Signature(signature) => signature.as_str(),
            SignatureSource::Headers(headers) => self.signature_from_headers(headers)?,
            SignatureSource::Unsupported(_) => {
                return Err(extraction_error(
                    ExtractionErrorKind::InvalidArgument,
                    "Invalid signature or headers argument",
                ))
            }
        };

        require_signature(signature)
    }

    fn signature_from_headers<'a>(&self, headers: &'a Headers) -> Result<&'a str, Error> {
        headers
            .get(&self.config.signature_header)
            .map(|value| value.first().unwrap_or_default())
            .ok_or_else(|| {
                extraction_error(
                    ExtractionErrorKind::MissingHeader,
                    &format!("Missing signature header: {}", self.config.signature_header),
                )
            })
    }

    fn format_payload(&self, payload: &WebhookPayload) -> Result<String, Error> {
        match &self.config.payload_formatter {
            Some(formatter) => formatter.format(payload),
            None => JsonFormatter.format(payload),
        }
    }

    fn generate_signature(&self, formatted_payload: &str) -> Result<String, Error> {
        let algorithm: HashAlgorithm = self.config.hash_algorithm.parse()?;
        let digest = algorithm.digest(
            self.config.secret_key.expose_secret().as_bytes(),
            formatted_payload.as_bytes(),
        )?;
        let encoded = self.config.encoding.encode(&digest);

        Ok(match &self.config.signature_prefix {
            Some(prefix) => format!("{prefix}{encoded}"),
            None => encoded,
        })
    }

    /// Recompute and compare. `Ok(false)` is a mismatch; `Err` is a failure
    /// to canonicalize or hash.
    fn check_signature(&self, payload: &WebhookPayload, received: &str) -> Result<bool, Error> {
        let header = self.config.signature_header.as_str();
        let computed = self.format_payload(payload).and_then(|formatted_payload| {
            let generated_signature = self.generate_signature(&formatted_payload)?;
            Ok((formatted_payload, generated_signature))
        });

        let (formatted_payload, generated_signature) = match computed {
            Ok(computed) => computed,
            Err(err) => {
                self.record(&VerificationEvent::Failed {
                    header,
                    error: &err.to_string(),
                });
                return Err(err);
            }
        };

        let matched = signatures_match(received, &generated_signature);
        let comparison = SignatureComparison {
            header,
            received_signature: received,
            generated_signature: &generated_signature,
            formatted_payload: &formatted_payload,
        };
        self.record(&if matched {
            VerificationEvent::Matched(comparison)
        } else {
            VerificationEvent::Mismatched(comparison)
        });

        Ok(matched)
    }

    fn record(&self, event: &VerificationEvent<'_>) {
        if self.config.debug {
            self.config.diagnostics.record(event);
        }
    }
}

/// Rejects an empty candidate signature.
fn require_signature(signature: &str) -> Result<&str, Error> {
    if signature.is_empty() {
        return Err(extraction_error(
            ExtractionErrorKind::MissingSignature,
            "Missing signature",
        ));
    }

    Ok(signature)
}

/// Exact string equality, evaluated without early exit.
fn signatures_match(received: &str, generated: &str) -> bool {
    received.as_bytes().ct_eq(generated.as_bytes()).into()
}

impl WebhookValidator for WebhookVerifier {
    fn validate(&self, headers: &Headers, payload: &WebhookPayload) -> Result<bool, Error> {
        let received = require_signature(self.signature_from_headers(headers)?)?;
        self.check_signature(payload, received)
    }

    fn provider_id(&self) -> &str {
        &self.config.provider_id
    }
}
