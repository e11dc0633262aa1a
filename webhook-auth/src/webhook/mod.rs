//! Webhook signature validation.

mod config;
mod hmac;
mod signature;
mod verifier;

pub use config::{VerificationConfig, CUSTOM_PROVIDER_ID};
pub use self::hmac::{Encoding, HashAlgorithm};
pub use signature::{HeaderValue, Headers, SignatureSource};
pub use verifier::{VerificationResult, WebhookVerifier};

use crate::error::Error;
use crate::formatters::WebhookPayload;

/// Trait for validating webhook signatures.
pub trait WebhookValidator: Send + Sync {
    /// Validate a webhook request.
    ///
    /// # Arguments
    ///
    /// * `headers` - HTTP headers from the webhook request
    /// * `payload` - Parsed request body
    ///
    /// # Returns
    ///
    /// `true` if signature is valid, `false` otherwise. Missing headers and
    /// hashing failures are errors.
    fn validate(&self, headers: &Headers, payload: &WebhookPayload) -> Result<bool, Error>;

    /// Get the provider identifier for this validator.
    fn provider_id(&self) -> &str;
}
