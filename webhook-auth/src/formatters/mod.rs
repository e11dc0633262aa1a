//! Payload canonicalization.
//!
//! A formatter turns a webhook payload into the exact string the provider
//! hashed when it signed the request. Formatters are pure: the same payload
//! always yields the same string, and missing optional fields never fail.

pub mod amount;
pub mod coerce;
mod json;
mod transaction;

pub use amount::{currency_decimals, format_amount};
pub use json::{to_canonical_json, InvoilessFormatter, JsonFormatter};
pub use transaction::{TransactionFormatVersion, TransactionFormatter};

use serde_json::{Map, Value};

use crate::error::Error;

/// An inbound webhook body: string keys to arbitrary JSON values, in the
/// order the sender wrote them.
pub type WebhookPayload = Map<String, Value>;

/// Trait for canonicalizing a payload before it is hashed.
///
/// Any `Fn(&WebhookPayload) -> String` closure is a formatter, which covers
/// one-off provider rules:
///
/// ```rust,ignore
/// let config = VerificationConfig::new(secret, "x-signature")
///     .with_payload_formatter(|payload: &WebhookPayload| {
///         format!("custom:{}", to_canonical_json(payload).unwrap_or_default())
///     });
/// ```
pub trait PayloadFormatter: Send + Sync {
    /// Produce the canonical signing string for a payload.
    fn format(&self, payload: &WebhookPayload) -> Result<String, Error>;

    /// Identifier of this canonicalization scheme.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> PayloadFormatter for F
where
    F: Fn(&WebhookPayload) -> String + Send + Sync,
{
    fn format(&self, payload: &WebhookPayload) -> Result<String, Error> {
        Ok(self(payload))
    }
}
