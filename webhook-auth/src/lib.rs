//! # webhook-auth
//!
//! Verification of inbound webhook signatures for third-party payment and
//! notification providers:
//! - Payload canonicalization ("formatters") matching each provider's signing input
//! - Currency-aware amount formatting shared with the transaction formatter
//! - Pre-configured provider presets (header, prefix, algorithm, encoding, formatter)
//! - HMAC signature verification with opt-in diagnostics
//!
//! ## Architecture
//!
//! A caller picks a preset from [`providers`], completes it with its own secret
//! and builds a [`webhook::WebhookVerifier`]. Each `verify` call extracts the
//! signature, canonicalizes the payload, recomputes the HMAC and returns a
//! [`webhook::VerificationResult`]. Verification never panics on bad input;
//! every failure after construction is reported inside the result.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use webhook_auth::{providers::tap_config, webhook::WebhookVerifier};
//!
//! let verifier = WebhookVerifier::new(tap_config().with_secret(secret))?;
//! let result = verifier.verify(&payload, &headers);
//! ```

pub mod diagnostics;
pub mod error;
pub mod formatters;
pub mod providers;
pub mod webhook;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use formatters::{PayloadFormatter, WebhookPayload};
pub use webhook::{SignatureSource, VerificationConfig, VerificationResult, WebhookVerifier};
