//! Error types for the `webhook-auth` crate.
//!
//! Follows the same pattern as the other workspace crates: a root Error struct
//! holding an error kind tree and an optional source for error chaining.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for webhook-auth crate.
/// Holds error kind and optional source for error chaining.
///
/// When the source is a plain message it is the text surfaced to callers in
/// `VerificationResult::error`, so `Display` prints it verbatim.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in webhook-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// Fatal, raised while building a verifier.
    Configuration(ConfigurationErrorKind),
    /// The signature could not be taken from the caller's argument.
    Extraction(ExtractionErrorKind),
    /// Canonicalization or hashing failed.
    Computation(ComputationErrorKind),
    /// Well-formed signatures that differ.
    Mismatch,
}

/// Errors from building a verifier or resolving a provider preset.
#[derive(Debug, PartialEq)]
pub enum ConfigurationErrorKind {
    MissingSecretKey,
    MissingSignatureHeader,
    UnknownProvider,
}

/// Errors from extracting a signature out of a raw value or header collection.
#[derive(Debug, PartialEq)]
pub enum ExtractionErrorKind {
    MissingHeader,
    MissingSignature,
    InvalidArgument,
}

/// Errors from canonicalizing a payload or computing its digest.
#[derive(Debug, PartialEq)]
pub enum ComputationErrorKind {
    UnsupportedAlgorithm,
    InvalidKey,
    Serialization,
    Formatter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(source) = &self.source {
            return write!(f, "{source}");
        }

        match &self.error_kind {
            ErrorKind::Configuration(kind) => write!(f, "Configuration error: {:?}", kind),
            ErrorKind::Extraction(kind) => write!(f, "Extraction error: {:?}", kind),
            ErrorKind::Computation(kind) => write!(f, "Computation error: {:?}", kind),
            ErrorKind::Mismatch => write!(f, "Invalid signature"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Computation(ComputationErrorKind::Serialization),
        }
    }
}

/// Helper function to create configuration errors.
pub fn configuration_error(kind: ConfigurationErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Configuration(kind),
    }
}

/// Helper function to create signature extraction errors.
pub fn extraction_error(kind: ExtractionErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Extraction(kind),
    }
}

/// Helper function to create computation errors.
pub fn computation_error(kind: ComputationErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Computation(kind),
    }
}

/// Helper function to create the signature mismatch error.
pub fn mismatch_error() -> Error {
    Error {
        source: Some("Invalid signature".to_string().into()),
        error_kind: ErrorKind::Mismatch,
    }
}
