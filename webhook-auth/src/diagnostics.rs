//! Opt-in verification diagnostics.
//!
//! Events carry received and generated signatures plus the canonical payload,
//! so a verifier only records them when its `debug` flag is set.

use std::sync::Arc;

use log::{log, Level};

/// Both sides of a signature comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureComparison<'a> {
    pub header: &'a str,
    pub received_signature: &'a str,
    pub generated_signature: &'a str,
    pub formatted_payload: &'a str,
}

/// Something worth reporting about a single `verify` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationEvent<'a> {
    Matched(SignatureComparison<'a>),
    Mismatched(SignatureComparison<'a>),
    /// Canonicalization or hashing failed.
    Failed { header: &'a str, error: &'a str },
}

impl VerificationEvent<'_> {
    /// Level `LogSink` reports the event at.
    pub fn level(&self) -> Level {
        match self {
            VerificationEvent::Matched(_) => Level::Debug,
            VerificationEvent::Mismatched(_) | VerificationEvent::Failed { .. } => Level::Warn,
        }
    }
}

/// Receiver for verification diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &VerificationEvent<'_>);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn record(&self, event: &VerificationEvent<'_>) {
        (**self).record(event);
    }
}

/// Discards every event. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _event: &VerificationEvent<'_>) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, event: &VerificationEvent<'_>) {
        let level = event.level();
        match event {
            VerificationEvent::Matched(comparison) => log!(
                level,
                "Webhook signature verified: header={}, received={}, generated={}, payload={}",
                comparison.header,
                comparison.received_signature,
                comparison.generated_signature,
                comparison.formatted_payload
            ),
            VerificationEvent::Mismatched(comparison) => log!(
                level,
                "Webhook signature mismatch: header={}, received={}, generated={}, payload={}",
                comparison.header,
                comparison.received_signature,
                comparison.generated_signature,
                comparison.formatted_payload
            ),
            VerificationEvent::Failed { header, error } => log!(
                level,
                "Webhook verification error: header={}, error={}",
                header,
                error
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn comparison() -> SignatureComparison<'static> {
        SignatureComparison {
            header: "hashstring",
            received_signature: "abc",
            generated_signature: "def",
            formatted_payload: "x_id1",
        }
    }

    #[derive(Default)]
    struct CountingSink {
        levels: Mutex<Vec<Level>>,
    }

    impl DiagnosticSink for CountingSink {
        fn record(&self, event: &VerificationEvent<'_>) {
            self.levels.lock().unwrap().push(event.level());
        }
    }

    #[test]
    fn test_event_levels() {
        assert_eq!(VerificationEvent::Matched(comparison()).level(), Level::Debug);
        assert_eq!(VerificationEvent::Mismatched(comparison()).level(), Level::Warn);
        assert_eq!(
            VerificationEvent::Failed {
                header: "hashstring",
                error: "Invalid digest: md4",
            }
            .level(),
            Level::Warn
        );
    }

    #[test]
    fn test_shared_sink_forwards_to_inner() {
        let sink = Arc::new(CountingSink::default());
        let shared: Arc<dyn DiagnosticSink> = sink.clone();

        shared.record(&VerificationEvent::Matched(comparison()));
        Arc::clone(&sink).record(&VerificationEvent::Mismatched(comparison()));

        assert_eq!(*sink.levels.lock().unwrap(), vec![Level::Debug, Level::Warn]);
    }
}
