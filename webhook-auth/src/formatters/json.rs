//! JSON passthrough formatters.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Serializer;

use super::coerce::number_string;
use super::{PayloadFormatter, WebhookPayload};
use crate::error::{computation_error, ComputationErrorKind, Error};

/// Compact JSON writer that prints floats the way JavaScript does, so `10.0`
/// serializes as `10` and `1e21` as `1e+21`.
struct JavaScriptNumbers;

impl Formatter for JavaScriptNumbers {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(number_string(value).as_bytes())
    }
}

/// Serializes a payload to compact JSON in insertion order.
pub fn to_canonical_json(payload: &WebhookPayload) -> Result<String, Error> {
    let mut buffer: Vec<u8> = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut buffer, JavaScriptNumbers);
    payload.serialize(&mut serializer)?;

    String::from_utf8(buffer).map_err(|_| {
        computation_error(
            ComputationErrorKind::Serialization,
            "Serialized payload is not valid UTF-8",
        )
    })
}

/// Default formatter: the payload's JSON serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl PayloadFormatter for JsonFormatter {
    fn format(&self, payload: &WebhookPayload) -> Result<String, Error> {
        to_canonical_json(payload)
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Invoiless signs the JSON body as sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoilessFormatter;

impl PayloadFormatter for InvoilessFormatter {
    fn format(&self, payload: &WebhookPayload) -> Result<String, Error> {
        to_canonical_json(payload)
    }

    fn name(&self) -> &str {
        "invoiless"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn payload(value: Value) -> WebhookPayload {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_json_formatter_matches_serde_json() {
        let body = payload(json!({
            "id": "test-id",
            "amount": 100,
            "currency": "USD",
            "metadata": { "key": "value" }
        }));

        assert_eq!(
            JsonFormatter.format(&body).unwrap(),
            serde_json::to_string(&body).unwrap()
        );
        assert_eq!(
            JsonFormatter.format(&body).unwrap(),
            r#"{"id":"test-id","amount":100,"currency":"USD","metadata":{"key":"value"}}"#
        );
    }

    #[test]
    fn test_json_formatter_keeps_insertion_order() {
        let body = payload(json!({"zeta": 1, "alpha": 2, "mid": {"b": 1, "a": 2}}));
        assert_eq!(
            JsonFormatter.format(&body).unwrap(),
            r#"{"zeta":1,"alpha":2,"mid":{"b":1,"a":2}}"#
        );
    }

    #[test]
    fn test_json_formatter_empty_payload() {
        assert_eq!(JsonFormatter.format(&WebhookPayload::new()).unwrap(), "{}");
    }

    #[test]
    fn test_json_formatter_writes_floats_like_javascript() {
        let body = payload(json!({"amount": 10.0, "rate": 0.5, "big": 1e21, "tiny": 1e-7}));
        assert_eq!(
            JsonFormatter.format(&body).unwrap(),
            r#"{"amount":10,"rate":0.5,"big":1e+21,"tiny":1e-7}"#
        );
    }

    #[test]
    fn test_json_formatter_escapes_strings() {
        let body = payload(json!({"note": "line\n\"quoted\" / ü"}));
        assert_eq!(
            JsonFormatter.format(&body).unwrap(),
            r#"{"note":"line\n\"quoted\" / ü"}"#
        );
    }

    #[test]
    fn test_invoiless_formatter_is_json_passthrough() {
        let body = payload(json!({"data": {"nested": {"value": "test"}}}));
        assert_eq!(
            InvoilessFormatter.format(&body).unwrap(),
            JsonFormatter.format(&body).unwrap()
        );
        assert_eq!(InvoilessFormatter.name(), "invoiless");
        assert_eq!(JsonFormatter.name(), "json");
    }
}
