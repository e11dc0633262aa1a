//! Transaction-style formatter used by Tap payment webhooks.
//!
//! Tap hashes a concatenation of `x_<field><value>` tokens rather than the
//! JSON body. Tokens are joined without delimiters in a fixed order: id,
//! amount, currency, then the invoice or transaction block.

use serde_json::Value;

use super::amount::format_amount;
use super::coerce::{is_truthy, or_empty, template_string, to_number};
use super::{PayloadFormatter, WebhookPayload};
use crate::error::Error;

/// Object types carrying the transaction block.
const TRANSACTION_OBJECTS: [&str; 3] = ["charge", "authorize", "refund"];

/// Which revision of the transaction block rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFormatVersion {
    /// Each transaction token is gated on its own field being truthy.
    #[default]
    Current,
    /// The whole block is emitted only when both `transaction` and
    /// `reference` keys exist, and `x_status` is always written.
    Legacy,
}

/// Formatter producing Tap's `hashstring` signing input.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFormatter {
    version: TransactionFormatVersion,
}

impl TransactionFormatter {
    pub const fn new() -> Self {
        Self {
            version: TransactionFormatVersion::Current,
        }
    }

    pub const fn legacy() -> Self {
        Self {
            version: TransactionFormatVersion::Legacy,
        }
    }

    pub fn version(&self) -> TransactionFormatVersion {
        self.version
    }

    /// Builds the signing string. Never fails: absent fields render as
    /// `undefined` or an empty string exactly like the provider's signer.
    pub fn canonical_string(&self, payload: &WebhookPayload) -> String {
        let currency = template_string(payload.get("currency"));
        let mut fields = vec![
            format!("x_id{}", template_string(payload.get("id"))),
            format!(
                "x_amount{}",
                format_amount(to_number(payload.get("amount")), &currency)
            ),
            format!("x_currency{}", currency),
        ];

        let object = payload.get("object").and_then(Value::as_str);

        if object == Some("invoice") {
            fields.push(format!("x_updated{}", or_empty(payload.get("updated"))));
            fields.push(format!("x_status{}", template_string(payload.get("status"))));
            fields.push(format!("x_created{}", template_string(payload.get("created"))));
        }

        if object.is_some_and(|object| TRANSACTION_OBJECTS.contains(&object)) {
            match self.version {
                TransactionFormatVersion::Current => push_transaction_fields(payload, &mut fields),
                TransactionFormatVersion::Legacy => {
                    push_legacy_transaction_fields(payload, &mut fields)
                }
            }
        }

        fields.concat()
    }
}

fn nested<'a>(payload: &'a WebhookPayload, field: &str, key: &str) -> Option<&'a Value> {
    payload.get(field).and_then(|value| value.get(key))
}

fn push_reference_fields(payload: &WebhookPayload, fields: &mut Vec<String>) {
    fields.push(format!(
        "x_gateway_reference{}",
        or_empty(nested(payload, "reference", "gateway"))
    ));
    fields.push(format!(
        "x_payment_reference{}",
        or_empty(nested(payload, "reference", "payment"))
    ));
}

fn push_transaction_fields(payload: &WebhookPayload, fields: &mut Vec<String>) {
    if is_truthy(payload.get("reference")) {
        push_reference_fields(payload, fields);
    }

    let status = payload.get("status");
    if is_truthy(status) {
        fields.push(format!("x_status{}", template_string(status)));
    }

    if is_truthy(payload.get("transaction")) {
        fields.push(format!(
            "x_created{}",
            or_empty(nested(payload, "transaction", "created"))
        ));
    }
}

fn push_legacy_transaction_fields(payload: &WebhookPayload, fields: &mut Vec<String>) {
    if !(payload.contains_key("transaction") && payload.contains_key("reference")) {
        return;
    }

    push_reference_fields(payload, fields);
    fields.push(format!("x_status{}", template_string(payload.get("status"))));
    fields.push(format!(
        "x_created{}",
        or_empty(nested(payload, "transaction", "created"))
    ));
}

impl PayloadFormatter for TransactionFormatter {
    fn format(&self, payload: &WebhookPayload) -> Result<String, Error> {
        Ok(self.canonical_string(payload))
    }

    fn name(&self) -> &str {
        match self.version {
            TransactionFormatVersion::Current => "tap",
            TransactionFormatVersion::Legacy => "tap-legacy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> WebhookPayload {
        value.as_object().cloned().unwrap_or_default()
    }

    fn charge(object: &str, status: &str) -> WebhookPayload {
        payload(json!({
            "id": "test-transaction",
            "object": object,
            "amount": 100,
            "currency": "USD",
            "status": status,
            "transaction": { "created": "20220101" },
            "reference": { "gateway": "test-gateway", "payment": "test-payment" }
        }))
    }

    #[test]
    fn test_charge_scenario_exact_output() {
        let body = payload(json!({
            "id": "chg_1",
            "object": "charge",
            "amount": 10,
            "currency": "BHD",
            "status": "CAPTURED",
            "transaction": { "created": "171" },
            "reference": { "gateway": "g1", "payment": "p1" }
        }));

        assert_eq!(
            TransactionFormatter::new().canonical_string(&body),
            "x_idchg_1x_amount10.000x_currencyBHDx_gateway_referenceg1\
             x_payment_referencep1x_statusCAPTUREDx_created171"
        );
    }

    #[test]
    fn test_charge_authorize_refund_include_transaction_block() {
        for (object, status) in [
            ("charge", "CAPTURED"),
            ("authorize", "AUTHORIZED"),
            ("refund", "REFUNDED"),
        ] {
            let formatted = TransactionFormatter::new().canonical_string(&charge(object, status));
            assert_eq!(
                formatted,
                format!(
                    "x_idtest-transactionx_amount100.00x_currencyUSD\
                     x_gateway_referencetest-gatewayx_payment_referencetest-payment\
                     x_status{status}x_created20220101"
                )
            );
        }
    }

    #[test]
    fn test_invoice_payload() {
        let body = payload(json!({
            "id": "test-invoice",
            "object": "invoice",
            "amount": 100,
            "currency": "USD",
            "status": "PAID",
            "updated": "20220102",
            "created": "20220101"
        }));

        assert_eq!(
            TransactionFormatter::new().canonical_string(&body),
            "x_idtest-invoicex_amount100.00x_currencyUSDx_updated20220102x_statusPAIDx_created20220101"
        );
    }

    #[test]
    fn test_invoice_without_updated_keeps_token_prefix() {
        let body = payload(json!({
            "id": "inv_1",
            "object": "invoice",
            "amount": 5,
            "currency": "KWD",
            "status": "PAID",
            "created": "1700"
        }));

        assert_eq!(
            TransactionFormatter::new().canonical_string(&body),
            "x_idinv_1x_amount5.000x_currencyKWDx_updatedx_statusPAIDx_created1700"
        );
    }

    #[test]
    fn test_unknown_object_emits_only_base_fields() {
        let body = payload(json!({"id": "test-id", "amount": 100, "currency": "XYZ"}));
        assert_eq!(
            TransactionFormatter::new().canonical_string(&body),
            "x_idtest-idx_amount100.00x_currencyXYZ"
        );
    }

    #[test]
    fn test_string_amount_with_byte_order_mark() {
        let body = payload(json!({"amount": "\u{feff}12", "currency": "USD"}));
        assert_eq!(
            TransactionFormatter::new().canonical_string(&body),
            "x_idundefinedx_amount12.00x_currencyUSD"
        );
    }

    #[test]
    fn test_missing_base_fields_render_like_the_signer() {
        let body = payload(json!({"object": "charge"}));
        assert_eq!(
            TransactionFormatter::new().canonical_string(&body),
            "x_idundefinedx_amountNaNx_currencyundefined"
        );
    }

    #[test]
    fn test_transaction_without_reference() {
        let mut body = charge("charge", "CAPTURED");
        body.remove("reference");
        let formatted = TransactionFormatter::new().canonical_string(&body);

        assert!(!formatted.contains("x_gateway_reference"));
        assert!(!formatted.contains("x_payment_reference"));
        assert!(formatted.ends_with("x_statusCAPTUREDx_created20220101"));
    }

    #[test]
    fn test_transaction_without_reference_or_status() {
        let mut body = charge("charge", "CAPTURED");
        body.remove("reference");
        body.remove("status");

        assert_eq!(
            TransactionFormatter::new().canonical_string(&body),
            "x_idtest-transactionx_amount100.00x_currencyUSDx_created20220101"
        );
    }

    #[test]
    fn test_null_reference_values_render_empty() {
        let mut body = charge("charge", "CAPTURED");
        body.insert("reference".to_string(), json!({"gateway": null, "payment": null}));

        let formatted = TransactionFormatter::new().canonical_string(&body);
        assert!(formatted.contains("x_gateway_referencex_payment_referencex_status"));
    }

    #[test]
    fn test_missing_transaction_created_renders_empty() {
        let mut body = charge("charge", "CAPTURED");
        body.insert("transaction".to_string(), json!({}));

        let formatted = TransactionFormatter::new().canonical_string(&body);
        assert!(formatted.ends_with("x_statusCAPTUREDx_created"));
    }

    #[test]
    fn test_falsy_transaction_is_skipped() {
        let mut body = charge("refund", "REFUNDED");
        body.insert("transaction".to_string(), Value::Null);

        let formatted = TransactionFormatter::new().canonical_string(&body);
        assert!(!formatted.contains("x_created"));
    }

    #[test]
    fn test_legacy_requires_transaction_and_reference_keys() {
        let mut body = charge("charge", "CAPTURED");
        body.remove("reference");

        assert_eq!(
            TransactionFormatter::legacy().canonical_string(&body),
            "x_idtest-transactionx_amount100.00x_currencyUSD"
        );
    }

    #[test]
    fn test_legacy_always_writes_status() {
        let mut body = charge("charge", "CAPTURED");
        body.remove("status");

        assert_eq!(
            TransactionFormatter::legacy().canonical_string(&body),
            "x_idtest-transactionx_amount100.00x_currencyUSD\
             x_gateway_referencetest-gatewayx_payment_referencetest-payment\
             x_statusundefinedx_created20220101"
        );
    }

    #[test]
    fn test_versions_agree_on_complete_payloads() {
        let body = charge("authorize", "AUTHORIZED");
        assert_eq!(
            TransactionFormatter::new().canonical_string(&body),
            TransactionFormatter::legacy().canonical_string(&body)
        );
    }

    #[test]
    fn test_names_and_versions() {
        assert_eq!(TransactionFormatter::new().name(), "tap");
        assert_eq!(TransactionFormatter::legacy().name(), "tap-legacy");
        assert_eq!(
            TransactionFormatter::default().version(),
            TransactionFormatVersion::Current
        );
    }
}
