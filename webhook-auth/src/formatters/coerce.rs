//! Value coercions matching the sender's JavaScript signing code.
//!
//! Providers build their signing strings with template literals, `||`
//! fallbacks and `Number(..).toFixed(..)`. Reproducing those conversions
//! byte-for-byte is what makes the canonical strings hash identically.

use serde_json::Value;

/// Every finite `f64` has a terminating decimal expansion with at most this
/// many fraction digits, so formatting at this precision is exact.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Magnitude from which `toFixed` and number-to-string switch to exponent form.
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Smallest magnitude still rendered without an exponent.
const SMALL_DECIMAL_THRESHOLD: f64 = 1e-6;

/// Renders a value the way a template literal interpolates it.
///
/// A missing value renders `undefined`, like an absent property would.
pub fn template_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number_string(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => template_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// `value || ''` interpolated into a template literal.
pub fn or_empty(value: Option<&Value>) -> String {
    if is_truthy(value) {
        template_string(value)
    } else {
        String::new()
    }
}

/// JavaScript truthiness of an optional JSON value.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Numeric conversion performed by `Number(value)`.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_number(s),
        Some(array @ Value::Array(_)) => parse_number(&template_string(Some(array))),
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Characters `Number()` strips: Unicode white space and line terminators,
/// plus the byte order mark, but not NEL.
fn is_js_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }

    let (negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if unsigned == "Infinity" {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // Radix literals are only accepted unsigned.
    let radix = match unsigned.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        if unsigned.len() != trimmed.len() {
            return f64::NAN;
        }
        return u64::from_str_radix(&unsigned[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    // Rust also accepts "inf" and "nan" spellings which JavaScript rejects.
    if unsigned
        .bytes()
        .any(|b| !(b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')))
    {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// `Number.prototype.toString()` for a double.
pub fn number_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (SMALL_DECIMAL_THRESHOLD..EXPONENT_THRESHOLD).contains(&magnitude) {
        return format!("{value}");
    }

    let exponential = format!("{value:e}");
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponential,
    }
}

/// `Number.prototype.toFixed(digits)`.
///
/// Rounds the exact binary value half away from zero, so `1.005` becomes
/// `"1.00"` while `0.125` becomes `"0.13"`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() || value.abs() >= EXPONENT_THRESHOLD {
        return number_string(value);
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (integer, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = integer.bytes().chain(fraction.bytes().take(digits)).collect();
    if fraction.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        increment_digits(&mut kept);
    }

    let split = kept.len() - digits;
    let mut rendered = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        rendered.push('-');
    }
    rendered.extend(kept[..split].iter().map(|b| char::from(*b)));
    if digits > 0 {
        rendered.push('.');
        rendered.extend(kept[split..].iter().map(|b| char::from(*b)));
    }
    rendered
}

fn increment_digits(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
