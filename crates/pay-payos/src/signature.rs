//! # Field Signing
//!
//! PayOS authenticates requests and webhooks with an HMAC-SHA256 digest over a
//! canonical string: field names sorted ascending, rendered as `key=value`,
//! joined with `&`. Values are rendered as-is, without URL-encoding.

use hmac::{Hmac, Mac};
use serde_json::{Map, Number, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Name of the field carrying the digest
pub const SIGNATURE_FIELD: &str = "signature";

/// What to do with null-valued fields when canonicalizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullFields {
    /// Drop them (outbound signing)
    Skip,
    /// Render them as `null` (webhook verification)
    Include,
}

/// Build the canonical signing string for a set of fields
pub fn canonical_string(fields: &Map<String, Value>, nulls: NullFields) -> String {
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort();

    keys.into_iter()
        .filter_map(|key| {
            let value = &fields[key.as_str()];
            if value.is_null() && nulls == NullFields::Skip {
                return None;
            }
            Some(format!("{}={}", key, render_value(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Render a single value the way it appears in the canonical string
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => s.clone(),
        // nested values are not part of any documented PayOS field set
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        // 1.0 renders as "1", like any integral amount
        Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Lowercase hex HMAC-SHA256 of `message` keyed with `secret`
pub fn hmac_sha256_hex(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Sign an outbound field set. Null-valued fields are left out.
pub fn sign_data(fields: &Map<String, Value>, checksum_key: &str) -> String {
    hmac_sha256_hex(checksum_key, &canonical_string(fields, NullFields::Skip))
}

/// Compare two hex digests without leaking the mismatch position
pub fn signatures_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
