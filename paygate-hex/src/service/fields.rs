//! Normalized payment representations with field filtering.

use serde_json::Value;

use paygate_types::{Payment, PaymentData};

/// Fields present in every payment representation.
pub const DEFAULT_RESP_FIELDS: [&str; 4] = ["purpose", "amount", "orderId", "status"];

/// Fields added only when the caller names them.
pub const ALLOWED_OPTIONAL_RESP_FIELDS: [&str; 2] = ["notification", "createdAt"];

/// Normalizes a payment: the default field set unconditionally, plus every
/// allow-listed optional field the `fields` string mentions.
///
/// Membership is substring containment on the raw `fields` string, so the
/// caller may join names with commas or anything else; unrecognized names
/// are silently ignored. The storage id is never exposed.
pub fn normalize_payment(payment: &Payment, fields: &str) -> PaymentData {
    let include = |name: &str| {
        DEFAULT_RESP_FIELDS.contains(&name)
            || (ALLOWED_OPTIONAL_RESP_FIELDS.contains(&name) && fields.contains(name))
    };

    let mut data = PaymentData::new();
    if include("purpose") {
        data.insert("purpose".into(), Value::String(payment.purpose.clone()));
    }
    if include("amount") {
        data.insert("amount".into(), Value::String(payment.amount.to_string()));
    }
    if include("orderId") {
        data.insert(
            "orderId".into(),
            Value::String(payment.order_id.as_str().to_string()),
        );
    }
    if include("status") {
        data.insert(
            "status".into(),
            match payment.status {
                Some(status) => Value::String(status.as_str().to_string()),
                None => Value::Null,
            },
        );
    }
    if include("notification") {
        data.insert(
            "notification".into(),
            payment
                .notification
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
    }
    if include("createdAt") {
        data.insert(
            "createdAt".into(),
            Value::String(payment.created_at.to_rfc3339()),
        );
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use paygate_types::{OrderId, PaymentId};

    fn payment() -> Payment {
        Payment::from_parts(
            PaymentId::from_i64(1),
            "Office chair".to_string(),
            "149.99".parse().unwrap(),
            Some("https://shop.example.com/cb".to_string()),
            Utc::now(),
            None,
            OrderId::from("order-1"),
        )
    }

    #[test]
    fn test_default_fields_only() {
        let data = normalize_payment(&payment(), "");
        let mut keys: Vec<&str> = data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["amount", "orderId", "purpose", "status"]);
        assert_eq!(data["amount"], "149.99");
        assert!(data["status"].is_null());
    }

    #[test]
    fn test_requested_optional_field_is_added() {
        let data = normalize_payment(&payment(), "notification");
        assert!(data.contains_key("notification"));
        assert!(!data.contains_key("createdAt"));
        // Default fields are always present.
        assert!(data.contains_key("purpose"));
    }

    #[test]
    fn test_both_optional_fields() {
        let data = normalize_payment(&payment(), "notification,createdAt");
        assert!(data.contains_key("notification"));
        assert!(data.contains_key("createdAt"));
    }

    #[test]
    fn test_unrecognized_fields_are_ignored() {
        let data = normalize_payment(&payment(), "id,secret,balance");
        let mut keys: Vec<&str> = data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["amount", "orderId", "purpose", "status"]);
    }

    #[test]
    fn test_id_is_never_exposed() {
        let data = normalize_payment(&payment(), "id");
        assert!(!data.contains_key("id"));
    }
}
