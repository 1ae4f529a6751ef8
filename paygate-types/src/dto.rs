//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Request types validate themselves before anything touches storage and
//! report failures as a per-field error map, the same shape the original
//! registration form produced.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Amount, NewPayment, OrderId, SessionId};
use crate::error::FieldErrors;

/// Results per page when the caller does not ask for a specific count.
pub const DEFAULT_RES_ON_PAGE: u32 = 100;

/// A normalized payment representation: the default field set plus any
/// requested allow-listed optional fields.
pub type PaymentData = serde_json::Map<String, serde_json::Value>;

const MSG_NOT_BLANK: &str = "This value should not be blank.";
const MSG_BAD_DATETIME: &str = "Please enter a valid date and time.";
const MSG_POSITIVE: &str = "This value should be positive.";
const MSG_BAD_URL: &str = "This value is not a valid URL.";
const MSG_BAD_CARD: &str = "Invalid card number.";

fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.entry(field.to_string()).or_default().push(message.into());
}

fn too_short(limit: usize) -> String {
    format!(
        "This value is too short. It should have {} characters or more.",
        limit
    )
}

fn too_long(limit: usize) -> String {
    format!(
        "This value is too long. It should have {} characters or less.",
        limit
    )
}

/// Parses the datetime formats the period form accepts: RFC 3339, or a bare
/// `YYYY-MM-DDTHH:MM:SS` interpreted as UTC.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentRequest {
    /// Free-text purpose of the payment
    #[schema(example = "Office chair, order #4711")]
    pub purpose: String,
    /// Decimal amount with at most two decimal places
    #[schema(example = "149.99")]
    pub amount: String,
    /// Optional callback URL notified when the payment completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "https://shop.example.com/callback")]
    pub notification: Option<String>,
    /// External order identifier, unique across all payments
    #[schema(example = "order-4711")]
    pub order_id: String,
}

impl RegisterPaymentRequest {
    /// Validates the request and converts it into an insertable payment.
    pub fn validate(&self) -> Result<NewPayment, FieldErrors> {
        let mut errors = FieldErrors::new();

        let purpose_len = self.purpose.chars().count();
        if self.purpose.trim().is_empty() {
            push_error(&mut errors, "purpose", MSG_NOT_BLANK);
        } else if purpose_len < 5 {
            push_error(&mut errors, "purpose", too_short(5));
        } else if purpose_len > 200 {
            push_error(&mut errors, "purpose", too_long(200));
        }

        let mut amount = None;
        if self.amount.trim().is_empty() {
            push_error(&mut errors, "amount", MSG_NOT_BLANK);
        } else {
            match self.amount.parse::<Amount>() {
                Ok(parsed) => amount = Some(parsed),
                Err(e) => push_error(&mut errors, "amount", e.to_string()),
            }
        }

        // An empty notification string is treated as absent, like an empty
        // optional form field.
        let notification = self.notification.as_deref().filter(|n| !n.is_empty());
        if let Some(url) = notification {
            if url.chars().count() > 255 {
                push_error(&mut errors, "notification", too_long(255));
            }
            if !is_http_url(url) {
                push_error(&mut errors, "notification", MSG_BAD_URL);
            }
        }

        if self.order_id.is_empty() {
            push_error(&mut errors, "orderId", MSG_NOT_BLANK);
        } else if self.order_id.chars().count() > 255 {
            push_error(&mut errors, "orderId", too_long(255));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewPayment {
            purpose: self.purpose.clone(),
            amount: amount.expect("amount validated above"),
            notification: notification.map(String::from),
            order_id: OrderId::new(self.order_id.clone()),
        })
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Card submission
// ─────────────────────────────────────────────────────────────────────────────

/// Card data submitted against a payment session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardPaymentRequest {
    /// 16-digit card number (Luhn-checked)
    #[schema(example = "4242424242424242")]
    pub number: String,
    #[schema(example = "JANE A DOE")]
    pub cardholder_name: String,
    /// Expiry in MM/YY or MM/YYYY form
    #[schema(example = "12/2030")]
    pub expiry_date: String,
    /// Three-digit security code
    #[schema(example = "123")]
    pub security_number: String,
}

impl CardPaymentRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.number.is_empty() {
            push_error(&mut errors, "number", MSG_NOT_BLANK);
        } else if self.number.len() != 16
            || !self.number.bytes().all(|b| b.is_ascii_digit())
            || !luhn_valid(&self.number)
        {
            push_error(&mut errors, "number", MSG_BAD_CARD);
        }

        let name_len = self.cardholder_name.chars().count();
        if self.cardholder_name.trim().is_empty() {
            push_error(&mut errors, "cardholderName", MSG_NOT_BLANK);
        } else if name_len < 5 {
            push_error(&mut errors, "cardholderName", too_short(5));
        } else if name_len > 200 {
            push_error(&mut errors, "cardholderName", too_long(200));
        }

        let expiry_len = self.expiry_date.chars().count();
        if self.expiry_date.is_empty() {
            push_error(&mut errors, "expiryDate", MSG_NOT_BLANK);
        } else if expiry_len < 6 {
            push_error(&mut errors, "expiryDate", too_short(6));
        } else if expiry_len > 9 {
            push_error(&mut errors, "expiryDate", too_long(9));
        }

        if self.security_number.is_empty() {
            push_error(&mut errors, "securityNumber", MSG_NOT_BLANK);
        } else if self.security_number.len() != 3
            || !self.security_number.bytes().all(|b| b.is_ascii_digit())
        {
            push_error(
                &mut errors,
                "securityNumber",
                "This value should have exactly 3 characters.",
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Luhn checksum over a string of ASCII digits.
fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut double = false;
    for b in digits.bytes().rev() {
        if !b.is_ascii_digit() {
            return false;
        }
        let mut d = u32::from(b - b'0');
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }
    !digits.is_empty() && sum % 10 == 0
}

// ─────────────────────────────────────────────────────────────────────────────
// Period and listing queries
// ─────────────────────────────────────────────────────────────────────────────

/// Raw query-string parameters of the period endpoint.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodQuery {
    pub starts_on: Option<String>,
    pub ends_on: Option<String>,
    pub fields: Option<String>,
    pub page: Option<u32>,
    pub res_on_page: Option<u32>,
}

/// A validated period request.
#[derive(Debug, Clone)]
pub struct PeriodRequest {
    pub starts_on: DateTime<Utc>,
    pub ends_on: DateTime<Utc>,
    pub fields: String,
    pub page: u32,
    pub res_on_page: u32,
}

impl PeriodQuery {
    pub fn validate(&self) -> Result<PeriodRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let starts_on = Self::parse_bound(&mut errors, "startsOn", self.starts_on.as_deref());
        let ends_on = Self::parse_bound(&mut errors, "endsOn", self.ends_on.as_deref());

        if self.page == Some(0) {
            push_error(&mut errors, "page", MSG_POSITIVE);
        }
        if self.res_on_page == Some(0) {
            push_error(&mut errors, "resOnPage", MSG_POSITIVE);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PeriodRequest {
            starts_on: starts_on.expect("bound validated above"),
            ends_on: ends_on.expect("bound validated above"),
            fields: self.fields.clone().unwrap_or_default(),
            page: self.page.unwrap_or(1),
            res_on_page: self.res_on_page.unwrap_or(DEFAULT_RES_ON_PAGE),
        })
    }

    fn parse_bound(
        errors: &mut FieldErrors,
        field: &str,
        value: Option<&str>,
    ) -> Option<DateTime<Utc>> {
        match value.filter(|s| !s.is_empty()) {
            None => {
                push_error(errors, field, MSG_NOT_BLANK);
                None
            }
            Some(raw) => {
                let parsed = parse_datetime(raw);
                if parsed.is_none() {
                    push_error(errors, field, MSG_BAD_DATETIME);
                }
                parsed
            }
        }
    }
}

/// Raw query-string parameters of the payments listing endpoint.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PageQuery {
    pub fields: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<u32>,
    pub res_on_page: Option<u32>,
}

impl PageQuery {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.page == Some(0) {
            push_error(&mut errors, "page", MSG_POSITIVE);
        }
        if self.res_on_page == Some(0) {
            push_error(&mut errors, "resOnPage", MSG_POSITIVE);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Bare status envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "Success")]
    pub status: String,
}

/// Response after registering a payment or creating a session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    #[schema(example = "Success")]
    pub status: String,
    pub session_id: SessionId,
    /// Where the card form for this session is served
    #[schema(example = "/payment/card/67e55044-10b1-426f-9247-bb680e5fe0c8")]
    pub card_payment_url: String,
}

/// A single normalized payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentDataResponse {
    #[schema(example = "Success")]
    pub status: String,
    #[schema(value_type = Object)]
    pub payment: PaymentData,
}

/// One page of payments for a period.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPageResponse {
    #[schema(example = "Success")]
    pub status: String,
    /// The page actually served; snaps back to 1 when the requested page
    /// lies past the end of the result set
    pub page: u32,
    pub next_page_exists: bool,
    #[schema(value_type = Vec<Object>)]
    pub payments: Vec<PaymentData>,
}

/// A page of the full payments listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentsPageResponse {
    #[schema(example = "Success")]
    pub status: String,
    #[schema(value_type = Vec<Object>)]
    pub payments: Vec<PaymentData>,
}

/// Data backing the card payment form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardFormData {
    #[schema(value_type = String, example = "149.99")]
    pub amount: Amount,
    #[schema(example = "Office chair, order #4711")]
    pub purpose: String,
}

/// Validation failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    #[schema(example = "Validation error occurred")]
    pub status: String,
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterPaymentRequest {
        RegisterPaymentRequest {
            purpose: "Office chair, order #4711".to_string(),
            amount: "149.99".to_string(),
            notification: Some("https://shop.example.com/callback".to_string()),
            order_id: "order-4711".to_string(),
        }
    }

    #[test]
    fn test_register_validation_passes() {
        let new = register_request().validate().unwrap();
        assert_eq!(new.amount.minor_units(), 14999);
        assert_eq!(new.order_id.as_str(), "order-4711");
        assert!(new.notification.is_some());
    }

    #[test]
    fn test_register_collects_all_field_errors() {
        let req = RegisterPaymentRequest {
            purpose: "abc".to_string(),
            amount: "12.345".to_string(),
            notification: Some("ftp://example.com".to_string()),
            order_id: String::new(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.contains_key("purpose"));
        assert!(errors.contains_key("amount"));
        assert!(errors.contains_key("notification"));
        assert!(errors.contains_key("orderId"));
    }

    #[test]
    fn test_empty_notification_is_absent() {
        let mut req = register_request();
        req.notification = Some(String::new());
        let new = req.validate().unwrap();
        assert!(new.notification.is_none());
    }

    #[test]
    fn test_luhn() {
        assert!(luhn_valid("4242424242424242"));
        assert!(!luhn_valid("4242424242424241"));
    }

    #[test]
    fn test_card_validation() {
        let card = CardPaymentRequest {
            number: "4242424242424242".to_string(),
            cardholder_name: "JANE A DOE".to_string(),
            expiry_date: "12/2030".to_string(),
            security_number: "123".to_string(),
        };
        assert!(card.validate().is_ok());

        let mut bad = card.clone();
        bad.number = "4242424242424241".to_string();
        bad.security_number = "12".to_string();
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors["number"], vec![MSG_BAD_CARD.to_string()]);
        assert!(errors.contains_key("securityNumber"));
    }

    #[test]
    fn test_period_query_defaults() {
        let query = PeriodQuery {
            starts_on: Some("2020-04-01T00:00:00".to_string()),
            ends_on: Some("2020-05-01T00:00:00+00:00".to_string()),
            ..Default::default()
        };
        let req = query.validate().unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.res_on_page, DEFAULT_RES_ON_PAGE);
        assert!(req.fields.is_empty());
        assert!(req.starts_on < req.ends_on);
    }

    #[test]
    fn test_period_query_requires_bounds() {
        let errors = PeriodQuery::default().validate().unwrap_err();
        assert!(errors.contains_key("startsOn"));
        assert!(errors.contains_key("endsOn"));
    }

    #[test]
    fn test_period_query_rejects_page_zero() {
        let query = PeriodQuery {
            starts_on: Some("2020-04-01T00:00:00".to_string()),
            ends_on: Some("2020-05-01T00:00:00".to_string()),
            page: Some(0),
            ..Default::default()
        };
        let errors = query.validate().unwrap_err();
        assert!(errors.contains_key("page"));
    }
}
