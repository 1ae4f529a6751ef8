//! # Paygate Client SDK
//!
//! A typed Rust client for the payment gateway API.

use paygate_types::{
    CardFormData, CardPaymentRequest, PaymentData, PaymentDataResponse, PaymentsPageResponse,
    PeriodPageResponse, RegisterPaymentRequest, SessionCreatedResponse, SessionId, StatusResponse,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payment gateway API client.
pub struct PaygateClient {
    base_url: String,
    http: Client,
}

impl PaygateClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Registers a payment and receives a payment session for it.
    pub async fn register_payment(
        &self,
        purpose: &str,
        amount: &str,
        notification: Option<&str>,
        order_id: &str,
    ) -> Result<SessionCreatedResponse, ClientError> {
        let req = RegisterPaymentRequest {
            purpose: purpose.to_string(),
            amount: amount.to_string(),
            notification: notification.map(String::from),
            order_id: order_id.to_string(),
        };
        self.post("/api/payment/register", &req).await
    }

    /// Gets normalized payment data by order id.
    pub async fn get_payment(
        &self,
        order_id: &str,
        fields: &str,
    ) -> Result<PaymentData, ClientError> {
        let response: PaymentDataResponse = self
            .get_with_query(
                &format!("/api/payment/{}", order_id),
                &[("fields", fields.to_string())],
            )
            .await?;
        Ok(response.payment)
    }

    /// One page of the payments created inside a period.
    pub async fn payments_from_period(
        &self,
        starts_on: &str,
        ends_on: &str,
        fields: &str,
        page: Option<u32>,
        res_on_page: Option<u32>,
    ) -> Result<PeriodPageResponse, ClientError> {
        let mut query = vec![
            ("startsOn", starts_on.to_string()),
            ("endsOn", ends_on.to_string()),
            ("fields", fields.to_string()),
        ];
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(res_on_page) = res_on_page {
            query.push(("resOnPage", res_on_page.to_string()));
        }
        self.get_with_query("/api/payments/period", &query).await
    }

    /// The full payments listing, ordered by an orderBy expression.
    pub async fn payments(
        &self,
        order_by: &str,
        fields: &str,
        page: Option<u32>,
        res_on_page: Option<u32>,
    ) -> Result<PaymentsPageResponse, ClientError> {
        let mut query = vec![
            ("orderBy", order_by.to_string()),
            ("fields", fields.to_string()),
        ];
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(res_on_page) = res_on_page {
            query.push(("resOnPage", res_on_page.to_string()));
        }
        self.get_with_query("/api/payments", &query).await
    }

    /// Opens a session for an existing pending payment.
    pub async fn create_session(
        &self,
        order_id: &str,
    ) -> Result<SessionCreatedResponse, ClientError> {
        self.get_with_query(&format!("/api/session/create/{}", order_id), &[])
            .await
    }

    /// The amount and purpose backing the card form of a session.
    pub async fn card_form_data(
        &self,
        session_id: &SessionId,
    ) -> Result<CardFormData, ClientError> {
        self.get_with_query(&format!("/payment/card/{}", session_id), &[])
            .await
    }

    /// Submits card data against a session, completing the payment.
    pub async fn pay(
        &self,
        session_id: &SessionId,
        number: &str,
        cardholder_name: &str,
        expiry_date: &str,
        security_number: &str,
    ) -> Result<StatusResponse, ClientError> {
        let req = CardPaymentRequest {
            number: number.to_string(),
            cardholder_name: cardholder_name.to_string(),
            expiry_date: expiry_date.to_string(),
            security_number: security_number.to_string(),
        };
        self.post(&format!("/payment/card/{}", session_id), &req)
            .await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("status").and_then(|s| s.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PaygateClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = PaygateClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
