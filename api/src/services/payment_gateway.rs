use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;

use crate::config::app_config::RazorpayConfig;
use crate::error::GatewayError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Minor currency units (paise for INR).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    /// 1 = capture automatically once the payment is authorised.
    pub payment_capture: u8,
}

impl OrderRequest {
    pub fn auto_capture(amount: i64, currency: &str) -> Self {
        OrderRequest {
            amount,
            currency: currency.to_string(),
            receipt: format!("rcpt_{}", uuid::Uuid::new_v4().simple()),
            payment_capture: 1,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
}

/// The external payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key handed to browsers to open the checkout widget.
    fn key_id(&self) -> &str;

    fn currency(&self) -> &str;

    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError>;

    fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GatewayError>;
}

pub struct RazorpayGateway {
    config: RazorpayConfig,
    client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(RazorpayGateway { config, client })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    fn currency(&self) -> &str {
        &self.config.currency
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.config.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            let description = body["error"]["description"]
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(GatewayError::Rejected(description));
        }

        serde_json::from_value(body)
            .map_err(|e| GatewayError::Rejected(format!("unexpected order payload: {}", e)))
    }

    fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GatewayError> {
        verify_payment_signature(&self.config.key_secret, order_id, payment_id, signature)
    }
}

/// Checks the checkout signature: hex HMAC-SHA256 of `"{order}|{payment}"`
/// keyed with the API secret. Comparison is constant-time.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), GatewayError> {
    let expected = hex::decode(signature.trim()).map_err(|_| GatewayError::MalformedSignature)?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| GatewayError::MalformedSignature)?;
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| GatewayError::SignatureMismatch)
}

/// Produces the signature the gateway would send for an order/payment pair.
pub fn sign_payment(secret: &str, order_id: &str, payment_id: &str) -> Result<String, GatewayError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| GatewayError::MalformedSignature)?;
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
