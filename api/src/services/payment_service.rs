use std::sync::Arc;

use serde_json::Value;

use crate::error::ApiError;
use crate::models::api::OrderView;
use crate::models::member::MembershipPlan;
use crate::services::payment_gateway::{OrderRequest, PaymentGateway};

pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        PaymentService { gateway }
    }

    /// Orders the plan's price. Unknown or missing plans are charged the
    /// monthly price.
    pub async fn create_membership_order(&self, plan: Option<&str>) -> Result<OrderView, ApiError> {
        let plan = MembershipPlan::resolve(plan);
        self.create_order(plan.price() * 100).await
    }

    pub async fn create_booking_order(&self, amount: Option<&Value>) -> Result<OrderView, ApiError> {
        let amount = amount
            .and_then(to_minor_units)
            .filter(|minor| *minor > 0)
            .ok_or(ApiError::InvalidAmount)?;
        self.create_order(amount).await
    }

    pub fn verify_payment(
        &self,
        order_id: Option<&str>,
        payment_id: Option<&str>,
        signature: Option<&str>,
    ) -> Result<(), ApiError> {
        let (Some(order_id), Some(payment_id), Some(signature)) = (order_id, payment_id, signature)
        else {
            return Err(ApiError::PaymentVerification);
        };

        self.gateway
            .verify_signature(order_id, payment_id, signature)
            .map_err(|err| {
                tracing::warn!(order_id, payment_id, error = %err, "payment verification failed");
                ApiError::PaymentVerification
            })?;
        tracing::info!(order_id, payment_id, "payment verified");
        Ok(())
    }

    async fn create_order(&self, amount: i64) -> Result<OrderView, ApiError> {
        let request = OrderRequest::auto_capture(amount, self.gateway.currency());
        let order = self.gateway.create_order(&request).await.map_err(|err| {
            tracing::error!(amount, error = %err, "gateway order creation failed");
            ApiError::from(err)
        })?;
        tracing::info!(order_id = %order.id, amount = order.amount, "gateway order created");

        Ok(OrderView {
            order_id: order.id,
            amount: order.amount,
            key_id: self.gateway.key_id().to_string(),
        })
    }
}

/// Reads a JSON number or numeric string and converts currency units to
/// minor units.
pub fn to_minor_units(amount: &Value) -> Option<i64> {
    let units = match amount {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !units.is_finite() {
        return None;
    }
    Some((units * 100.0).round() as i64)
}
