#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::Value;

use ground_booking_api::config::app_config::parse_admin_emails;
use ground_booking_api::error::GatewayError;
use ground_booking_api::jwt::jwt_helper::JwtKeys;
use ground_booking_api::repository::memory::{InMemoryBookingStore, InMemoryMemberStore};
use ground_booking_api::services::payment_gateway::{
    verify_payment_signature, GatewayOrder, OrderRequest, PaymentGateway,
};
use ground_booking_api::{build_rocket, AppServices};

pub const KEY_ID: &str = "rzp_test_key";
pub const KEY_SECRET: &str = "rzp_test_secret";
pub const ADMIN_EMAIL: &str = "admin@groundbooking.com";

/// Gateway double: hands out sequential order ids and checks signatures
/// with the real HMAC routine.
#[derive(Default)]
pub struct StubGateway {
    pub orders: Mutex<Vec<OrderRequest>>,
    pub reject: bool,
}

#[async_trait]
impl PaymentGateway for StubGateway {
    fn key_id(&self) -> &str {
        KEY_ID
    }

    fn currency(&self) -> &str {
        "INR"
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        if self.reject {
            return Err(GatewayError::Rejected("BAD_REQUEST_ERROR".into()));
        }
        let mut orders = self.orders.lock().unwrap();
        orders.push(request.clone());
        Ok(GatewayOrder {
            id: format!("order_{}", orders.len()),
            amount: request.amount,
            currency: request.currency.clone(),
        })
    }

    fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GatewayError> {
        verify_payment_signature(KEY_SECRET, order_id, payment_id, signature)
    }
}

pub struct TestApp {
    pub client: Client,
    pub members: Arc<InMemoryMemberStore>,
    pub bookings: Arc<InMemoryBookingStore>,
    pub gateway: Arc<StubGateway>,
}

pub async fn spawn() -> TestApp {
    spawn_with(StubGateway::default()).await
}

pub async fn spawn_with(gateway: StubGateway) -> TestApp {
    let members = Arc::new(InMemoryMemberStore::new());
    let bookings = Arc::new(InMemoryBookingStore::new());
    let gateway = Arc::new(gateway);

    let services = AppServices::new(
        members.clone(),
        bookings.clone(),
        gateway.clone(),
        parse_admin_emails(ADMIN_EMAIL),
        JwtKeys::new("integration-secret", Duration::from_secs(300)),
    );
    let client = Client::tracked(build_rocket(services))
        .await
        .expect("valid rocket instance");

    TestApp {
        client,
        members,
        bookings,
        gateway,
    }
}

impl TestApp {
    pub async fn post(&self, uri: &str, body: Value) -> (Status, Value) {
        let response = self
            .client
            .post(uri.to_string())
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        let status = response.status();
        (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
    }

    pub async fn put(&self, uri: &str, body: Value) -> (Status, Value) {
        let response = self
            .client
            .put(uri.to_string())
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        let status = response.status();
        (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str) -> (Status, Value) {
        let response = self.client.get(uri.to_string()).dispatch().await;
        let status = response.status();
        (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
    }

    pub async fn get_as(&self, uri: &str, token: &str) -> (Status, Value) {
        let response = self
            .client
            .get(uri.to_string())
            .header(Header::new("Authorization", format!("Bearer {}", token)))
            .dispatch()
            .await;
        let status = response.status();
        (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
    }

    pub async fn delete(&self, uri: &str) -> (Status, Value) {
        let response = self.client.delete(uri.to_string()).dispatch().await;
        let status = response.status();
        (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
    }

    pub async fn checkout(&self, plan: &str, email: &str) -> (Status, Value) {
        self.post(
            "/api/membership/checkout",
            serde_json::json!({
                "plan": plan,
                "fullName": "Ravi Kumar",
                "email": email,
                "phone": "9876543210"
            }),
        )
        .await
    }

    pub async fn signup(&self, email: &str, password: &str) -> (Status, Value) {
        self.post(
            "/api/auth/signup",
            serde_json::json!({
                "fullName": "Asha Rao",
                "email": email,
                "phone": "9999999999",
                "password": password
            }),
        )
        .await
    }

    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, Status::Ok, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }
}
