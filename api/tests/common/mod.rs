//! Shared wiring for the HTTP tests: real engines over the in-memory store,
//! the mock SMS service and a manually driven clock.

#![allow(dead_code)]

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use st_api::middleware::SignatureAuth;
use st_api::AppState;
use st_core::services::{
    CodeStoreTrait, Expiry, ManualTimeSource, RequestAuthenticator, TimeSource,
};
use st_infra::{InMemoryCodeStore, MockSmsService, SmsNotifier};
use st_shared::{SignatureConfig, TokenConfig};

pub const SECRET: &str = "abcd";
pub const HEADER: &str = "X-Sms-Signature";
pub const RECIPIENT: &str = "555-0100";
pub const TEMPLATE: &str = "Your code is ";
pub const JSON_LIMIT: usize = 16 * 1024;

pub fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

/// In-memory store that counts every call made through it
pub struct CountingStore {
    inner: Arc<InMemoryCodeStore>,
    ops: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<InMemoryCodeStore>) -> Self {
        Self {
            inner,
            ops: AtomicUsize::new(0),
        }
    }

    pub fn op_count(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.ops.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CodeStoreTrait for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.count();
        self.inner.get(key).await
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String> {
        self.count();
        self.inner.set_with_expiry(key, value, ttl_seconds).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.count();
        self.inner.set(key, value).await
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String> {
        self.count();
        self.inner.set_if_absent(key, value, ttl_seconds).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        expiry: Expiry,
    ) -> Result<bool, String> {
        self.count();
        self.inner.compare_and_swap(key, expected, value, expiry).await
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String> {
        self.count();
        self.inner.delete_if_equals(key, expected).await
    }
}

pub struct TestContext {
    pub clock: Arc<ManualTimeSource>,
    /// Backing store, for inspection outside the service
    pub store: Arc<InMemoryCodeStore>,
    /// What the service sees
    pub counted: Arc<CountingStore>,
    pub sms: MockSmsService,
    pub token: TokenConfig,
    pub signature: SignatureConfig,
    signer: RequestAuthenticator,
}

impl TestContext {
    pub fn new() -> Self {
        let clock = Arc::new(ManualTimeSource::new(t0()));
        let store = Arc::new(InMemoryCodeStore::new().with_time_source(clock.clone()));
        let signature = SignatureConfig::with_secret(SECRET);

        Self {
            clock,
            counted: Arc::new(CountingStore::new(store.clone())),
            store,
            sms: MockSmsService::new(),
            token: TokenConfig::default(),
            signer: RequestAuthenticator::new(&signature),
            signature,
        }
    }

    pub fn state(&self) -> web::Data<AppState<SmsNotifier, CountingStore>> {
        let notifier = Arc::new(SmsNotifier::new(Arc::new(self.sms.clone())));
        web::Data::new(AppState::with_time_source(
            notifier,
            self.counted.clone(),
            &self.token,
            self.clock.clone(),
        ))
    }

    pub fn auth(&self) -> SignatureAuth {
        SignatureAuth::new(&self.signature).with_time_source(self.clock.clone())
    }

    /// Header value signed at the current test time
    pub fn signed(&self) -> String {
        self.signer.sign(self.clock.now().timestamp())
    }

    /// Header value signed `offset` seconds away from the current test time
    pub fn signed_at_offset(&self, offset: i64) -> String {
        self.signer.sign(self.clock.now().timestamp() + offset)
    }

    /// Store calls made by the service so far
    pub fn store_ops(&self) -> usize {
        self.counted.op_count()
    }

    pub fn advance(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }

    /// Code carried by the most recent message to `recipient`
    pub fn last_code(&self, recipient: &str) -> Option<String> {
        self.sms
            .last_message_to(recipient)
            .map(|m| m.body.trim_start_matches(TEMPLATE).to_string())
    }
}

pub fn send_body(recipient: &str) -> serde_json::Value {
    serde_json::json!({
        "From": "Acme",
        "To": recipient,
        "Text": TEMPLATE,
    })
}
