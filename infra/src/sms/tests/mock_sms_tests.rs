//! Unit tests for mock SMS service

use std::time::Duration;

use crate::sms::{MockSmsService, SmsService};
use crate::InfrastructureError;

#[tokio::test]
async fn test_mock_sms_send_success() {
    let service = MockSmsService::new();
    let result = service.send_sms("Acme", "555-0100", "Test message").await;

    let message_id = result.unwrap();
    assert!(message_id.starts_with("mock_"));
    assert_eq!(service.get_message_count(), 1);

    let sent = service.last_message_to("555-0100").unwrap();
    assert_eq!(sent.message_id, message_id);
    assert_eq!(sent.from, "Acme");
    assert_eq!(sent.body, "Test message");
}

#[tokio::test]
async fn test_mock_sms_accepts_opaque_recipients() {
    let service = MockSmsService::new();
    assert!(service.send_sms("", "not-a-phone", "x").await.is_ok());
}

#[tokio::test]
async fn test_mock_sms_simulate_failure() {
    let service = MockSmsService::new();
    service.set_simulate_failure(true);

    let result = service.send_sms("Acme", "555-0100", "Test message").await;
    assert!(matches!(result, Err(InfrastructureError::Sms(_))));
    assert!(service.sent_messages().is_empty());
}

#[tokio::test]
async fn test_clones_share_state() {
    let service = MockSmsService::new();
    let observer = service.clone();

    service.send_sms("Acme", "555-0100", "one").await.unwrap();
    service.send_sms("Acme", "555-0101", "two").await.unwrap();

    assert_eq!(observer.get_message_count(), 2);
    assert_eq!(observer.last_message_to("555-0100").unwrap().body, "one");
    assert!(observer.last_message_to("555-0199").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_latency_is_applied() {
    let service = MockSmsService::new().with_latency(Duration::from_secs(2));

    let start = tokio::time::Instant::now();
    service.send_sms("Acme", "555-0100", "slow").await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(2));
}
