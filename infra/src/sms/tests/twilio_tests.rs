//! Tests for the Twilio transport against a local stand-in for the API

use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::sms::{SmsService, TwilioConfig, TwilioSmsService};
use crate::InfrastructureError;

const MESSAGES_PATH: &str = "/2010-04-01/Accounts/AC123/Messages.json";

struct FakeTwilio {
    /// Status returned per call; calls past the end succeed
    statuses: Vec<u16>,
    calls: AtomicUsize,
    last_form: Mutex<Option<HashMap<String, String>>>,
    /// Pause before answering each call
    delay: Option<Duration>,
}

async fn create_message(
    state: web::Data<FakeTwilio>,
    req: HttpRequest,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    let call = state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_form.lock().unwrap() = Some(form.into_inner());
    if let Some(delay) = state.delay {
        actix_web::rt::time::sleep(delay).await;
    }

    let authorized = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.starts_with("Basic "));
    if !authorized {
        return HttpResponse::Unauthorized().finish();
    }

    let status = state.statuses.get(call).copied().unwrap_or(201);
    if status == 201 {
        return HttpResponse::Created().json(serde_json::json!({
            "sid": format!("SM{:032}", call),
            "status": "queued"
        }));
    }
    HttpResponse::build(StatusCode::from_u16(status).unwrap()).json(serde_json::json!({
        "code": 20001,
        "message": "Simulated failure"
    }))
}

fn start_fake_twilio(statuses: Vec<u16>) -> (String, web::Data<FakeTwilio>) {
    start_fake_twilio_with_delay(statuses, None)
}

fn start_fake_twilio_with_delay(
    statuses: Vec<u16>,
    delay: Option<Duration>,
) -> (String, web::Data<FakeTwilio>) {
    let state = web::Data::new(FakeTwilio {
        statuses,
        calls: AtomicUsize::new(0),
        last_form: Mutex::new(None),
        delay,
    });
    let data = state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route(MESSAGES_PATH, web::post().to(create_message))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    (format!("http://{}", addr), state)
}

fn service(base_url: &str) -> TwilioSmsService {
    TwilioSmsService::new(TwilioConfig {
        account_sid: "AC123".to_string(),
        auth_token: "secret".to_string(),
        api_base_url: base_url.to_string(),
        max_retries: 3,
        retry_delay_ms: 1,
        request_timeout_secs: 5,
    })
    .unwrap()
}

#[test]
fn test_messages_url() {
    assert_eq!(
        service("https://api.twilio.com/").messages_url(),
        "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
    );
}

#[test]
fn test_debug_hides_auth_token() {
    let config = TwilioConfig {
        account_sid: "AC123".to_string(),
        auth_token: "secret".to_string(),
        api_base_url: "https://api.twilio.com".to_string(),
        max_retries: 3,
        retry_delay_ms: 1,
        request_timeout_secs: 5,
    };
    assert!(!format!("{:?}", config).contains("secret"));
}

#[actix_web::test]
async fn test_send_returns_message_sid() {
    let (base_url, state) = start_fake_twilio(vec![]);

    let sid = service(&base_url)
        .send_sms("Acme", "+15550100", "Your code is 123456")
        .await
        .unwrap();

    assert!(sid.starts_with("SM"));
    assert_eq!(state.calls.load(Ordering::SeqCst), 1);

    let form = state.last_form.lock().unwrap().clone().unwrap();
    assert_eq!(form["From"], "Acme");
    assert_eq!(form["To"], "+15550100");
    assert_eq!(form["Body"], "Your code is 123456");
}

#[actix_web::test]
async fn test_server_errors_are_retried() {
    let (base_url, state) = start_fake_twilio(vec![503, 429]);

    let result = service(&base_url).send_sms("Acme", "+15550100", "hi").await;

    assert!(result.is_ok());
    assert_eq!(state.calls.load(Ordering::SeqCst), 3);
}

#[actix_web::test]
async fn test_client_errors_are_not_retried() {
    let (base_url, state) = start_fake_twilio(vec![400]);

    let result = service(&base_url).send_sms("Acme", "bogus", "hi").await;

    match result {
        Err(InfrastructureError::Sms(message)) => assert!(message.contains("Simulated failure")),
        other => panic!("Expected Sms error, got {:?}", other),
    }
    assert_eq!(state.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_retries_are_bounded() {
    let (base_url, state) = start_fake_twilio(vec![500, 500, 500, 500]);

    let result = service(&base_url).send_sms("Acme", "+15550100", "hi").await;

    assert!(matches!(result, Err(InfrastructureError::Sms(_))));
    assert_eq!(state.calls.load(Ordering::SeqCst), 3);
}

#[actix_web::test]
async fn test_oversized_body_is_rejected_locally() {
    let (base_url, state) = start_fake_twilio(vec![]);

    let body = "x".repeat(1601);
    let result = service(&base_url).send_sms("Acme", "+15550100", &body).await;

    assert!(matches!(result, Err(InfrastructureError::Sms(_))));
    assert_eq!(state.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_timeout_is_not_retried() {
    let (base_url, state) = start_fake_twilio_with_delay(vec![], Some(Duration::from_secs(3)));
    let service = TwilioSmsService::new(TwilioConfig {
        account_sid: "AC123".to_string(),
        auth_token: "secret".to_string(),
        api_base_url: base_url,
        max_retries: 3,
        retry_delay_ms: 1,
        request_timeout_secs: 1,
    })
    .unwrap();

    let result = service.send_sms("Acme", "+15550100", "Your code is 123456").await;

    match result {
        Err(InfrastructureError::Http(e)) => assert!(e.is_timeout()),
        other => panic!("Expected timeout, got {:?}", other),
    }
    assert_eq!(state.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_connection_refused_is_retried_then_fails() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let result = service(&format!("http://{}", addr))
        .send_sms("Acme", "+15550100", "Your code is 123456")
        .await;

    match result {
        Err(InfrastructureError::Http(e)) => assert!(e.is_connect()),
        other => panic!("Expected connect error, got {:?}", other),
    }
}
