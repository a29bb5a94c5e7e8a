use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use landos_site::{
    booking::BookingApp,
    mailer::{MailError, MailSender, OutgoingMail},
    AppState,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const JANE_FORM: &str =
    "name=Jane+Doe&email=jane%40example.com&phone=555-1234&message=Need+catering+for+50";
const JANE_JSON: &str = r#"{"name":"Jane Doe","email":"jane@example.com","phone":"555-1234","message":"Need catering for 50"}"#;

/// Records every message and fails the ones addressed to `fail_to`.
#[derive(Default)]
struct FakeMailer {
    fail_to: Vec<&'static str>,
    sent: Mutex<Vec<OutgoingMail>>,
}

impl FakeMailer {
    fn failing(fail_to: &[&'static str]) -> Self {
        Self {
            fail_to: fail_to.to_vec(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl MailSender for FakeMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail.clone());
        if self.fail_to.iter().any(|address| *address == mail.to) {
            return Err(MailError::Rejected(reqwest::StatusCode::BAD_GATEWAY));
        }
        Ok(())
    }
}

fn router(mailer: Arc<FakeMailer>) -> Router {
    let booker = BookingApp::new(mailer, "bookings@example.com");
    landos_site::app(
        AppState::new(booker),
        concat!(env!("CARGO_MANIFEST_DIR"), "/assets"),
    )
}

fn post(content_type: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/book-event")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn form_submission_redirects_to_success() {
    let mailer = Arc::new(FakeMailer::default());
    let response = router(mailer.clone())
        .oneshot(post("application/x-www-form-urlencoded", JANE_FORM))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/book-event?success=true");

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "landosbarbeque@gmail.com");
    assert_eq!(sent[0].reply_to.as_deref(), Some("jane@example.com"));
    assert_eq!(sent[1].to, "jane@example.com");
}

#[tokio::test]
async fn json_submission_redirects_to_success() {
    let mailer = Arc::new(FakeMailer::default());
    let response = router(mailer.clone())
        .oneshot(post("application/json", JANE_JSON))
        .await
        .unwrap();

    assert_eq!(location(&response), "/book-event?success=true");
    assert_eq!(mailer.sent.lock().unwrap()[1].subject, "Thank you for contacting Lando's Barbeque!");
}

#[tokio::test]
async fn failed_sends_redirect_to_error() {
    let mailer = Arc::new(FakeMailer::failing(&[
        "landosbarbeque@gmail.com",
        "jane@example.com",
    ]));
    let response = router(mailer.clone())
        .oneshot(post("application/x-www-form-urlencoded", JANE_FORM))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/book-event?error=true");
    assert_eq!(mailer.sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn one_failed_send_still_redirects_to_success() {
    for failing in ["landosbarbeque@gmail.com", "jane@example.com"] {
        let mailer = Arc::new(FakeMailer::failing(&[failing]));
        let response = router(mailer.clone())
            .oneshot(post("application/x-www-form-urlencoded", JANE_FORM))
            .await
            .unwrap();

        assert_eq!(location(&response), "/book-event?success=true", "{failing}");
        assert_eq!(mailer.sent.lock().unwrap().len(), 2, "{failing}");
    }
}

#[tokio::test]
async fn repeated_form_field_is_still_sent() {
    let mailer = Arc::new(FakeMailer::default());
    let response = router(mailer.clone())
        .oneshot(post(
            "application/x-www-form-urlencoded",
            "name=a&name=b&email=jane%40example.com&phone=555-1234&message=hi",
        ))
        .await
        .unwrap();

    assert_eq!(location(&response), "/book-event?success=true");
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].subject, "New Booking Request from b");
}

#[tokio::test]
async fn numeric_json_field_is_still_sent() {
    let mailer = Arc::new(FakeMailer::default());
    let response = router(mailer.clone())
        .oneshot(post(
            "application/json",
            r#"{"name":"Jane Doe","email":"jane@example.com","phone":5551234,"message":"hi"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(location(&response), "/book-event?success=true");
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].html.contains("<p><strong>Phone:</strong> 5551234</p>"));
}

#[tokio::test]
async fn unreadable_body_redirects_to_error_without_sending() {
    let mailer = Arc::new(FakeMailer::default());
    let response = router(mailer.clone())
        .oneshot(post("application/json", "{not json"))
        .await
        .unwrap();

    assert_eq!(location(&response), "/book-event?error=true");
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn book_event_page_shows_banner() {
    let response = router(Arc::new(FakeMailer::default()))
        .oneshot(get("/book-event?success=true"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("id=\"booking-success\""));
    assert!(body.contains(r#"<form class="booking-form" method="post" action="/book-event">"#));
}

#[tokio::test]
async fn repeated_banner_parameter_still_renders() {
    let response = router(Arc::new(FakeMailer::default()))
        .oneshot(get("/book-event?success=true&success=true"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("id=\"booking-success\""));
    assert!(body.contains(r#"<form class="booking-form""#));
}

#[tokio::test]
async fn static_pages_render() {
    for (uri, active) in [
        ("/", r#"<a href="/" class="active">"#),
        ("/about", r#"<a href="/about" class="active">"#),
        ("/menu", r#"<a href="/menu" class="active">"#),
    ] {
        let response = router(Arc::new(FakeMailer::default()))
            .oneshot(get(uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_text(response).await.contains(active), "{uri}");
    }
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = router(Arc::new(FakeMailer::default()))
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body, serde_json::json!({ "status": "healthy" }));
}

#[tokio::test]
async fn serves_assets() {
    let response = router(Arc::new(FakeMailer::default()))
        .oneshot(get("/assets/css/style.css"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
