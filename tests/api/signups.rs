use crate::utils::{spawn_app, spawn_app_with_outages, ChannelOutages};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::*;
use wiremock::{
    matchers::{header, method},
    Mock, ResponseTemplate,
};

const VALID_BODY: &str =
    "artist_name=Nova&email=nova%40x.com&x_username=&telegram_username=&whatsapp_number=";

#[tokio::test]
async fn a_valid_signup_is_delivered_through_the_form_relay() {
    // Arrange
    let app = spawn_app().await;
    app.mock_form_relay(200, 1).await;
    app.mock_webhook(200, 0).await;
    app.mock_form_collection(200, 0).await;

    // Act
    let response = app.post_signup(VALID_BODY).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["status"], "delivered");
    assert_eq!(body["channel"], "form_relay");
    assert_eq!(body["reference"].as_str().map(str::len), Some(8));
}

#[tokio::test]
async fn the_form_relay_receives_the_record_under_its_form_keys() {
    // Arrange
    let app = spawn_app().await;
    app.mock_form_relay(200, 1).await;
    app.mock_webhook(200, 0).await;
    app.mock_form_collection(200, 0).await;

    // Act
    app.post_signup(
        "artist_name=Nova&email=nova%40x.com&x_username=%40nova_x&telegram_username=&whatsapp_number=",
    )
    .await;

    // Assert
    let request = &app.form_relay_server().received_requests().await.unwrap()[0];
    let fields: Vec<(String, String)> = serde_urlencoded::from_bytes(&request.body).unwrap();
    let value_of = |key: &str| {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    assert_eq!(value_of("Artist Name").as_deref(), Some("Nova"));
    assert_eq!(value_of("Email").as_deref(), Some("nova@x.com"));
    assert_eq!(value_of("X (Twitter)").as_deref(), Some("@nova_x"));
    assert_eq!(
        value_of("_recipient").as_deref(),
        Some("signups@signsound.studio")
    );
    // Blank handles are dropped rather than forwarded as empty fields.
    assert_eq!(value_of("Telegram"), None);
    assert_eq!(value_of("WhatsApp"), None);
}

#[rstest]
#[case("email=nova%40x.com", "missing the artist name")]
#[case("artist_name=Nova", "missing the email")]
#[case("artist_name=&email=nova%40x.com", "empty artist name")]
#[case("artist_name=Nova&email=not-an-email", "invalid email")]
#[case("artist_name=Nova&email=nova%40localhost", "email without a dotted domain")]
#[case("artist_name=No%2Fva&email=nova%40x.com", "forbidden character in the name")]
#[tokio::test]
async fn invalid_submissions_are_rejected_without_any_delivery_attempt(
    #[case] body: String,
    #[case] description: String,
) {
    // Arrange
    let app = spawn_app().await;
    app.mock_form_relay(200, 0).await;
    app.mock_webhook(200, 0).await;
    app.mock_form_collection(200, 0).await;

    // Act
    let response = app.post_signup(&body).await;

    // Assert
    assert_eq!(
        response.status(),
        StatusCode::UNPROCESSABLE_ENTITY,
        // Additional customised error message on test failure
        "The API did not fail with 422 Unprocessable Entity when the payload was {}.",
        description
    );
}

#[rstest]
#[case("artist_name=+&email=nova%40x.com", "artist_name")]
#[case("artist_name=Nova&email=not-an-email", "email")]
#[tokio::test]
async fn a_validation_failure_names_the_offending_field(
    #[case] body: String,
    #[case] field: String,
) {
    // Arrange
    let app = spawn_app().await;
    app.mock_form_relay(200, 0).await;
    app.mock_webhook(200, 0).await;
    app.mock_form_collection(200, 0).await;

    // Act
    let response = app.post_signup(&body).await;

    // Assert
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let text = response.text().await.expect("Failed to read body");
    assert!(text.contains(&field), "`{text}` does not name `{field}`");
}

#[tokio::test]
async fn the_webhook_backstops_a_failing_form_relay() {
    // Arrange
    let app = spawn_app().await;
    app.mock_form_relay(500, 1).await;
    app.mock_form_collection(200, 0).await;
    // The webhook only matches when the configured token is forwarded.
    Mock::given(method("POST"))
        .and(header("X-Webhook-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(app.webhook_server())
        .await;

    // Act
    let response = app.post_signup(VALID_BODY).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["status"], "delivered");
    assert_eq!(body["channel"], "webhook");
}

#[tokio::test]
async fn the_form_collection_backstops_even_when_it_rejects_the_post() {
    // Arrange
    let app = spawn_app().await;
    app.mock_form_relay(500, 1).await;
    app.mock_webhook(500, 1).await;
    app.mock_form_collection(500, 1).await;

    // Act
    let response = app.post_signup(VALID_BODY).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["status"], "delivered");
    assert_eq!(body["channel"], "form_collection");
}

#[tokio::test]
async fn a_dead_relay_a_rejecting_webhook_and_a_dead_collection_fail_the_submission() {
    // Arrange
    let app = spawn_app_with_outages(ChannelOutages {
        form_relay: true,
        form_collection: true,
        ..Default::default()
    })
    .await;
    app.mock_webhook(500, 1).await;

    // Act
    let response = app.post_signup(VALID_BODY).await;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["status"], "failed");
    assert_eq!(body["record"]["artist_name"], "Nova");
    assert_eq!(body["record"]["email"], "nova@x.com");
    assert!(body["record"]["x_username"].is_null());
}

#[tokio::test]
async fn a_total_outage_returns_the_manual_fallback_surfaces() {
    // Arrange
    let app = spawn_app_with_outages(ChannelOutages {
        form_relay: true,
        webhook: true,
        form_collection: true,
    })
    .await;

    // Act
    let response = app
        .post_signup(
            "artist_name=Nova&email=nova%40x.com&x_username=%40nova_x\
            &telegram_username=%40nova_tg&whatsapp_number=%2B4512345678",
        )
        .await;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["status"], "failed");
    assert_eq!(body["operator_email"], "signups@signsound.studio");
    assert_eq!(body["reference"].as_str().map(str::len), Some(8));

    // The record comes back unchanged for the caller to retry manually.
    assert_eq!(body["record"]["artist_name"], "Nova");
    assert_eq!(body["record"]["email"], "nova@x.com");
    assert_eq!(body["record"]["x_username"], "@nova_x");
    assert_eq!(body["record"]["telegram_username"], "@nova_tg");
    assert_eq!(body["record"]["whatsapp_number"], "+4512345678");

    let reference = body["reference"].as_str().unwrap();
    let mailto = body["mailto"].as_str().expect("mailto must be a string");
    assert!(mailto.starts_with("mailto:signups@signsound.studio?subject="));
    assert!(mailto.contains(reference));

    let copy_text = body["copy_text"]
        .as_str()
        .expect("copy_text must be a string");
    assert!(copy_text.contains("Nova"));
    assert!(copy_text.contains("@nova_x"));
    assert!(copy_text.contains("@nova_tg"));
    assert!(copy_text.contains("+4512345678"));
    assert!(copy_text.contains("signups@signsound.studio"));
}
