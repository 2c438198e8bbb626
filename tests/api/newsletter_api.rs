use crate::helpers::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn subscribe_returns_201_for_valid_data() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_subscribe(&json!({ "email": "ursula_le_guin@gmail.com", "country": "US" }))
        .await;

    // then
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["subscriber"]["email"], "ursula_le_guin@gmail.com");
    assert_eq!(body["subscriber"]["country"], "US");
}

#[tokio::test]
async fn subscribe_returns_400_for_invalid_data() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = [
        (json!({}), "missing the email"),
        (json!({ "email": "" }), "empty email"),
        (json!({ "email": "definitely-not-an-email" }), "invalid email"),
        (json!({ "email": 42 }), "email that is not a string"),
    ];

    for (body, description) in test_cases {
        // when
        let response = app.post_subscribe(&body).await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not fail with 400 Bad Request when the payload was {description}."
        );
    }
}

#[tokio::test]
async fn subscribe_returns_409_for_an_existing_email() {
    // given
    let app = TestApp::spawn().await;
    app.post_subscribe(&json!({ "email": "twice@example.com" }))
        .await;

    // when
    let response = app
        .post_subscribe(&json!({ "email": "Twice@Example.com" }))
        .await;

    // then
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Email already subscribed");
}

#[tokio::test]
async fn unsubscribe_removes_the_subscriber() {
    // given
    let app = TestApp::spawn().await;
    app.post_subscribe(&json!({ "email": "leaving@example.com" }))
        .await;

    // when
    let response = app
        .post_unsubscribe(&json!({ "email": "leaving@example.com" }))
        .await;
    let again = app
        .post_unsubscribe(&json!({ "email": "leaving@example.com" }))
        .await;

    // then
    assert_eq!(response.status(), 200);
    assert_eq!(again.status(), 404);
}

#[tokio::test]
async fn unsubscribe_requires_an_email() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.post_unsubscribe(&json!({ "email": "  " })).await;

    // then
    assert_eq!(response.status(), 400);
}
