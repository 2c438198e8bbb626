use crate::helpers::TestApp;
use serde_json::{json, Value};
use time::{macros::datetime, Duration};

fn seed_many(app: &TestApp, count: i64) -> Vec<i64> {
    (0..count)
        .map(|i| {
            app.seed(
                &format!("user{i}@example.com"),
                None,
                datetime!(2024-01-01 0:00 UTC) + Duration::hours(i),
            )
            .id
        })
        .collect()
}

#[tokio::test]
async fn bulk_delete_removes_every_requested_subscriber() {
    // given
    let app = TestApp::spawn().await;
    let ids = seed_many(&app, 5);
    app.log_in().await;

    // when
    let response = app
        .post_delete_multiple_emails(&json!({ "ids": [ids[0], ids[1].to_string(), ids[2]] }))
        .await;

    // then
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["deletedCount"], 3);
    assert_eq!(body["message"], "Deleted 3 email(s)");
    assert_eq!(app.get_subscribers_json("").await["totalCount"], 2);
}

#[tokio::test]
async fn bulk_delete_counts_only_rows_that_still_existed() {
    // given
    let app = TestApp::spawn().await;
    let ids = seed_many(&app, 3);
    app.log_in().await;
    app.post_delete_multiple_emails(&json!({ "ids": [ids[0]] }))
        .await;

    // when
    let response = app
        .post_delete_multiple_emails(&json!({ "ids": [ids[0], ids[1], ids[1]] }))
        .await;

    // then
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["deletedCount"], 1);
}

#[tokio::test]
async fn bulk_delete_rejects_bad_id_sets() {
    // given
    let app = TestApp::spawn().await;
    let ids = seed_many(&app, 2);
    app.log_in().await;

    let test_cases = [
        (json!({}), "missing ids"),
        (json!({ "ids": [] }), "empty ids"),
        (json!({ "ids": "1,2" }), "ids that are not an array"),
        (json!({ "ids": [ids[0], "abc"] }), "a non-numeric id"),
        (json!({ "ids": [ids[0], -4] }), "a negative id"),
    ];

    for (body, description) in test_cases {
        // when
        let response = app.post_delete_multiple_emails(&body).await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not fail with 400 Bad Request when the payload had {description}."
        );
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    assert_eq!(app.get_subscribers_json("").await["totalCount"], 2);
}

#[tokio::test]
async fn overlapping_concurrent_bulk_deletes_never_count_a_row_twice() {
    // given
    let app = TestApp::spawn().await;
    let ids = seed_many(&app, 6);
    app.log_in().await;
    let first = json!({ "ids": ids[0..4] });
    let second = json!({ "ids": ids[2..6] });

    // when
    let (first, second) = tokio::join!(
        app.post_delete_multiple_emails(&first),
        app.post_delete_multiple_emails(&second)
    );

    // then
    let first: Value = first.json().await.unwrap();
    let second: Value = second.json().await.unwrap();
    let total = first["deletedCount"].as_u64().unwrap() + second["deletedCount"].as_u64().unwrap();
    assert_eq!(total, 6);
    assert_eq!(app.get_subscribers_json("").await["totalCount"], 0);
}
