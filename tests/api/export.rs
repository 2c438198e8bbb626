use crate::helpers::TestApp;
use newsletter_admin::domain::Subscriber;
use time::macros::datetime;

fn seed_countries(app: &TestApp) {
    app.seed("de1@example.com", Some("DE"), datetime!(2024-01-01 0:00 UTC));
    app.seed("pl1@example.com", Some("PL"), datetime!(2024-01-02 0:00 UTC));
    app.seed("de2@example.com", Some("DE"), datetime!(2024-01-03 0:00 UTC));
    app.seed("nowhere@example.com", None, datetime!(2024-01-04 0:00 UTC));
    app.seed("de3@example.com", Some("DE"), datetime!(2024-01-05 0:00 UTC));
}

fn scratch_files(app: &TestApp) -> usize {
    std::fs::read_dir(&app.export_dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn export_form_offers_every_country() {
    // given
    let app = TestApp::spawn().await;
    seed_countries(&app);
    app.log_in().await;

    // when
    let html_page = app.get_html("/export").await;

    // then
    assert!(html_page.contains(r#"<option value="DE">DE</option>"#));
    assert!(html_page.contains(r#"<option value="PL">PL</option>"#));
}

#[tokio::test]
async fn csv_export_by_country_contains_only_that_country() {
    // given
    let app = TestApp::spawn().await;
    seed_countries(&app);
    app.log_in().await;

    // when
    let response = app
        .get_export_emails("?type=country&country=DE&format=csv")
        .await;

    // then
    assert_eq!(response.status(), 200);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    let disposition = response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with(r#"attachment; filename="newsletter_emails_DE_"#));
    assert!(disposition.ends_with(r#".csv""#));

    let body = response.text().await.unwrap();
    let lines: Vec<_> = body.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "EMAIL,COUNTRY,SUBSCRIPTION DATE");
    assert!(lines[1..].iter().all(|line| line.contains(",DE,")));
}

#[tokio::test]
async fn json_export_reparses_to_every_subscriber() {
    // given
    let app = TestApp::spawn().await;
    seed_countries(&app);
    app.log_in().await;

    // when
    let response = app.get_export_emails("?type=all&format=json").await;

    // then
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");
    let exported: Vec<Subscriber> = response.json().await.unwrap();
    let mut emails: Vec<_> = exported.iter().map(|s| s.email.as_str()).collect();
    emails.sort_unstable();
    assert_eq!(
        emails,
        vec![
            "de1@example.com",
            "de2@example.com",
            "de3@example.com",
            "nowhere@example.com",
            "pl1@example.com",
        ]
    );
}

#[tokio::test]
async fn unknown_formats_fall_back_to_plain_text() {
    // given
    let app = TestApp::spawn().await;
    app.seed("solo@example.com", None, datetime!(2024-01-01 0:00 UTC));
    app.log_in().await;

    // when
    let response = app.get_export_emails("?format=xlsx").await;

    // then
    assert_eq!(response.status(), 200);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "solo@example.com,");
}

#[tokio::test]
async fn exporting_an_empty_selection_returns_404() {
    // given
    let app = TestApp::spawn().await;
    seed_countries(&app);
    app.log_in().await;

    // when
    let response = app.get_export_emails("?type=country&country=FR").await;

    // then
    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "No emails found to export");
    assert_eq!(scratch_files(&app), 0);
}

#[tokio::test]
async fn exporting_by_country_requires_a_country() {
    // given
    let app = TestApp::spawn().await;
    seed_countries(&app);
    app.log_in().await;

    // when
    let response = app.get_export_emails("?type=country&country=").await;

    // then
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn scratch_files_are_removed_after_download() {
    // given
    let app = TestApp::spawn().await;
    seed_countries(&app);
    app.log_in().await;

    // when
    for format in ["txt", "csv", "json"] {
        let response = app
            .get_export_emails(&format!("?type=all&format={format}"))
            .await;
        assert_eq!(response.status(), 200);
        response.bytes().await.unwrap();
    }

    // then
    assert!(app.export_dir.exists());
    for _ in 0..50 {
        if scratch_files(&app) == 0 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("Export scratch files were not removed");
}
