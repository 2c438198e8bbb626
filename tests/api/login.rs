use crate::helpers::{assert_is_redirect_to, TestApp};
use uuid::Uuid;

#[tokio::test]
async fn home_redirects_to_login() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get("/").await;

    // then
    assert_is_redirect_to(&response, "/login");
}

#[tokio::test]
async fn successful_login_redirects_to_dashboard() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.post_login(&app.admin_password).await;

    // then
    assert_is_redirect_to(&response, "/dashboard");
    let html_page = app.get_dashboard_html().await;
    assert!(html_page.contains("Newsletter Subscribers"));
}

#[tokio::test]
async fn an_error_flash_message_is_set_on_failure() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.post_login(&Uuid::new_v4().to_string()).await;

    // then
    assert_is_redirect_to(&response, "/login");

    let html_page = app.get_login_html().await;
    assert!(html_page.contains("<p><i>Authentication failed</i></p>"));

    let html_page = app.get_login_html().await;
    assert!(!html_page.contains("<p><i>Authentication failed</i></p>"));
}

#[tokio::test]
async fn failed_login_does_not_grant_access() {
    // given
    let app = TestApp::spawn().await;
    app.post_login("wrong-password").await;

    // when
    let response = app.get_dashboard().await;

    // then
    assert_is_redirect_to(&response, "/login");
}

#[tokio::test]
async fn logout_clears_session_state() {
    // given
    let app = TestApp::spawn().await;
    app.log_in().await;

    // when
    let response = app.get_logout().await;

    // then
    assert_is_redirect_to(&response, "/login");

    let html_page = app.get_login_html().await;
    assert!(html_page.contains("<p><i>You have successfully logged out.</i></p>"));

    let response = app.get_dashboard().await;
    assert_is_redirect_to(&response, "/login");
}

#[tokio::test]
async fn logout_without_a_session_redirects_to_login() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get_logout().await;

    // then
    assert_is_redirect_to(&response, "/login");
}
