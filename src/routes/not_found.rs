use askama_axum::{IntoResponse, Template};
use axum::{http::StatusCode, response::Response};

#[tracing::instrument(name = "Page not found")]
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFound {
            page_title: "Page Not Found",
        },
    )
        .into_response()
}

#[derive(Template)]
#[template(path = "web/not_found.html")]
struct NotFound<'a> {
    page_title: &'a str,
}
