use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt::{Debug, Display};

pub fn e500<T>(error: T) -> HttpError<T>
where
    T: Debug + Display,
{
    HttpError::InternalServerError(error)
}

pub fn e400<T>(error: T) -> HttpError<T>
where
    T: Debug + Display,
{
    HttpError::BadRequest(error)
}

pub fn e404<T>(error: T) -> HttpError<T>
where
    T: Debug + Display,
{
    HttpError::NotFound(error)
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError<T>
where
    T: Debug + Display,
{
    #[error("Something went wrong")]
    InternalServerError(#[from] T),
    #[error("{0}")]
    BadRequest(T),
    #[error("{0}")]
    NotFound(T),
}

impl<T> IntoResponse for HttpError<T>
where
    T: Debug + Display,
{
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
        }
    }
}

/// `{"error": "..."}` body used by the JSON endpoints.
pub fn json_error(status: StatusCode, message: impl Display) -> Response {
    (status, Json(json!({ "error": message.to_string() }))).into_response()
}
