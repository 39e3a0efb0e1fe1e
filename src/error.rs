use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Every failure a route can surface. `IntoResponse` renders the shared
/// `{message, status_code}` body, so handlers and extractors just return a
/// variant and the wire shape stays uniform.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("user is already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("user not found")]
    UserNotFound,
    #[error("planet not found")]
    PlanetNotFound,
    #[error("person not found")]
    PersonNotFound,
    #[error("favorite not found")]
    FavoriteNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::EmailTaken => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::UserNotFound
            | Self::PlanetNotFound
            | Self::PersonNotFound
            | Self::FavoriteNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(ref e) = self {
            // Log the cause here; the response body stays generic.
            tracing::error!(error = %e, "internal error");
        }
        let body = serde_json::json!({
            "message": self.to_string(),
            "status_code": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}
