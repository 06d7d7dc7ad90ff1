use crate::ui::escape_html;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt;

/// Application-specific error types.
///
/// Unavailability of the scoring API is not an error: the client reports it
/// as an absent value and pages render around it. These variants cover the
/// console's own failures.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Bad request error (invalid form input).
    BadRequest(String),
    /// Error setting up the scoring API client.
    ExternalApiError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Renders the error as a minimal HTML page.
    ///
    /// Bad requests echo their message back to the user; server-side
    /// failures are logged and shown with a generic message.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "External service error".to_string(),
                )
            }
        };

        let body = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>CreditLens - {code}</title></head>
<body>
  <h1>{code}</h1>
  <p class="error">{message}</p>
  <p><a href="/dashboard">Back to dashboard</a></p>
</body>
</html>
"#,
            code = status.as_u16(),
            message = escape_html(&error_message),
        );

        (status, Html(body)).into_response()
    }
}
