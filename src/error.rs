use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request path outside the configured app context
    #[error("404 only configured to deliver from {context}")]
    PathNotAllowed { context: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::PathNotAllowed { .. } => StatusCode::NOT_FOUND,
        };

        // String bodies are sent as text/plain; charset=utf-8
        (status, self.to_string()).into_response()
    }
}
