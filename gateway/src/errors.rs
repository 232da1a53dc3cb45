use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid YouTube link")]
    InvalidLink,

    #[error("{0}")]
    NotFound(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, &'static str, String) {
        match self {
            AppError::MissingParameter(name) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "missing_parameter",
                format!("missing required query parameter '{}'", name),
            ),
            AppError::InvalidLink => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "invalid_link",
                "link does not contain a YouTube video id".to_string(),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found_error",
                "not_found",
                what.clone(),
            ),
            AppError::NotConfigured(what) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "configuration_error",
                "not_configured",
                format!("{} is not configured on this deployment", what),
            ),
            AppError::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                "upstream_failed",
                e.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = self.parts();

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MissingParameter("username").parts().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InvalidLink.parts().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound("user not found".into()).parts().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NotConfigured("YT_API_KEY").parts().0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Upstream("boom".into()).parts().0,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let (status, _, code, msg) =
            AppError::Internal(anyhow::anyhow!("secret connection string")).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "internal_server_error");
        assert!(!msg.contains("secret"));
    }

    #[test]
    fn test_missing_parameter_names_the_parameter() {
        let (_, error_type, code, msg) = AppError::MissingParameter("link").parts();
        assert_eq!(error_type, "invalid_request_error");
        assert_eq!(code, "missing_parameter");
        assert!(msg.contains("'link'"));
    }
}
