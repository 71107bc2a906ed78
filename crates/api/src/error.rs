//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use etims_core::handlers::IntegrationError;
use etims_core::settings::SettingsError;
use etims_core::store::StoreError;
use etims_core::submission::SubmissionError;
use etims_shared::AppError;
use serde_json::json;

/// An [`AppError`] on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.0.is_user_facing() {
            tracing::debug!(error = %self.0, "Request rejected");
        } else {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = match &self.0 {
            AppError::RemoteRejection { code, message } => json!({
                "error": self.0.error_code(),
                "message": message,
                "code": code,
            }),
            other => json!({
                "error": other.error_code(),
                "message": other.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(match err {
            StoreError::NotFound(what) => AppError::NotFound(what),
            StoreError::Backend(msg) => AppError::Database(msg),
        })
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Validation(msg) => Self(AppError::Validation(msg)),
            SettingsError::NotFound(id) => Self(AppError::NotFound(format!("settings {id}"))),
            SettingsError::Initialization(msg) => {
                Self(AppError::Validation(format!("OSCU initialization failed: {msg}")))
            }
            SettingsError::Store(e) => e.into(),
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        let app = match err {
            SubmissionError::Configuration(msg) => AppError::Configuration(msg),
            SubmissionError::Validation(msg) => AppError::Validation(msg),
            SubmissionError::Rejection { code, message } => AppError::RemoteRejection { code, message },
            SubmissionError::Transport(msg) => AppError::Transport(msg),
            SubmissionError::DataIntegrity(msg) => AppError::DataIntegrity(msg),
            SubmissionError::Format(msg) => AppError::Format(msg),
            SubmissionError::Timeout(secs) => AppError::Transport(format!("timed out after {secs}s")),
            SubmissionError::Store(e) => return e.into(),
            SubmissionError::Attempt(e) => from_attempt(e),
        };
        Self(app)
    }
}

/// Maps a logged synchronous failure back onto the taxonomy.
fn from_attempt(err: IntegrationError) -> AppError {
    let IntegrationError { category, message, .. } = err;
    match category {
        "Configuration" => AppError::Configuration(message),
        "Validation" => AppError::Validation(message),
        "Data Integrity" => AppError::DataIntegrity(message),
        "Format" => AppError::Format(message),
        "Remote Rejection" => {
            // Rejections render as "<message> (Code: <code>)".
            match message.rsplit_once(" (Code: ") {
                Some((text, code)) => AppError::RemoteRejection {
                    code: code.trim_end_matches(')').to_string(),
                    message: text.to_string(),
                },
                None => AppError::RemoteRejection {
                    code: String::new(),
                    message,
                },
            }
        }
        "Storage" => AppError::Database(message),
        _ => AppError::Transport(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(category: &'static str, message: &str) -> SubmissionError {
        SubmissionError::Attempt(IntegrationError {
            route: "/BhfSearchReq",
            category,
            message: message.to_string(),
        })
    }

    #[test]
    fn test_attempt_rejection_keeps_vendor_code() {
        let ApiError(err) = attempt("Remote Rejection", "Invalid branch (Code: 901)").into();
        match err {
            AppError::RemoteRejection { code, message } => {
                assert_eq!(code, "901");
                assert_eq!(message, "Invalid branch");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_attempt_timeout_is_transport() {
        let ApiError(err) = attempt("Timeout", "Timed out after 300s").into();
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_store_not_found_is_404() {
        let ApiError(err) = SubmissionError::Store(StoreError::NotFound("Item X".into())).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_validation_is_400() {
        let ApiError(err) = SubmissionError::Validation("no name".into()).into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
