//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use soundctl_domain::error::{SoundCtlError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    error: String,
}

/// Maps [`SoundCtlError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(SoundCtlError);

impl From<SoundCtlError> for ApiError {
    fn from(err: SoundCtlError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ValidationError::Malformed(rejection.body_text()).into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SoundCtlError::Validation(_) => StatusCode::BAD_REQUEST,
            SoundCtlError::HardwareUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SoundCtlError::Configuration(err) => {
                tracing::error!(error = %err, "configuration error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            kind: self.0.kind(),
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use soundctl_domain::error::{ConfigurationError, HardwareError};
    use soundctl_domain::id::OutputId;

    async fn render(err: SoundCtlError) -> (StatusCode, serde_json::Value) {
        let response = ApiError::from(err).into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn should_map_validation_to_bad_request() {
        let (status, body) = render(ValidationError::StepOutOfRange(0).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");
    }

    #[tokio::test]
    async fn should_map_hardware_failure_to_service_unavailable() {
        let output = OutputId::new("Headphone").unwrap();
        let (status, body) = render(HardwareError::OutputNotFound { output }.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["kind"], "hardware_unavailable");
        assert_eq!(
            body["error"],
            "hardware unavailable: output Headphone no longer exists"
        );
    }

    #[tokio::test]
    async fn should_map_configuration_to_internal_error() {
        let (status, body) = render(ConfigurationError::NoOutputs.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "configuration_error");
    }
}
