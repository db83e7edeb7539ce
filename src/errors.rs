use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(entity) => AppError::NotFound(entity.to_string()),
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Timeout(_) => AppError::Timeout,
            other @ (DomainError::AggregationFailed(_)
            | DomainError::DecodeFailed(_)
            | DomainError::Internal(_)) => AppError::Internal(other.to_string()),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(detail) => {
                log::error!("{}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use std::time::Duration;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("invoice".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_returns_400() {
        let resp = AppError::BadRequest("no fields to update".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn timeout_returns_504() {
        assert_eq!(AppError::Timeout.error_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_display() {
        assert_eq!(AppError::NotFound("menu".to_string()).to_string(), "menu not found");
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::NotFound("order").into();
        assert!(matches!(app_err, AppError::NotFound(ref e) if e == "order"));
    }

    #[test]
    fn domain_invalid_input_maps_to_bad_request() {
        let app_err: AppError = DomainError::InvalidInput("bad value".to_string()).into();
        assert!(matches!(app_err, AppError::BadRequest(_)));
    }

    #[test]
    fn domain_timeout_maps_to_timeout() {
        let app_err: AppError = DomainError::Timeout(Duration::from_secs(100)).into();
        assert!(matches!(app_err, AppError::Timeout));
    }

    #[test]
    fn aggregation_and_decode_failures_are_internal() {
        for err in [
            DomainError::AggregationFailed("store down".to_string()),
            DomainError::DecodeFailed("bad row".to_string()),
        ] {
            assert!(matches!(AppError::from(err), AppError::Internal(_)));
        }
    }
}
