//! Mapping from domain errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use divvy_core::balance::BalanceError;
use divvy_core::expense::ExpenseError;
use divvy_core::settlement::SettlementError;
use divvy_core::split::SplitError;
use divvy_db::repositories::{GroupError, UserError};
use divvy_shared::AppError;
use divvy_shared::types::MoneyError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

/// An error ready to be rendered as `{"error": CODE, "message": text}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 400 with the `VALIDATION_ERROR` code.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    /// 404 with the given code.
    #[must_use]
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    /// Builds an error from a domain status code and error code.
    ///
    /// Server errors are logged and their details withheld from the client.
    fn from_domain(status: u16, code: &'static str, message: String) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code, error = %message, "Request failed");
            return Self::new(status, code, "An error occurred");
        }
        Self::new(status, code, message)
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::from_domain(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        Self::from_domain(500, "DATABASE_ERROR", e.to_string())
    }
}

impl From<SplitError> for ApiError {
    fn from(e: SplitError) -> Self {
        Self::from_domain(e.http_status_code(), e.error_code(), e.to_string())
    }
}

impl From<ExpenseError> for ApiError {
    fn from(e: ExpenseError) -> Self {
        Self::from_domain(e.http_status_code(), e.error_code(), e.to_string())
    }
}

impl From<SettlementError> for ApiError {
    fn from(e: SettlementError) -> Self {
        Self::from_domain(e.http_status_code(), e.error_code(), e.to_string())
    }
}

impl From<BalanceError> for ApiError {
    fn from(e: BalanceError) -> Self {
        Self::from_domain(e.http_status_code(), e.error_code(), e.to_string())
    }
}

impl From<GroupError> for ApiError {
    fn from(e: GroupError) -> Self {
        Self::from_domain(e.http_status_code(), e.error_code(), e.to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        Self::from_domain(e.http_status_code(), e.error_code(), e.to_string())
    }
}

impl From<MoneyError> for ApiError {
    fn from(e: MoneyError) -> Self {
        Self::validation(e.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divvy_shared::types::{GroupId, Money};
    use http_body_util::BodyExt;
    use rstest::rstest;

    #[rstest]
    #[case::split(SplitError::NoParticipants.into(), StatusCode::BAD_REQUEST, "NO_PARTICIPANTS")]
    #[case::unbalanced(
        SplitError::Unbalanced { expected: Money::from_cents(100), actual: Money::from_cents(99) }.into(),
        StatusCode::UNPROCESSABLE_ENTITY,
        "SPLIT_UNBALANCED"
    )]
    #[case::settlement(SettlementError::SamePayerPayee.into(), StatusCode::BAD_REQUEST, "SAME_PAYER_PAYEE")]
    #[case::group_missing(
        BalanceError::GroupNotFound(GroupId::new()).into(),
        StatusCode::NOT_FOUND,
        "GROUP_NOT_FOUND"
    )]
    #[case::duplicate_email(
        UserError::DuplicateEmail("a@example.com".into()).into(),
        StatusCode::CONFLICT,
        "DUPLICATE_EMAIL"
    )]
    #[case::stored_invariant(
        AppError::Internal("split sum mismatch".into()).into(),
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR"
    )]
    fn test_domain_errors_map_to_status(
        #[case] err: ApiError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        assert_eq!(err.status(), status);
        assert_eq!(err.code(), code);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err: ApiError = AppError::Database("connection refused on 10.0.0.3".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "An error occurred");
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::validation("name is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "name is required");
    }
}
