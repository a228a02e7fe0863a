//! Report errors and their HTTP mapping.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use std::fmt;
use validator::ValidationErrors;

/// Business failures a report operation can end with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ReportNotFound,
    ArticleNotFound,
    ReplyNotFound,
    UserNotFound,
    ReportTypeBadRequest,
    SelfReport,
    DuplicatedReport,
}

impl ErrorCode {
    /// Stable identifier handed to clients.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::ReportNotFound => "REPORT_NOT_FOUND",
            ErrorCode::ArticleNotFound => "ARTICLE_NOT_FOUND",
            ErrorCode::ReplyNotFound => "REPLY_NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::ReportTypeBadRequest => "REPORT_TYPE_BAD_REQUEST",
            ErrorCode::SelfReport => "SELF_REPORT",
            ErrorCode::DuplicatedReport => "DUPLICATED_REPORT",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ReportNotFound
            | ErrorCode::ArticleNotFound
            | ErrorCode::ReplyNotFound
            | ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ReportTypeBadRequest | ErrorCode::SelfReport => StatusCode::BAD_REQUEST,
            ErrorCode::DuplicatedReport => StatusCode::CONFLICT,
        }
    }

    /// Default English message. Localized text is chosen by the web layer.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::ReportNotFound => "Report not found",
            ErrorCode::ArticleNotFound => "Article not found",
            ErrorCode::ReplyNotFound => "Reply not found",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::ReportTypeBadRequest => "Unsupported report type",
            ErrorCode::SelfReport => "You cannot report your own content",
            ErrorCode::DuplicatedReport => "You have already reported this content",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned by every report operation.
#[derive(Debug)]
pub enum ReportError {
    /// A lookup or validation rule rejected the request
    Business(ErrorCode),
    /// The command failed field validation
    Invalid(ValidationErrors),
    /// The store could not complete a query
    Database(DbErr),
}

impl ReportError {
    /// The business code, if this is a business failure.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ReportError::Business(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Business(code) => write!(f, "{}: {}", code.code(), code.message()),
            ReportError::Invalid(e) => write!(f, "Invalid report: {}", e),
            ReportError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Business(_) => None,
            ReportError::Invalid(e) => Some(e),
            ReportError::Database(e) => Some(e),
        }
    }
}

impl From<ErrorCode> for ReportError {
    fn from(code: ErrorCode) -> Self {
        ReportError::Business(code)
    }
}

impl From<DbErr> for ReportError {
    fn from(e: DbErr) -> Self {
        ReportError::Database(e)
    }
}

impl From<ValidationErrors> for ReportError {
    fn from(e: ValidationErrors) -> Self {
        ReportError::Invalid(e)
    }
}

impl ResponseError for ReportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReportError::Business(code) => code.status(),
            ReportError::Invalid(_) => StatusCode::BAD_REQUEST,
            ReportError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (code, message) = match self {
            ReportError::Business(code) => (code.code(), code.message().to_string()),
            ReportError::Invalid(e) => ("INVALID_REPORT", e.to_string()),
            ReportError::Database(e) => {
                log::error!("Report request failed on the database: {}", e);
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "code": code,
            "message": message,
        }))
    }
}
