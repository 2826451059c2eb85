//! Application-wide error types.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Agency mismatches are reported as `NotFound`, never as a distinct
/// "forbidden", so tenants cannot discover each other's records.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (or outside the caller's agency).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Structural or business-rule validation failure.
    #[error("Validation error: {message}")]
    Validation {
        /// Machine-readable rule code, e.g. `SUM_MISMATCH`.
        code: String,
        /// Human-readable message.
        message: String,
        /// Rule-specific context (amounts, days, positions).
        details: serde_json::Value,
    },

    /// Conflict (e.g., duplicate schedule for an activity).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Serializable error payload handed to transport layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured context.
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl AppError {
    /// Builds a validation error without extra details.
    #[must_use]
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            code: code.into(),
            message: message.into(),
            details: serde_json::Value::Null,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation { .. } => 400,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation { code, .. } => code,
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Converts the error into a serializable body.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        let (message, details) = match self {
            Self::Validation {
                message, details, ..
            } => (message.clone(), details.clone()),
            other => (other.to_string(), serde_json::Value::Null),
        };
        ErrorBody {
            code: self.error_code().to_string(),
            message,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::validation("X", "y").status_code(), 400);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::validation("SUM_MISMATCH", "bad").error_code(),
            "SUM_MISMATCH"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::validation("X", "msg").to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Conflict("msg".into()).to_string(),
            "Conflict: msg"
        );
    }

    #[test]
    fn test_validation_body_carries_details() {
        let err = AppError::Validation {
            code: "PAYMENT_TOO_SMALL".into(),
            message: "Payment below minimum".into(),
            details: json!({ "amountCents": 99 }),
        };

        let body = err.to_body();
        assert_eq!(body.code, "PAYMENT_TOO_SMALL");
        assert_eq!(body.details["amountCents"], 99);

        let serialized = serde_json::to_value(&body).unwrap();
        assert_eq!(serialized["message"], "Payment below minimum");
    }

    #[test]
    fn test_non_validation_body_omits_details() {
        let body = AppError::Conflict("exists".into()).to_body();
        let serialized = serde_json::to_value(&body).unwrap();
        assert_eq!(serialized["code"], "CONFLICT");
        assert!(serialized.get("details").is_none());
    }
}
