use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ProcuraError {
    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("File ingestion error: {message}")]
    FileIngestion { message: String },

    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ProcuraError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_ingestion(message: impl Into<String>) -> Self {
        Self::FileIngestion {
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database { .. } => "DATABASE_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::FileIngestion { .. } => "FILE_INGESTION_ERROR",
            Self::Precondition { .. } => "PRECONDITION_FAILED",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Database { .. } => 500,
            Self::Validation { .. } => 400,
            Self::FileIngestion { .. } => 400,
            Self::Precondition { .. } => 400,
            Self::ExternalService { .. } => 502,
            Self::Configuration { .. } => 500,
            Self::NotFound { .. } => 404,
            Self::Internal { .. } => 500,
        }
    }
}

pub type ProcuraResult<T> = Result<T, ProcuraError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub details: Option<serde_json::Value>,
}

impl From<ProcuraError> for ErrorResponse {
    fn from(error: ProcuraError) -> Self {
        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            details: None,
        }
    }
}

// Conversion from common error types
impl From<sqlx::Error> for ProcuraError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string())
    }
}

impl From<serde_json::Error> for ProcuraError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_status() {
        let error = ProcuraError::validation("title", "too short");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.http_status_code(), 400);

        let error = ProcuraError::not_found("Analysis");
        assert_eq!(error.http_status_code(), 404);

        let error = ProcuraError::external_service("AI Analyzer", "timed out");
        assert_eq!(error.http_status_code(), 502);
    }

    #[test]
    fn test_error_response_carries_code() {
        let response: ErrorResponse = ProcuraError::precondition("no suppliers to analyze").into();
        assert_eq!(response.code, "PRECONDITION_FAILED");
        assert!(response.error.contains("no suppliers"));
    }
}
