use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Login failures. Each role gets its own message so the portal can show
/// the right hint; none of them leak whether the identifier exists.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid {role} passcode")]
    InvalidPasscode { role: String },

    #[error("Invalid access code")]
    InvalidAccessCode,

    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Payment batch lifecycle errors
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Batch not found: {0}")]
    NotFound(Uuid),

    #[error("No records selected")]
    EmptySelection,

    #[error("Performance record not found: {0}")]
    RecordNotFound(Uuid),

    #[error("Record {0} already belongs to a batch")]
    AlreadyBatched(Uuid),

    #[error("Record {0} is already paid")]
    RecordAlreadyPaid(Uuid),

    #[error("Batch {0} has already been settled")]
    AlreadySettled(Uuid),

    #[error("Batch {batch_id} attached {attached} of {selected} records")]
    PartialAttach {
        batch_id: Uuid,
        selected: usize,
        attached: u64,
    },

    #[error("Batch {0} does not belong to this client")]
    WrongClient(Uuid),
}

/// API error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::Auth(err) => (
                StatusCode::UNAUTHORIZED,
                match err {
                    AuthError::InvalidPasscode { .. } => "INVALID_PASSCODE",
                    AuthError::InvalidAccessCode => "INVALID_ACCESS_CODE",
                    AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
                },
                err.to_string(),
                None,
            ),
            AppError::Batch(BatchError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                "BATCH_NOT_FOUND",
                format!("Batch not found: {}", id),
                None,
            ),
            AppError::Batch(BatchError::EmptySelection) => (
                StatusCode::BAD_REQUEST,
                "EMPTY_SELECTION",
                "At least one unbatched record must be selected".to_string(),
                None,
            ),
            AppError::Batch(BatchError::RecordNotFound(id)) => (
                StatusCode::BAD_REQUEST,
                "RECORD_NOT_FOUND",
                format!("Performance record not found: {}", id),
                None,
            ),
            AppError::Batch(BatchError::AlreadyBatched(id)) => (
                StatusCode::CONFLICT,
                "RECORD_ALREADY_BATCHED",
                format!("Record {} already belongs to a batch", id),
                Some(serde_json::json!({ "record_id": id })),
            ),
            AppError::Batch(BatchError::RecordAlreadyPaid(id)) => (
                StatusCode::CONFLICT,
                "RECORD_ALREADY_PAID",
                format!("Record {} is already paid", id),
                Some(serde_json::json!({ "record_id": id })),
            ),
            AppError::Batch(BatchError::AlreadySettled(id)) => (
                StatusCode::CONFLICT,
                "BATCH_ALREADY_SETTLED",
                format!("Batch {} has already been settled", id),
                None,
            ),
            AppError::Batch(BatchError::PartialAttach {
                batch_id,
                selected,
                attached,
            }) => (
                // The batch row exists but some records were claimed by a
                // competing operation. Surfaced, never rolled back.
                StatusCode::CONFLICT,
                "BATCH_PARTIAL_ATTACH",
                format!(
                    "Batch {} attached {} of {} selected records",
                    batch_id, attached, selected
                ),
                Some(serde_json::json!({
                    "batch_id": batch_id,
                    "selected": selected,
                    "attached": attached,
                })),
            ),
            AppError::Batch(BatchError::WrongClient(id)) => (
                StatusCode::FORBIDDEN,
                "BATCH_WRONG_CLIENT",
                format!("Batch {} does not belong to this client", id),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
            AppError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                msg.clone(),
                None,
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                None,
            ),
            AppError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let detail = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| e.message.as_ref().map(|m| m.to_string()).unwrap_or_default())
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect::<Vec<String>>()
            .join("; ");

        AppError::InvalidInput(format!("Validation failed: {}", detail))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal(format!("{:?}", error))
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        AppError::Internal(format!("Migration error: {:?}", error))
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
