use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Recipe {0} not found")]
    NotFound(i64),

    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn maps_to_status_codes() {
        assert_eq!(AppError::NotFound(3).into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation(vec!["titulo"]).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn validation_lists_fields() {
        let err = AppError::Validation(vec!["titulo", "instrucciones"]);
        assert_eq!(err.to_string(), "Missing required fields: titulo, instrucciones");
    }
}
