//! HTTP mapping for [`EcommerceError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::EcommerceError;

impl EcommerceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EcommerceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Server-side failures are logged in full and hidden from the client.
        let message = match &self {
            Self::Storage(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(EcommerceError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(EcommerceError::InvalidCredentials("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(EcommerceError::from(StoreError::Duplicate { field: "email" }).status_code(), StatusCode::CONFLICT);
        assert_eq!(EcommerceError::from(StoreError::Corrupt("row".into())).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
