use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::core::errors::ShopkeeperError;

/// `{ok, msg?, value?}` body shared by every `/api/store` answer.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn ok(value: impl Serialize) -> Self {
        Self {
            ok: true,
            msg: None,
            value: serde_json::to_value(value).ok(),
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            msg: Some(msg.into()),
            value: None,
        }
    }
}

impl ShopkeeperError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ShopNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidType { .. }
            | Self::InvalidField { .. }
            | Self::InvalidName
            | Self::InvalidAmount => StatusCode::BAD_REQUEST,
            Self::QuotaExceeded { .. } => StatusCode::CONFLICT,
            Self::Unauthorized | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::UpstreamFailure { .. } => StatusCode::BAD_GATEWAY,
            Self::InvalidConfig { .. }
            | Self::StorageError { .. }
            | Self::AuditError { .. }
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ShopkeeperError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(ApiResponse::failure(self.user_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        assert_eq!(
            ShopkeeperError::ShopNotFound { id: 1 }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ShopkeeperError::QuotaExceeded {
                field: "mentionHere".into(),
                remaining: 0,
                requested: 1
            }
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ShopkeeperError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ShopkeeperError::AuditError { detail: "x".into() }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn failure_body_shape() {
        let body = serde_json::to_value(ApiResponse::failure("❌")).unwrap();
        assert_eq!(body, serde_json::json!({"ok": false, "msg": "❌"}));
    }
}
