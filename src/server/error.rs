//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::oauth::OAuthError;
use crate::auth::ResolveError;
use crate::catalog::CatalogError;
use crate::webhooks::WebhookError;

/// An error ready to leave the HTTP boundary.
///
/// Bodies are always `{"error": "..."}` with a message safe to show a
/// client: domain errors are mapped to these variants at the `From` impls
/// below, and anything carrying internal detail is reduced to a generic
/// message there.
#[derive(Debug)]
pub enum ApiError {
    /// 400: the request was structurally unusable.
    BadRequest(String),
    /// 401: no usable credential was presented.
    Unauthorized(String),
    /// 403: a credential or proof was presented and rejected.
    Forbidden(String),
    /// 404: the named resource or topic does not exist.
    NotFound(String),
    /// 500: a required downstream step failed.
    Internal(String),
    /// 502: an upstream provider call failed.
    Upstream(String),
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Internal(m)
            | Self::Upstream(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, message = self.message(), "request failed");
        } else {
            tracing::debug!(status = %status, message = self.message(), "request rejected");
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::MissingCredentials | ResolveError::Rejected => {
                Self::Unauthorized("authentication required".to_string())
            }
            ResolveError::InvalidShop => Self::Unauthorized("invalid shop domain".to_string()),
        }
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::InvalidCallback { reason } => Self::BadRequest(reason),
            OAuthError::StateMismatch => {
                Self::Forbidden("state parameter mismatch".to_string())
            }
            OAuthError::InvalidHmac => Self::Forbidden("hmac validation failed".to_string()),
            OAuthError::TokenExchangeFailed { .. } => {
                Self::Internal("token exchange failed".to_string())
            }
        }
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                Self::Unauthorized("webhook verification failed".to_string())
            }
            WebhookError::UnknownTopic { topic } => {
                Self::NotFound(format!("unknown webhook topic '{topic}'"))
            }
            WebhookError::MissingShopDomain => {
                Self::BadRequest("missing shop domain header".to_string())
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        tracing::warn!(error = %err, "catalog read failed");
        Self::Upstream("product listing unavailable".to_string())
    }
}
