//! Unified error handling for the storefront API.
//!
//! Every gateway returns `Result<T, ApiError>`. Errors fall into three
//! classes (see [`ErrorKind`]): an authentication failure has already torn the
//! session down by the time the caller sees it, a validation failure carries
//! per-field messages for inline display, and everything else is a generic
//! failure shown as an alert.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::session::StorageError;

/// Detail message the API uses for a duplicate wishlist add.
pub const ALREADY_IN_WISHLIST_DETAIL: &str = "Product already in wishlist";

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API rejected the credential. The session has been cleared.
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// Login was refused.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Structured per-field validation errors.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Product is already in the wishlist.
    #[error("Product already in wishlist")]
    AlreadyInWishlist,

    /// Any other non-success response.
    #[error("{detail} (HTTP {status})")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// `detail` from the body, or a generic message.
        detail: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Persisting the session failed.
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// Rejected locally before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// The three classes of failure a view distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Session invalid or expired; global teardown already happened.
    Authentication,
    /// Field errors to show next to the offending inputs.
    Validation,
    /// Network, server or unexpected failure; shown as an alert.
    Failure,
}

impl ApiError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::Authentication,
            Self::Validation(_) | Self::InvalidInput(_) | Self::InvalidCredentials => {
                ErrorKind::Validation
            }
            _ => ErrorKind::Failure,
        }
    }

    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Message suitable for an alert. Falls back to `fallback` for failures
    /// whose details are not meant for end users.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { detail, .. } => detail.clone(),
            Self::Validation(errors) => errors.to_string(),
            Self::Http(_) | Self::Parse(_) | Self::Storage(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }

    /// Build an error from a non-success, non-401 response body.
    ///
    /// A body with field keys other than `detail` is a validation error;
    /// otherwise its `detail` (if any) becomes the message.
    #[must_use]
    pub fn from_response_body(status: StatusCode, body: &[u8]) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();

        if let Some(Value::Object(map)) = &parsed {
            let errors = FieldErrors::from_json_object(map);
            if errors.has_field_errors() {
                return Self::Validation(errors);
            }
            if let Some(detail) = errors.detail() {
                if status == StatusCode::BAD_REQUEST && detail == ALREADY_IN_WISHLIST_DETAIL {
                    return Self::AlreadyInWishlist;
                }
                return Self::Status {
                    status,
                    detail: detail.to_string(),
                };
            }
        }

        Self::Status {
            status,
            detail: status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        }
    }
}

/// Per-field validation messages, as returned by the API on HTTP 400.
///
/// ```json
/// { "old_password": ["Old password is incorrect."], "detail": "..." }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
    detail: Option<String>,
}

impl FieldErrors {
    /// Key the API uses for non-field messages.
    pub const DETAIL: &'static str = "detail";

    /// Errors with only a non-field message.
    #[must_use]
    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            detail: Some(detail.into()),
        }
    }

    /// Add a message for a field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Messages for one field.
    #[must_use]
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first message to show: the first field message, else the detail.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .values()
            .flat_map(|messages| messages.iter())
            .map(String::as_str)
            .next()
            .or(self.detail.as_deref())
    }

    /// All fields with messages.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The non-field `detail` message.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Whether any field-specific message is present.
    #[must_use]
    pub fn has_field_errors(&self) -> bool {
        !self.fields.is_empty()
    }

    fn from_json_object(map: &serde_json::Map<String, Value>) -> Self {
        let mut errors = Self::default();
        for (key, value) in map {
            let messages = messages_of(value);
            if key == Self::DETAIL || key == "non_field_errors" {
                if let Some(first) = messages.into_iter().next() {
                    errors.detail.get_or_insert(first);
                }
            } else if !messages.is_empty() {
                errors.fields.insert(key.clone(), messages);
            }
        }
        errors
    }
}

/// Flatten a JSON error value into messages.
fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(messages_of).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect();
        if let Some(detail) = &self.detail {
            parts.push(detail.clone());
        }
        if parts.is_empty() {
            return f.write_str("(no details provided)");
        }
        f.write_str(&parts.join("; "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_from_body() {
        let body = br#"{"old_password": ["Old password is incorrect."], "new_password": ["Too short.", "Too common."]}"#;
        let err = ApiError::from_response_body(StatusCode::BAD_REQUEST, body);

        let ApiError::Validation(errors) = &err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.field("old_password"), ["Old password is incorrect."]);
        assert_eq!(errors.field("new_password").len(), 2);
        assert!(errors.field("username").is_empty());
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_detail_only_body_is_status_error() {
        let err =
            ApiError::from_response_body(StatusCode::NOT_FOUND, br#"{"detail": "Address not found"}"#);
        assert!(matches!(
            &err,
            ApiError::Status { status, detail }
                if *status == StatusCode::NOT_FOUND && detail == "Address not found"
        ));
        assert_eq!(err.kind(), ErrorKind::Failure);
        assert_eq!(err.user_message("fallback"), "Address not found");
    }

    #[test]
    fn test_duplicate_wishlist_add() {
        let err = ApiError::from_response_body(
            StatusCode::BAD_REQUEST,
            br#"{"detail": "Product already in wishlist"}"#,
        );
        assert!(matches!(err, ApiError::AlreadyInWishlist));
    }

    #[test]
    fn test_non_json_body_uses_reason_phrase() {
        let err = ApiError::from_response_body(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(err.to_string(), "Bad Gateway (HTTP 502 Bad Gateway)");
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn test_unauthorized_kind() {
        assert_eq!(ApiError::Unauthorized.kind(), ErrorKind::Authentication);
        assert_eq!(
            ApiError::Unauthorized.status(),
            Some(StatusCode::UNAUTHORIZED)
        );
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::default();
        errors.push("new_password", "Too short.");
        assert_eq!(errors.to_string(), "new_password: Too short.");
        assert_eq!(FieldErrors::default().to_string(), "(no details provided)");
        assert_eq!(errors.first_message(), Some("Too short."));
        assert_eq!(
            FieldErrors::with_detail("Please fill all password fields.").first_message(),
            Some("Please fill all password fields.")
        );
    }
}
