//! Account settings.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::{ApiError, FieldErrors};
use crate::models::Ack;

#[derive(Serialize)]
struct ChangePassword<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

/// Change the logged-in user's password. The current session stays valid.
///
/// # Errors
///
/// Returns `ApiError::Validation` with per-field messages, e.g. a wrong
/// `old_password` or a `new_password` the server's validators reject.
#[instrument(skip_all)]
pub async fn change_password(
    api: &ApiClient,
    old_password: &SecretString,
    new_password: &SecretString,
) -> Result<Ack, ApiError> {
    api.post(
        "/users/change-password/",
        &ChangePassword {
            old_password: old_password.expose_secret(),
            new_password: new_password.expose_secret(),
        },
    )
    .await
}

/// A password change form that passed the local checks.
pub struct PasswordChange {
    current: SecretString,
    new: SecretString,
}

impl PasswordChange {
    /// Check that every field is filled and the confirmation matches.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` describing the first problem.
    pub fn new(
        current: SecretString,
        new: SecretString,
        confirm: &SecretString,
    ) -> Result<Self, ApiError> {
        if [&current, &new, confirm]
            .iter()
            .any(|field| field.expose_secret().is_empty())
        {
            return Err(ApiError::Validation(FieldErrors::with_detail(
                "Please fill all password fields.",
            )));
        }
        if new.expose_secret() != confirm.expose_secret() {
            let mut errors = FieldErrors::default();
            errors.push(
                "new_password",
                "New password and confirm password do not match.",
            );
            return Err(ApiError::Validation(errors));
        }
        Ok(Self { current, new })
    }

    /// Send the change.
    ///
    /// # Errors
    ///
    /// See [`change_password`].
    pub async fn submit(&self, api: &ApiClient) -> Result<Ack, ApiError> {
        change_password(api, &self.current, &self.new).await
    }
}
