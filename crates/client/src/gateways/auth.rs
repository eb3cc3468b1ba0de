//! Login, logout, registration and token refresh.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use shopvely_core::Email;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{RefreshedToken, RegisteredUser, TokenPair};
use crate::session::Session;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Exchange credentials for a token pair and store the new session.
///
/// # Errors
///
/// Returns `ApiError::InvalidCredentials` if the server refuses the
/// credentials, `ApiError::InvalidInput` if either is blank.
#[instrument(skip(api, password), fields(username = %username))]
pub async fn login(
    api: &ApiClient,
    username: &str,
    password: &SecretString,
) -> Result<Session, ApiError> {
    let username = username.trim();
    if username.is_empty() || password.expose_secret().is_empty() {
        return Err(ApiError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }

    let pair: TokenPair = api
        .post(
            "/token/",
            &LoginRequest {
                username,
                password: password.expose_secret(),
            },
        )
        .await
        .map_err(|e| match e {
            ApiError::Unauthorized => ApiError::InvalidCredentials,
            other => other,
        })?;

    let session = Session::new(pair.access, pair.refresh, username);
    api.session().set(session.clone())?;
    tracing::info!("Logged in");
    Ok(session)
}

/// Forget the session. Purely local; the server keeps no session state.
///
/// # Errors
///
/// Returns `ApiError::Storage` if the persisted copy cannot be removed. The
/// in-memory session is cleared regardless.
pub fn logout(api: &ApiClient) -> Result<(), ApiError> {
    api.session().clear()?;
    tracing::info!("Logged out");
    Ok(())
}

/// Create an account. Does not log in.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a malformed email,
/// `ApiError::Validation` for field errors from the server (taken username,
/// weak password).
#[instrument(skip(api, password), fields(username = %username))]
pub async fn register(
    api: &ApiClient,
    username: &str,
    email: &str,
    password: &SecretString,
) -> Result<RegisteredUser, ApiError> {
    let email = Email::parse(email).map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    api.post(
        "/users/register/",
        &RegisterRequest {
            username: username.trim(),
            email: email.as_str(),
            password: password.expose_secret(),
        },
    )
    .await
}

/// Trade the refresh token for a new access token.
///
/// Only called on request; the client never refreshes behind the caller's
/// back. A rejected refresh token is a 401 and logs the user out.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` when there is no refresh token,
/// `ApiError::Unauthorized` when the server rejects it.
#[instrument(skip(api))]
pub async fn refresh(api: &ApiClient) -> Result<Session, ApiError> {
    let current = api.session().get();
    let Some(refresh_token) = current.refresh_token.clone() else {
        return Err(ApiError::InvalidInput("Not logged in".to_string()));
    };

    let refreshed: RefreshedToken = api
        .post(
            "/token/refresh/",
            &RefreshRequest {
                refresh: refresh_token.expose_secret(),
            },
        )
        .await?;

    let session = Session {
        access_token: Some(SecretString::from(refreshed.access)),
        refresh_token: Some(refreshed.refresh.map_or(refresh_token, SecretString::from)),
        username: current.username,
    };
    api.session().set(session.clone())?;
    tracing::debug!("Access token refreshed");
    Ok(session)
}
