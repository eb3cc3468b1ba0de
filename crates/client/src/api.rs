//! Storefront REST API client.
//!
//! One [`ApiClient`] is shared by every gateway. It owns the HTTP client and
//! the base URL, attaches the bearer token from the [`SessionStore`] to each
//! request, and runs the session guard on each response.
//!
//! # Session guard
//!
//! Any 401, from any endpoint, clears the session and then asks the
//! [`Navigator`] for [`Route::Login`]. The caller gets
//! [`ApiError::Unauthorized`]. Other failures leave the session alone and are
//! decoded into [`ApiError::Validation`] or [`ApiError::Status`].

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::navigation::{Navigator, Route};
use crate::session::SessionStore;

/// Storefront API client.
///
/// Cheap to clone; clones share the HTTP connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    /// Base URL without a trailing slash, e.g. `http://localhost:8000/api`
    base_url: String,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

/// A successful non-JSON response body.
#[derive(Debug, Clone)]
pub struct TextBody {
    pub content_type: Option<String>,
    pub text: String,
}

impl ApiClient {
    /// Create a client for the configured API.
    ///
    /// No overall request timeout is set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.clone(),
                session,
                navigator,
            }),
        })
    }

    /// The session this client reads tokens from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Absolute URL for an API path such as `/cart/`.
    ///
    /// The path is appended verbatim so the base path is kept.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // JSON Requests
    // =========================================================================

    /// `GET` and decode.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status or a body
    /// that does not decode.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    /// `POST` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self, body))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.request(Method::POST, path).json(body))
            .await?;
        decode(response).await
    }

    /// `POST` with no body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::POST, path)).await?;
        decode(response).await
    }

    /// `PATCH` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self, body))]
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.request(Method::PATCH, path).json(body))
            .await?;
        decode(response).await
    }

    /// `DELETE` with a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self, body))]
    pub async fn delete_with<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.request(Method::DELETE, path).json(body))
            .await?;
        decode(response).await
    }

    /// `DELETE` a resource, ignoring any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// `GET` a non-JSON document.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn get_text(&self, path: &str) -> Result<TextBody, ApiError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await?;
        Ok(TextBody { content_type, text })
    }

    // =========================================================================
    // Request Pipeline
    // =========================================================================

    /// Build a request, attaching the current access token if there is one.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.inner.http.request(method, self.url(path));
        match self.inner.session.access_token() {
            Some(token) => builder.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => builder,
        }
    }

    /// Send a request and run the session guard on the response.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Request failed before a response arrived");
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session(response.url().path());
            return Err(ApiError::Unauthorized);
        }

        let body = response.bytes().await?;
        let error = ApiError::from_response_body(status, &body);
        tracing::debug!(%status, error = %error, "API returned an error");
        Err(error)
    }

    /// Tear the session down and send the user to the login view.
    fn expire_session(&self, path: &str) {
        tracing::info!(path, "Received 401, clearing session");
        // A failed file removal has already been logged; the in-memory
        // session is gone either way.
        let _ = self.inner.session.clear();
        self.inner.navigator.navigate(Route::Login);
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

/// Decode a successful response body as JSON.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
