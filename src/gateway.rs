// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated request gateway for the BPRS backend.
//!
//! Handles:
//! - Attaching the stored access token as a bearer credential
//! - One refresh-and-retry cycle when the backend answers 401
//! - Clearing the session when re-authentication is impossible
//! - Mapping failures to [`ClientError`]

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{RefreshRequest, RefreshResponse};
use crate::storage::TokenStore;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Fallback message for failed requests whose body carries no `detail`.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Position in the at-most-one-retry sequence of a single logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    /// First send. A 401 here may trigger a refresh.
    Initial,
    /// Send after a successful refresh. Its outcome is final.
    Final,
}

/// HTTP gateway that owns token attachment and refresh.
#[derive(Clone)]
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiGateway {
    /// Create a gateway from client configuration.
    pub fn new(config: &Config, tokens: TokenStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http, &config.api_base_url, tokens))
    }

    /// Create a gateway around an existing HTTP client.
    pub fn with_client(http: reqwest::Client, base_url: &str, tokens: TokenStore) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ─── Authenticated Requests ──────────────────────────────────────────────

    /// Send one logical request with transparent re-authentication.
    ///
    /// Returns the JSON body (`null` for an empty body) on success.
    pub async fn authenticated_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.request_json(method, path, body, GENERIC_FAILURE).await
    }

    /// Typed variant of [`authenticated_request`](Self::authenticated_request).
    ///
    /// `fallback` is the user-facing message when a failed response has no
    /// `detail` field.
    pub async fn request_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        fallback: &str,
    ) -> Result<T> {
        let mut attempt = Attempt::Initial;

        loop {
            let response = self.send(method.clone(), path, body).await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return check_response_json(response, fallback).await;
            }

            // Initial → Final only through a successful refresh; there is no
            // transition out of Final.
            attempt = match attempt {
                Attempt::Initial if self.try_refresh_token().await => {
                    tracing::debug!(path, "Access token refreshed, retrying request");
                    Attempt::Final
                }
                Attempt::Initial => {
                    tracing::info!(path, "Refresh failed, clearing session");
                    return self.expire_session();
                }
                Attempt::Final => {
                    tracing::warn!(path, "Still unauthorized after refresh, clearing session");
                    return self.expire_session();
                }
            };
        }
    }

    fn expire_session<T>(&self) -> Result<T> {
        self.tokens.clear();
        Err(ClientError::SessionExpired)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let mut request = self.http.request(method.clone(), self.url(path));

        if let Some(access_token) = self.tokens.access_token() {
            request = request.bearer_auth(access_token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "Request failed without response");
            ClientError::Network(e.to_string())
        })?;

        tracing::debug!(%method, path, status = response.status().as_u16(), "API response");
        Ok(response)
    }

    // ─── Token Refresh ───────────────────────────────────────────────────────

    /// Exchange the stored refresh token for new tokens.
    ///
    /// Returns `false` without any network call when no refresh token is
    /// stored. Never clears tokens itself; the caller decides.
    pub async fn try_refresh_token(&self) -> bool {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            tracing::debug!("No refresh token stored, skipping refresh");
            return false;
        };

        let response = match self
            .http
            .post(self.url("/auth/refresh"))
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::info!(status = response.status().as_u16(), "Token refresh rejected");
            return false;
        }

        match response.json::<RefreshResponse>().await {
            Ok(tokens) => {
                self.tokens
                    .save(&tokens.access_token, tokens.refresh_token.as_deref());
                tracing::info!(rotated = tokens.refresh_token.is_some(), "Tokens refreshed");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse refresh response");
                false
            }
        }
    }

    // ─── Unauthenticated Requests ────────────────────────────────────────────

    /// POST a form body without bearer auth or refresh handling.
    pub async fn post_form<T: DeserializeOwned, F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
        fallback: &str,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        check_response_json(response, fallback).await
    }

    /// POST a JSON body without bearer auth or refresh handling.
    pub async fn post_json_public<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        check_response_json(response, fallback).await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Network(format!("Failed to read response body: {}", e)))?;

    if !status.is_success() {
        let message = error_detail(&body).unwrap_or_else(|| fallback.to_string());
        tracing::debug!(status = status.as_u16(), message = %message, "Backend reported failure");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let parsed = if body.trim().is_empty() {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_str(&body)
    };
    parsed.map_err(|e| ClientError::Decode(format!("JSON parse error: {}", e)))
}

/// Extract the backend's user-facing error message, if it sent one.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "message"]
        .iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
