// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed wrappers for the BPRS backend endpoints.

use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::models::{
    InterestsUpdate, LoginResponse, RegisterRequest, SearchRequest, SearchResponse, UserProfile,
};
use crate::validation::normalize_search;
use reqwest::Method;
use serde_json::Value;

/// BPRS API client.
#[derive(Clone)]
pub struct BprsApi {
    gateway: ApiGateway,
}

impl BprsApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    /// Exchange credentials for tokens.
    ///
    /// POST /auth/login (form-encoded; the backend's OAuth2 password form
    /// calls the email `username`).
    ///
    /// Does not store the tokens; the session decides when they become current.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        self.gateway
            .post_form(
                "/auth/login",
                &[("username", email), ("password", password)],
                "Login failed",
            )
            .await
    }

    /// Create an account. POST /users/register
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile> {
        self.gateway
            .post_json_public("/users/register", request, "Registration failed")
            .await
    }

    /// Get the authenticated user's profile. GET /users/me
    pub async fn me(&self) -> Result<UserProfile> {
        self.gateway
            .request_json(
                Method::GET,
                "/users/me",
                None::<&Value>,
                "Could not fetch user profile",
            )
            .await
    }

    /// Invalidate the current access token on the backend. POST /auth/logout
    pub async fn logout(&self) -> Result<()> {
        let _: Value = self
            .gateway
            .request_json(Method::POST, "/auth/logout", None::<&Value>, "Logout failed")
            .await?;
        Ok(())
    }

    /// Search for books. POST /search/
    ///
    /// Sends the access token when one is stored; guests search without one.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let request = normalize_search(request)?;
        self.gateway
            .request_json(Method::POST, "/search/", Some(&request), "Search failed")
            .await
    }

    /// Replace the user's interests. PATCH /users/me/interests
    pub async fn update_interests(&self, interests: &[String]) -> Result<UserProfile> {
        let body = InterestsUpdate {
            interests: interests.to_vec(),
        };
        self.gateway
            .request_json(
                Method::PATCH,
                "/users/me/interests",
                Some(&body),
                "Failed to save interests",
            )
            .await
    }
}
