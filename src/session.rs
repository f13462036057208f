// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session orchestration.
//!
//! [`Session`] is the only writer of the in-memory session state. It is
//! created by the application and handed to whatever needs it; there is no
//! global session.
//!
//! State machine:
//! - `Unknown` → `Restoring` on [`Session::restore`]
//! - `Restoring` → `Authenticated` if stored tokens yield a profile, else `Anonymous`
//! - `Anonymous` → `Authenticated` on login or sign-up (guest quota reset)
//! - `Authenticated` → `Anonymous` on logout or any `SessionExpired` result

use crate::api::BprsApi;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::gateway::ApiGateway;
use crate::models::{RegisterRequest, SearchRequest, SearchResponse, UserProfile};
use crate::storage::{
    GuestQuotaTracker, GuestSearchDecision, GuestSearchGate, InterestsCache, SharedStorage,
    TokenStore,
};
use crate::validation::{LoginForm, SignUpForm};

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unknown,
    Restoring,
    Authenticated(UserProfile),
    Anonymous,
}

/// Client session: token lifecycle, current user and guest quota.
pub struct Session {
    api: BprsApi,
    tokens: TokenStore,
    quota: GuestQuotaTracker,
    gate: GuestSearchGate,
    interests: InterestsCache,
    state: SessionState,
}

impl Session {
    /// Build a session and its API client from configuration.
    pub fn new(config: &Config, storage: SharedStorage) -> Result<Self> {
        let tokens = TokenStore::new(storage.clone());
        let gateway = ApiGateway::new(config, tokens)?;
        Ok(Self::with_api(
            BprsApi::new(gateway),
            storage,
            GuestSearchGate::new(config.guest_search_limit),
        ))
    }

    /// Build a session around an existing API client.
    ///
    /// `storage` must be the store the client's gateway keeps its tokens in.
    pub fn with_api(api: BprsApi, storage: SharedStorage, gate: GuestSearchGate) -> Self {
        Self {
            tokens: api.gateway().tokens().clone(),
            api,
            quota: GuestQuotaTracker::new(storage.clone()),
            gate,
            interests: InterestsCache::new(storage),
            state: SessionState::Unknown,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        match &self.state {
            SessionState::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────────

    /// Restore the session from stored tokens.
    ///
    /// Tokens are only cleared when the backend rejects them; a network
    /// failure leaves them in place for the next attempt.
    pub async fn restore(&mut self) -> &SessionState {
        self.state = SessionState::Restoring;

        if !self.tokens.has_tokens() {
            tracing::debug!("No stored tokens, starting anonymous");
            self.state = SessionState::Anonymous;
            return &self.state;
        }

        self.state = match self.fetch_profile().await {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, "Session restored");
                SessionState::Authenticated(profile)
            }
            Err(e) => {
                tracing::info!(error = %e, "Could not restore session");
                SessionState::Anonymous
            }
        };
        &self.state
    }

    /// Log in with email and password.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile> {
        LoginForm {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
        .check()?;

        let tokens = self.api.login(email.trim(), password).await?;
        self.tokens
            .save(&tokens.access_token, Some(tokens.refresh_token.as_str()));

        match self.fetch_profile().await {
            Ok(profile) => {
                self.quota.reset();
                tracing::info!(user_id = %profile.id, "Logged in");
                self.state = SessionState::Authenticated(profile.clone());
                Ok(profile)
            }
            Err(e) => {
                // Never leave tokens behind for a session that was not confirmed.
                self.tokens.clear();
                self.state = SessionState::Anonymous;
                Err(e)
            }
        }
    }

    /// Create an account, log into it, and store the selected interests.
    ///
    /// Failing to save interests does not fail the sign-up.
    pub async fn signup(&mut self, form: &SignUpForm) -> Result<UserProfile> {
        form.check()?;

        let request = RegisterRequest {
            email: form.email.trim().to_string(),
            full_name: form.name.trim().to_string(),
            password: form.password.clone(),
        };
        let created = self.api.register(&request).await?;
        tracing::info!(user_id = %created.id, "Account created");

        let mut profile = self.login(&request.email, &form.password).await?;
        self.interests.save(&profile.email, &form.interests);

        let result = self.api.update_interests(&form.interests).await;
        match self.observe(result) {
            Ok(updated) => profile = updated,
            Err(e) if e.is_session_expired() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save interests after sign-up");
                profile.interests = form.interests.clone();
            }
        }

        self.state = SessionState::Authenticated(profile.clone());
        Ok(profile)
    }

    /// Log out. The backend call is best-effort; local tokens are always cleared.
    ///
    /// Fails with `StorageUnavailable` only when the stored tokens could not
    /// be removed, since a later restore would bring the session back.
    pub async fn logout(&mut self) -> Result<()> {
        if self.tokens.has_tokens() {
            if let Err(e) = self.api.logout().await {
                tracing::debug!(error = %e, "Logout request failed, clearing tokens anyway");
            }
        }

        self.state = SessionState::Anonymous;
        if !self.tokens.clear() {
            return Err(ClientError::StorageUnavailable(
                "stored tokens could not be removed".to_string(),
            ));
        }

        tracing::info!("Logged out");
        Ok(())
    }

    // ─── API Calls ───────────────────────────────────────────────────────────

    /// Search for books as the current user (or as a guest).
    ///
    /// Does not touch the guest counter; see [`track_guest_search`](Self::track_guest_search).
    pub async fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse> {
        let result = self.api.search(request).await;
        self.observe(result)
    }

    /// Replace the current user's interests.
    pub async fn update_interests(&mut self, interests: &[String]) -> Result<UserProfile> {
        if !self.is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }

        let result = self.api.update_interests(interests).await;
        let profile = self.observe(result)?;
        self.interests.save(&profile.email, &profile.interests);
        self.state = SessionState::Authenticated(profile.clone());
        Ok(profile)
    }

    // ─── Guest Quota ─────────────────────────────────────────────────────────

    pub fn guest_search_gate(&self) -> GuestSearchGate {
        self.gate
    }

    pub fn guest_search_count(&self) -> u32 {
        self.quota.read()
    }

    /// Where a guest stands before searching, without counting anything.
    pub fn guest_search_status(&self) -> GuestSearchDecision {
        if self.is_authenticated() {
            return GuestSearchDecision::Unlimited;
        }
        self.gate.evaluate(self.quota.read())
    }

    /// Count a guest search submission and report where the guest now stands.
    ///
    /// Logged-in users are not counted.
    pub fn track_guest_search(&self) -> GuestSearchDecision {
        if self.is_authenticated() {
            return GuestSearchDecision::Unlimited;
        }

        let count = self.quota.increment();
        let decision = self.gate.evaluate(count);
        tracing::debug!(count, limit = self.gate.limit(), ?decision, "Guest search tracked");
        decision
    }

    /// Explicitly clear the guest counter.
    pub fn reset_guest_searches(&self) {
        self.quota.reset();
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    /// Fetch the profile, falling back to cached interests when the backend
    /// has none, and refreshing the cache when it does.
    async fn fetch_profile(&self) -> Result<UserProfile> {
        let mut profile = self.api.me().await?;

        if profile.interests.is_empty() {
            profile.interests = self.interests.load(&profile.email);
        } else {
            self.interests.save(&profile.email, &profile.interests);
        }

        Ok(profile)
    }

    /// Drop to `Anonymous` when a call reports the session is gone.
    fn observe<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ClientError::SessionExpired) = &result {
            if self.is_authenticated() {
                tracing::info!("Session expired, switching to anonymous");
            }
            self.state = SessionState::Anonymous;
        }
        result
    }
}
