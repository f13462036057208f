// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted access/refresh token pair.

use super::{keys, ClientStorage, SharedStorage};
use crate::models::TokenPair;

/// Token store over client storage.
///
/// Storage failures are logged and treated as "no session": reads return
/// `None`, writes are dropped.
#[derive(Clone)]
pub struct TokenStore {
    storage: SharedStorage,
}

impl TokenStore {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// Get the persisted pair. A refresh token alone is not a session.
    pub fn get(&self) -> Option<TokenPair> {
        let access_token = self.access_token()?;
        Some(TokenPair {
            access_token,
            refresh_token: self.refresh_token(),
        })
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(keys::ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(keys::REFRESH_TOKEN)
    }

    pub fn has_tokens(&self) -> bool {
        self.access_token().is_some()
    }

    /// Store a new access token, and the refresh token only if one is given.
    pub fn save(&self, access_token: &str, refresh_token: Option<&str>) {
        if let Err(e) = self.storage.set(keys::ACCESS_TOKEN, access_token) {
            tracing::warn!(error = %e, "Failed to persist access token");
        }

        if let Some(refresh) = refresh_token.filter(|r| !r.is_empty()) {
            if let Err(e) = self.storage.set(keys::REFRESH_TOKEN, refresh) {
                tracing::warn!(error = %e, "Failed to persist refresh token");
            }
        }
    }

    /// Remove both tokens. Safe to call with no tokens stored.
    ///
    /// Returns `false` if storage refused a removal; the tokens it still
    /// holds are then visible to this process and to the next one alike.
    pub fn clear(&self) -> bool {
        let mut cleared = true;
        for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(error = %e, key, "Failed to clear token");
                cleared = false;
            }
        }
        cleared
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, key, "Token storage unavailable");
                None
            }
        }
    }
}
