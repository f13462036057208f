// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interests cached per account email. Survives logout/login.

use super::{keys, ClientStorage, SharedStorage};

#[derive(Clone)]
pub struct InterestsCache {
    storage: SharedStorage,
}

impl InterestsCache {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    fn key(email: &str) -> String {
        format!("{}{}", keys::INTERESTS_PREFIX, email)
    }

    pub fn save(&self, email: &str, interests: &[String]) {
        let encoded = match serde_json::to_string(interests) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode interests");
                return;
            }
        };

        if let Err(e) = self.storage.set(&Self::key(email), &encoded) {
            tracing::warn!(error = %e, "Failed to cache interests");
        }
    }

    /// Cached interests, empty when nothing (valid) is cached.
    pub fn load(&self, email: &str) -> Vec<String> {
        match self.storage.get(&Self::key(email)) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring corrupt interests cache entry");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Interests cache unavailable");
                Vec::new()
            }
        }
    }
}
