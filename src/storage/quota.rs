// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Guest search counter and the sign-up gate built on it.

use super::{keys, ClientStorage, SharedStorage};

/// Default number of guest searches before sign-up is required.
pub const DEFAULT_GUEST_SEARCH_LIMIT: u32 = 3;

/// Counts searches made without logging in.
///
/// Only counts; deciding what to do at the limit is [`GuestSearchGate`]'s job.
#[derive(Clone)]
pub struct GuestQuotaTracker {
    storage: SharedStorage,
}

impl GuestQuotaTracker {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// Current count, 0 if unset, unreadable or unparsable.
    pub fn read(&self) -> u32 {
        match self.storage.get(keys::GUEST_SEARCHES) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or(0),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(error = %e, "Guest counter unavailable, assuming 0");
                0
            }
        }
    }

    /// Count one more guest search and return the new total.
    pub fn increment(&self) -> u32 {
        let count = self.read().saturating_add(1);
        if let Err(e) = self.storage.set(keys::GUEST_SEARCHES, &count.to_string()) {
            tracing::warn!(error = %e, "Failed to persist guest search count");
        }
        count
    }

    pub fn reset(&self) {
        if let Err(e) = self.storage.remove(keys::GUEST_SEARCHES) {
            tracing::warn!(error = %e, "Failed to reset guest search count");
        }
    }
}

/// Outcome of checking a guest search count against the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestSearchDecision {
    /// Logged-in users are never counted.
    Unlimited,
    /// Guest may keep searching; `remaining` more before sign-up is required.
    Allowed { remaining: u32 },
    /// Guest has used up the free searches; the UI should send them to sign-up.
    SignupRequired,
}

impl GuestSearchDecision {
    pub fn requires_signup(&self) -> bool {
        matches!(self, GuestSearchDecision::SignupRequired)
    }
}

/// Sign-up gate for guest searches. The bound is inclusive: reaching the
/// limit already requires sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestSearchGate {
    limit: u32,
}

impl Default for GuestSearchGate {
    fn default() -> Self {
        Self::new(DEFAULT_GUEST_SEARCH_LIMIT)
    }
}

impl GuestSearchGate {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn remaining(&self, count: u32) -> u32 {
        self.limit.saturating_sub(count)
    }

    pub fn evaluate(&self, count: u32) -> GuestSearchDecision {
        if count >= self.limit {
            GuestSearchDecision::SignupRequired
        } else {
            GuestSearchDecision::Allowed {
                remaining: self.remaining(count),
            }
        }
    }
}
