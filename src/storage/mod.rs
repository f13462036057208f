// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable client-side storage.
//!
//! A small string-keyed store playing the role browser `localStorage` plays
//! for a web client. Typed records sit on top of it:
//! - Tokens (access/refresh pair)
//! - Guest search counter
//! - Per-account interests cache

pub mod file;
pub mod interests;
pub mod quota;
pub mod tokens;

pub use file::FileStorage;
pub use interests::InterestsCache;
pub use quota::{GuestQuotaTracker, GuestSearchDecision, GuestSearchGate};
pub use tokens::TokenStore;

use dashmap::DashMap;
use std::sync::Arc;

/// Storage key names as constants.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "bprs_access_token";
    pub const REFRESH_TOKEN: &str = "bprs_refresh_token";
    pub const GUEST_SEARCHES: &str = "bprs_guest_searches";
    /// Prefix for the per-account interests cache (`bprs_interests_{email}`)
    pub const INTERESTS_PREFIX: &str = "bprs_interests_";
}

/// Storage backend errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String-keyed persistent storage.
///
/// Records built on top of this never propagate its errors; an unavailable
/// store is treated as an empty one.
pub trait ClientStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared storage handle.
pub type SharedStorage = Arc<dyn ClientStorage>;

/// In-memory storage, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an in-memory store behind a shared handle.
    pub fn shared() -> SharedStorage {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
