// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile as returned by the backend.

use serde::{Deserialize, Serialize};

/// Current user profile (`UserResponse` on the backend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user ID
    pub id: String,
    /// Login email
    pub email: String,
    /// Display name, if set at registration
    #[serde(default)]
    pub full_name: Option<String>,
    /// Account role ("user" or "admin")
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// When the account was created (ISO 8601)
    pub created_at: String,
    /// Selected programming interests
    #[serde(default)]
    pub interests: Vec<String>,
}

impl UserProfile {
    /// Name to greet the user with, falling back to the email's local part.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

fn default_role() -> String {
    "user".to_string()
}

fn default_active() -> bool {
    true
}

/// Request body for `PATCH /users/me/interests`.
#[derive(Debug, Clone, Serialize)]
pub struct InterestsUpdate {
    pub interests: Vec<String>,
}
