// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the backend API.

pub mod auth;
pub mod search;
pub mod user;

pub use auth::{LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, TokenPair};
pub use search::{BookResult, SearchRequest, SearchResponse};
pub use user::{InterestsUpdate, UserProfile};
