// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! BPRS client: talk to the book recommendation backend.
//!
//! This crate provides the client side of BPRS: durable token storage, an
//! authenticated request gateway that refreshes expired tokens once, a guest
//! search quota, and the session that ties them together.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod interests;
pub mod models;
pub mod session;
pub mod storage;
pub mod validation;

pub use api::BprsApi;
pub use config::Config;
pub use error::{ClientError, Result};
pub use gateway::ApiGateway;
pub use session::{Session, SessionState};
pub use storage::{
    ClientStorage, FileStorage, GuestQuotaTracker, GuestSearchDecision, GuestSearchGate,
    MemoryStorage, SharedStorage, TokenStore,
};
