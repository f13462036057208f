// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side validation of sign-up, login and search input.
//!
//! Checks run before any network call so obvious mistakes never reach the
//! backend.

use crate::error::ClientError;
use crate::models::search::{SearchRequest, MAX_TOP_K};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

/// Characters counted as "special" for password strength.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Password strength level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

/// Individual password checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordChecks {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub number: bool,
    pub special: bool,
}

impl PasswordChecks {
    pub fn passed(&self) -> usize {
        [
            self.length,
            self.uppercase,
            self.lowercase,
            self.number,
            self.special,
        ]
        .iter()
        .filter(|c| **c)
        .count()
    }
}

/// Result of rating a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub level: StrengthLevel,
    /// Meter value: 30, 60 or 100
    pub score: u8,
    pub checks: PasswordChecks,
}

impl PasswordStrength {
    /// At least medium strength is required to sign up.
    pub fn is_acceptable(&self) -> bool {
        self.level != StrengthLevel::Weak
    }
}

/// Rate a password against the five strength checks.
pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = PasswordChecks {
        length: password.chars().count() >= 8,
        uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
        lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
        number: password.chars().any(|c| c.is_ascii_digit()),
        special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
    };

    let (level, score) = match checks.passed() {
        5 => (StrengthLevel::Strong, 100),
        3 | 4 => (StrengthLevel::Medium, 60),
        _ => (StrengthLevel::Weak, 30),
    };

    PasswordStrength {
        level,
        score,
        checks,
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() >= 2 {
        Ok(())
    } else {
        Err(ValidationError::new("name_too_short"))
    }
}

/// The domain part must contain a dot with text on both sides.
fn validate_email_domain(email: &str) -> Result<(), ValidationError> {
    let dotted = email.rsplit_once('@').is_some_and(|(_, domain)| {
        domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
    });

    if dotted {
        Ok(())
    } else {
        Err(ValidationError::new("email_domain"))
    }
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password_strength(password).is_acceptable() {
        Ok(())
    } else {
        Err(ValidationError::new("password_too_weak"))
    }
}

/// Sign-up form input.
#[derive(Debug, Clone, Default, Validate)]
pub struct SignUpForm {
    #[validate(custom(function = "validate_name", message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(
        email(message = "Please enter a valid email address"),
        custom(function = "validate_email_domain", message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(custom(
        function = "validate_password_strength",
        message = "Password must be at least medium strength"
    ))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(length(min = 1, message = "Please select at least one interest"))]
    pub interests: Vec<String>,
}

impl SignUpForm {
    const FIELDS: [&'static str; 5] = ["name", "email", "password", "confirm_password", "interests"];

    /// Per-field messages, empty when the form is valid.
    pub fn field_errors(&self) -> BTreeMap<&'static str, String> {
        match self.validate() {
            Ok(()) => BTreeMap::new(),
            Err(errors) => field_messages(&errors, &Self::FIELDS),
        }
    }

    pub fn check(&self) -> Result<(), ClientError> {
        self.validate()
            .map_err(|errors| to_client_error(&errors, &Self::FIELDS))
    }
}

/// Login form input.
#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(
        email(message = "Please enter a valid email address"),
        custom(function = "validate_email_domain", message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    const FIELDS: [&'static str; 2] = ["email", "password"];

    pub fn field_errors(&self) -> BTreeMap<&'static str, String> {
        match self.validate() {
            Ok(()) => BTreeMap::new(),
            Err(errors) => field_messages(&errors, &Self::FIELDS),
        }
    }

    pub fn check(&self) -> Result<(), ClientError> {
        self.validate()
            .map_err(|errors| to_client_error(&errors, &Self::FIELDS))
    }
}

/// Check a search request and return it with the query trimmed.
pub fn normalize_search(request: &SearchRequest) -> Result<SearchRequest, ClientError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ClientError::Validation("Query cannot be empty".to_string()));
    }

    if let Some(top_k) = request.top_k {
        if !(1..=MAX_TOP_K).contains(&top_k) {
            return Err(ClientError::Validation(format!(
                "Number of results must be between 1 and {}",
                MAX_TOP_K
            )));
        }
    }

    Ok(SearchRequest {
        query: query.to_string(),
        ..request.clone()
    })
}

fn field_messages(errors: &ValidationErrors, fields: &[&'static str]) -> BTreeMap<&'static str, String> {
    let by_field = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| {
            let first = by_field.get(*field)?.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((*field, message))
        })
        .collect()
}

fn to_client_error(errors: &ValidationErrors, fields: &[&'static str]) -> ClientError {
    let messages = field_messages(errors, fields);
    // Keep form order rather than alphabetical order.
    let joined: Vec<&str> = fields
        .iter()
        .filter_map(|f| messages.get(f).map(String::as_str))
        .collect();
    ClientError::Validation(joined.join("; "))
}
