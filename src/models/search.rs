// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Book search request and response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Largest `top_k` the backend accepts.
pub const MAX_TOP_K: u32 = 500;

/// Request body for `POST /search/`. Unset options are omitted so the
/// backend applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_rerank: Option<bool>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn apply_rerank(mut self, apply_rerank: bool) -> Self {
        self.apply_rerank = Some(apply_rerank);
        self
    }
}

/// Response from `POST /search/`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub total_results: u64,
    #[serde(default)]
    pub results: Vec<BookResult>,
}

/// A single search hit. The backend returns free-form metadata per book, so
/// the raw object is kept and common fields are exposed through accessors.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BookResult(pub Map<String, Value>);

impl BookResult {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// Authors, whether the backend sent a list or a single delimited string.
    pub fn authors(&self) -> Vec<String> {
        match self.0.get("authors").or_else(|| self.0.get("author")) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => s
                .split([',', ';'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Best available relevance score: rerank score first, then similarity.
    pub fn score(&self) -> Option<f64> {
        ["rerank_score", "score", "similarity"]
            .iter()
            .find_map(|k| self.0.get(*k).and_then(Value::as_f64))
    }
}
