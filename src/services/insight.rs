// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mountain insight client for the structured-generation API.
//!
//! Handles:
//! - Building a `generateContent` request with a required JSON response schema
//! - Extracting and parsing the generated JSON text
//! - Collapsing every failure into "insight unavailable" for callers

use crate::config::Config;
use crate::models::{Difficulty, MountainInfo};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for fetching hiker-oriented information about a mountain.
#[derive(Clone)]
pub struct InsightService {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl InsightService {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        }
    }

    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch insights for `mountain_name`, or `None` if they are unavailable.
    ///
    /// Never retries and never caches; the caller may simply ask again.
    pub async fn fetch(&self, mountain_name: &str) -> Option<MountainInfo> {
        match self.try_fetch(mountain_name).await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(mountain = mountain_name, error = %e, "Mountain insight unavailable");
                None
            }
        }
    }

    /// Like [`fetch`](Self::fetch), but keeps the failure reason.
    pub async fn try_fetch(&self, mountain_name: &str) -> Result<MountainInfo, InsightError> {
        let api_key = self.api_key.as_deref().ok_or(InsightError::NotConfigured)?;
        let mountain_name = mountain_name.trim();
        if mountain_name.is_empty() {
            return Err(InsightError::EmptyName);
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!(mountain = mountain_name, model = %self.model, "Requesting mountain insight");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(mountain_name))
            .send()
            .await
            .map_err(|e| InsightError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Status(status.as_u16(), body));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Malformed(e.to_string()))?;

        let text = generated.first_text().ok_or(InsightError::EmptyResponse)?;
        let info: MountainInfo =
            serde_json::from_str(text).map_err(|e| InsightError::Malformed(e.to_string()))?;

        tracing::info!(mountain = mountain_name, difficulty = ?info.difficulty, "Fetched mountain insight");
        Ok(info)
    }
}

/// Prompt sent for a mountain.
pub fn prompt_for(mountain_name: &str) -> String {
    format!(
        "Provide detailed information about {} in South Korea for hikers.",
        mountain_name
    )
}

/// Required output shape, in the service's schema dialect.
pub fn response_schema() -> serde_json::Value {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "description": { "type": "STRING" },
            "difficulty": { "type": "STRING", "enum": difficulties },
            "recommendedSeason": { "type": "STRING" },
            "gearSuggestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["name", "description", "difficulty", "recommendedSeason", "gearSuggestions"]
    })
}

fn request_body(mountain_name: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [{ "text": prompt_for(mountain_name) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// First non-empty text part of the first candidate.
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .find(|t| !t.trim().is_empty())
    }
}

/// Why an insight could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("Insight service is not configured (GEMINI_API_KEY unset)")]
    NotConfigured,

    #[error("Mountain name is empty")]
    EmptyName,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {0}: {1}")]
    Status(u16, String),

    #[error("Response contained no generated text")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Malformed(String),
}
