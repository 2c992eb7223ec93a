/*
 * @file generator.rs
 * @brief Generative fallback backed by a local Ollama server
 * @author Kevin Thomas
 * @date 2025
 *
 * MIT License
 *
 * Copyright (c) 2025 Kevin Thomas
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Generative fallback for questions the FAQ table cannot answer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Timeout for the startup availability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Why a generation attempt produced no answer.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generator returned HTTP {0}")]
    Status(u16),
    #[error("generator returned a malformed body: {0}")]
    Malformed(String),
    #[error("generator returned an empty answer")]
    Empty,
}

/// Produces a best-effort answer for a free-form question.
///
/// # Details
/// Implementations make a single attempt and report every failure as a
/// [`GenerationError`]; nothing panics or escapes as another error type.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, question: &str) -> Result<String, GenerationError>;
}

/// Request body for Ollama's `/api/generate` endpoint.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Decoding options; zero temperature keeps decoding greedy.
#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Deterministic text generator backed by a local Ollama server.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_length: u32,
}

impl OllamaGenerator {
    /// Creates a generator for `model` served at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Server root such as `http://localhost:11434`.
    /// * `model` - Ollama model tag.
    /// * `max_length` - Upper bound on generated tokens.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, max_length: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_length,
        }
    }

    /// Checks whether the server responds and has the configured model.
    ///
    /// # Returns
    /// * `Ok(true)` - Model is installed.
    /// * `Ok(false)` - Server responds but the model is missing.
    ///
    /// # Errors
    /// Returns an error if the server cannot be reached or answers garbage.
    pub async fn probe(&self) -> Result<bool> {
        let json: serde_json::Value = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .with_context(|| "Failed to query Ollama models")?
            .json()
            .await
            .with_context(|| "Failed to parse Ollama response")?;
        let installed = json["models"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter_map(|model| model["name"].as_str())
                    .any(|name| name == self.model)
            })
            .unwrap_or(false);
        Ok(installed)
    }

    /// Probes the server and logs the outcome without failing.
    ///
    /// # Details
    /// An unreachable server or missing model leaves the chatbot running on
    /// FAQ answers alone.
    ///
    /// # Returns
    /// * `bool` - Whether generated answers are available.
    pub async fn check_availability(&self) -> bool {
        match self.probe().await {
            Ok(true) => {
                info!(model = %self.model, "generator ready");
                true
            }
            Ok(false) => {
                warn!(model = %self.model, "model not installed; FAQ answers only");
                false
            }
            Err(err) => {
                let error = format!("{:#}", err);
                warn!(%error, "generator unreachable; FAQ answers only");
                false
            }
        }
    }

    async fn request(&self, question: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: question,
            stream: false,
            options: GenerateOptions {
                num_predict: self.max_length,
                temperature: 0.0,
            },
        };
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::Malformed(err.to_string()))?;
        let answer = body.response.trim();
        if answer.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(answer.to_string())
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, question: &str) -> Result<String, GenerationError> {
        debug!(model = %self.model, "generating fallback answer");
        let result = self.request(question).await;
        if let Err(err) = &result {
            warn!(model = %self.model, error = %err, "generation failed");
        }
        result
    }
}
