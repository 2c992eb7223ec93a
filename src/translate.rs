/*
 * @file translate.rs
 * @brief Answer translation adapter
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

//! Answer translation.
//!
//! Translation failures never surface as errors. The adapter returns a
//! string starting with [`TRANSLATION_ERROR_PREFIX`] and the caller shows
//! it as-is.

use crate::language::Language;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::warn;

/// Marker that starts every degraded translation result.
pub const TRANSLATION_ERROR_PREFIX: &str = "Error in translation:";

/// Public Google Translate endpoint used by default.
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Translates text into a target language.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Returns the translation, or an error-marked string on failure.
    async fn translate(&self, text: &str, target: Language) -> String;
}

/// True when `text` is a degraded result produced by a failed translation.
pub fn is_translation_error(text: &str) -> bool {
    text.starts_with(TRANSLATION_ERROR_PREFIX)
}

/// Translates `text` unless `target` is the source language.
///
/// # Arguments
/// * `translator` - Adapter used for non-source languages.
/// * `text` - Text in the source language.
/// * `target` - Language the user asked for.
/// * `source` - Language the answers are written in.
pub async fn localize<T>(translator: &T, text: &str, target: Language, source: Language) -> String
where
    T: Translator + ?Sized,
{
    if target == source {
        return text.to_string();
    }
    translator.translate(text, target).await
}

/// Translator backed by Google's `translate_a/single` endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    /// Creates a translator calling `endpoint`.
    ///
    /// # Arguments
    /// * `endpoint` - URL of the `translate_a/single` service.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn request(&self, text: &str, target: Language) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .with_context(|| "Failed to reach translation service")?
            .error_for_status()
            .with_context(|| "Translation service rejected the request")?;
        let body: serde_json::Value = response
            .json()
            .await
            .with_context(|| "Failed to parse translation response")?;
        extract_translation(&body)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: Language) -> String {
        match self.request(text, target).await {
            Ok(translated) => translated,
            Err(err) => {
                warn!(target = %target, error = %err, "translation failed");
                format!("{} {:#}", TRANSLATION_ERROR_PREFIX, err)
            }
        }
    }
}

/// Joins the translated segments of a `translate_a/single` response.
///
/// # Details
/// The body is a nested array whose first element lists
/// `[translated, original, ...]` segments.
fn extract_translation(body: &serde_json::Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(|segments| segments.as_array())
        .ok_or_else(|| anyhow!("translation response has no segments"))?;
    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|part| part.as_str()))
        .collect();
    if translated.is_empty() {
        anyhow::bail!("translation response was empty");
    }
    Ok(translated)
}
