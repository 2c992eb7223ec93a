/*
 * @file config.rs
 * @brief Runtime configuration and speech credentials
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

//! Runtime configuration: `config.json` defaults and speech credentials.

use crate::language::Language;
use crate::translate::DEFAULT_TRANSLATE_URL;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default location of the JSON configuration file.
pub const CONFIG_PATH: &str = "config.json";

/// Environment variable holding the speech service key.
pub const SPEECH_KEY_VAR: &str = "SPEECH_KEY";

/// Environment variable holding the speech service region.
pub const SPEECH_REGION_VAR: &str = "SPEECH_REGION";

/// Environment variable overriding the configured Ollama model.
pub const OLLAMA_MODEL_VAR: &str = "OLLAMA_MODEL";

/// Startup configuration faults. These are fatal for speech features.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing {0} in environment variables")]
    MissingVar(&'static str),
}

/// Strongly typed representation of `config.json`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "fallback_faq_path")]
    pub faq_path: PathBuf,
    #[serde(default = "fallback_ollama_url")]
    pub ollama_url: String,
    #[serde(default = "fallback_ollama_model")]
    pub ollama_model: String,
    #[serde(default = "fallback_max_answer_length")]
    pub max_answer_length: u32,
    #[serde(default = "fallback_volume")]
    pub default_volume: u8,
    #[serde(default = "fallback_translate_url")]
    pub translate_url: String,
    #[serde(default)]
    pub source_language: Language,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            faq_path: fallback_faq_path(),
            ollama_url: fallback_ollama_url(),
            ollama_model: fallback_ollama_model(),
            max_answer_length: fallback_max_answer_length(),
            default_volume: fallback_volume(),
            translate_url: fallback_translate_url(),
            source_language: Language::default(),
        }
    }
}

impl AppConfig {
    /// Loads `path`, falling back to defaults when missing or invalid.
    ///
    /// # Details
    /// `OLLAMA_MODEL` overrides the model from the file.
    pub fn load(path: &Path) -> Self {
        Self::load_with(path, |name| env::var(name).ok())
    }

    /// Loads `path`, reading overrides through `lookup`.
    ///
    /// # Arguments
    /// * `path` - Location of `config.json`.
    /// * `lookup` - Environment variable source.
    ///
    /// # Returns
    /// * `AppConfig` - File values with the model override applied and the
    ///   volume clamped to `0..=100`.
    pub fn load_with<F>(path: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = read_config(path);
        if let Some(model) = lookup(OLLAMA_MODEL_VAR) {
            if !model.trim().is_empty() {
                config.ollama_model = model;
            }
        }
        config.default_volume = config.default_volume.min(100);
        config
    }
}

/// Parses `path`, returning defaults when it is missing or malformed.
fn read_config(path: &Path) -> AppConfig {
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config parse error, using defaults");
                AppConfig::default()
            }
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config load error, using defaults");
            AppConfig::default()
        }
    }
}

/// Key and region for the cloud speech service.
#[derive(Clone, PartialEq, Eq)]
pub struct SpeechCredentials {
    pub key: String,
    pub region: String,
}

impl std::fmt::Debug for SpeechCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechCredentials")
            .field("key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

impl SpeechCredentials {
    /// Reads `SPEECH_KEY` and `SPEECH_REGION` from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingVar`] when either is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds credentials from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };
        Ok(Self {
            key: read(SPEECH_KEY_VAR)?,
            region: read(SPEECH_REGION_VAR)?,
        })
    }
}

fn fallback_faq_path() -> PathBuf {
    PathBuf::from("faq.json")
}

fn fallback_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn fallback_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn fallback_max_answer_length() -> u32 {
    150
}

fn fallback_volume() -> u8 {
    75
}

fn fallback_translate_url() -> String {
    DEFAULT_TRANSLATE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"faq_path": "data/faq.json", "source_language": "fr"}}"#).expect("write");
        let config = read_config(file.path());
        assert_eq!(config.faq_path, PathBuf::from("data/faq.json"));
        assert_eq!(config.source_language, Language::Fr);
        assert_eq!(config.max_answer_length, 150);
        assert_eq!(config.default_volume, 75);
    }

    #[test]
    fn missing_or_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert_eq!(read_config(&dir.path().join("absent.json")), AppConfig::default());

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{ nope").expect("write");
        assert_eq!(read_config(file.path()), AppConfig::default());
    }

    #[test]
    fn model_variable_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"ollama_model": "from-file"}}"#).expect("write");
        let config = AppConfig::load_with(file.path(), |name| {
            (name == OLLAMA_MODEL_VAR).then(|| "from-env".to_string())
        });
        assert_eq!(config.ollama_model, "from-env");

        let blank = AppConfig::load_with(file.path(), |_| Some("   ".to_string()));
        assert_eq!(blank.ollama_model, "from-file");

        let unset = AppConfig::load_with(file.path(), |_| None);
        assert_eq!(unset.ollama_model, "from-file");
    }

    #[test]
    fn loaded_volume_is_clamped() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"default_volume": 180}}"#).expect("write");
        assert_eq!(read_config(file.path()).default_volume, 180);
        let config = AppConfig::load_with(file.path(), |_| None);
        assert_eq!(config.default_volume, 100);
    }

    #[test]
    fn credentials_require_key_and_region() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(SPEECH_KEY_VAR, "secret"), (SPEECH_REGION_VAR, "westeurope")]);
        let creds = SpeechCredentials::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .expect("credentials");
        assert_eq!(creds.region, "westeurope");
        assert!(!format!("{:?}", creds).contains("secret"));

        let missing_region = SpeechCredentials::from_lookup(|name| {
            (name == SPEECH_KEY_VAR).then(|| "secret".to_string())
        });
        assert_eq!(missing_region, Err(ConfigError::MissingVar(SPEECH_REGION_VAR)));

        let blank_key = SpeechCredentials::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(blank_key, Err(ConfigError::MissingVar(SPEECH_KEY_VAR)));
    }
}
