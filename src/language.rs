/*
 * @file language.rs
 * @brief Supported response languages and voices
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

//! Supported response languages and their synthesis voices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a language code is outside the supported set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported language code '{0}'")]
pub struct UnknownLanguage(pub String);

/// A response language the chatbot can translate into and speak.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Mr,
    Fr,
    Es,
    Ja,
    Ko,
}

impl Language {
    /// Every supported language, in menu order.
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Hi,
        Language::Mr,
        Language::Fr,
        Language::Es,
        Language::Ja,
        Language::Ko,
    ];

    /// Two-letter code understood by the translator.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::Ja => "ja",
            Language::Ko => "ko",
        }
    }

    /// English name shown in menus and response labels.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Mr => "Marathi",
            Language::Fr => "French",
            Language::Es => "Spanish",
            Language::Ja => "Japanese",
            Language::Ko => "Korean",
        }
    }

    /// Neural voice used for speech synthesis.
    pub fn voice(self) -> &'static str {
        match self {
            Language::En => "en-US-AriaNeural",
            Language::Hi => "hi-IN-MadhurNeural",
            Language::Mr => "mr-IN-AarohiNeural",
            Language::Fr => "fr-FR-HenriNeural",
            Language::Es => "es-ES-ElviraNeural",
            Language::Ja => "ja-JP-NanamiNeural",
            Language::Ko => "ko-KR-SunHiNeural",
        }
    }

    /// Locale tag for the voice, e.g. `fr-FR`.
    pub fn locale(self) -> &'static str {
        let voice = self.voice();
        &voice[..5]
    }

    /// Menu text listing every code with its name.
    pub fn menu() -> String {
        Self::ALL
            .iter()
            .map(|language| format!("{} ({})", language.code(), language.display_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let normalized = code.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.code() == normalized)
            .ok_or(UnknownLanguage(normalized))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(" FR ".parse::<Language>(), Ok(Language::Fr));
        assert_eq!("mr".parse::<Language>(), Ok(Language::Mr));
        assert_eq!("de".parse::<Language>(), Err(UnknownLanguage("de".to_string())));
    }

    #[test]
    fn voices_match_locales() {
        assert_eq!(Language::Ko.voice(), "ko-KR-SunHiNeural");
        assert_eq!(Language::Hi.locale(), "hi-IN");
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn menu_lists_all_languages() {
        let menu = Language::menu();
        assert!(menu.starts_with("en (English), hi (Hindi)"));
        assert!(menu.ends_with("ko (Korean)"));
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::Ja).expect("json"), "\"ja\"");
        let parsed: Language = serde_json::from_str("\"es\"").expect("json");
        assert_eq!(parsed, Language::Es);
    }
}
