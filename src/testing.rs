/*
 * @file testing.rs
 * @brief Test doubles for chat collaborators
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

//! Collaborator doubles shared by the session and interpreter tests.

use crate::generator::{GenerationError, Generator};
use crate::language::Language;
use crate::speech::{Recognition, SpeechRecognizer, SpeechSynthesizer, VoiceSettings};
use crate::translate::{Translator, TRANSLATION_ERROR_PREFIX};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Generator that always fails.
pub struct OfflineGenerator;

#[async_trait]
impl Generator for OfflineGenerator {
    async fn generate(&self, _question: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Status(503))
    }
}

/// Generator that echoes a fixed reply.
pub struct FixedGenerator(pub &'static str);

#[async_trait]
impl Generator for FixedGenerator {
    async fn generate(&self, _question: &str) -> Result<String, GenerationError> {
        Ok(self.0.to_string())
    }
}

/// Translator that tags text with the target code, or fails for Korean.
pub struct TaggingTranslator;

#[async_trait]
impl Translator for TaggingTranslator {
    async fn translate(&self, text: &str, target: Language) -> String {
        if target == Language::Ko {
            return format!("{} service unavailable", TRANSLATION_ERROR_PREFIX);
        }
        format!("[{}] {}", target, text)
    }
}

/// Recognizer replaying a fixed script, then failing with "script exhausted".
pub struct ScriptedRecognizer {
    script: Mutex<VecDeque<Recognition>>,
}

impl ScriptedRecognizer {
    pub fn new(script: Vec<Recognition>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn recognize(&self, _language: Language) -> Recognition {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Recognition::Failed("script exhausted".to_string()))
    }
}

/// Synthesizer that records every utterance instead of playing it.
#[derive(Clone, Default)]
pub struct RecordingSynthesizer {
    spoken: Arc<Mutex<Vec<(String, VoiceSettings)>>>,
    fail: bool,
}

impl RecordingSynthesizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<(String, VoiceSettings)> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|(text, _)| text).collect()
    }
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn speak(&self, text: &str, voice: &VoiceSettings) -> Result<()> {
        self.spoken.lock().unwrap().push((text.to_string(), *voice));
        if self.fail {
            anyhow::bail!("speaker unplugged");
        }
        Ok(())
    }
}
