/*
 * @file interpreter.rs
 * @brief Speech-to-speech translation tool
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

//! Speech-to-speech translation tool.
//!
//! Listens in the source language and speaks each utterance back in every
//! target language.

use crate::config::{AppConfig, SpeechCredentials};
use crate::language::Language;
use crate::speech::{
    speak_or_log, CloudSpeech, Recognition, SpeechRecognizer, SpeechSynthesizer, VoiceSettings,
};
use crate::translate::{GoogleTranslator, Translator};
use anyhow::Result;
use std::io::{self, Write};
use tracing::warn;

/// Target languages used when none are given.
pub const DEFAULT_TARGETS: [Language; 5] = [
    Language::Fr,
    Language::Es,
    Language::Hi,
    Language::Ja,
    Language::Ko,
];

/// Consecutive recognition failures tolerated before giving up.
const MAX_CONSECUTIVE_FAILURES: usize = 3;

/// Runs the interpreter against the microphone and speaker.
///
/// # Errors
/// Returns an error when recognition keeps failing or stdout breaks.
pub async fn run_interpreter(
    config: &AppConfig,
    credentials: &SpeechCredentials,
    targets: &[Language],
) -> Result<()> {
    let speech = CloudSpeech::new(credentials);
    let translator = GoogleTranslator::new(config.translate_url.clone());
    Interpreter {
        recognizer: &speech,
        synthesizer: &speech,
        translator: &translator,
        source: config.source_language,
        targets,
        volume: config.default_volume,
    }
    .run(&mut io::stdout())
    .await
}

/// Borrowed collaborators and settings for one interpreter run.
pub struct Interpreter<'a> {
    pub recognizer: &'a dyn SpeechRecognizer,
    pub synthesizer: &'a dyn SpeechSynthesizer,
    pub translator: &'a dyn Translator,
    pub source: Language,
    pub targets: &'a [Language],
    pub volume: u8,
}

impl Interpreter<'_> {
    /// Loops until "quit" is heard.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Ready to translate. Speak now... (Say 'quit' to exit)")?;
        let mut failures = 0;
        loop {
            match self.recognizer.recognize(self.source).await {
                Recognition::Recognized(text) if text.eq_ignore_ascii_case("quit") => break,
                Recognition::Recognized(text) => {
                    failures = 0;
                    self.interpret(&text, out).await?;
                }
                Recognition::NoSpeech => {
                    failures = 0;
                    writeln!(out, "No speech recognized. Please try again.")?;
                }
                Recognition::Failed(reason) => {
                    warn!(%reason, "speech recognition failed");
                    writeln!(out, "Speech recognition error: {}", reason)?;
                    failures += 1;
                    if failures >= MAX_CONSECUTIVE_FAILURES {
                        anyhow::bail!("speech recognition failed {} times in a row", failures);
                    }
                }
            }
        }
        writeln!(out, "Translation tool stopped.")?;
        Ok(())
    }

    async fn interpret<W: Write>(&self, text: &str, out: &mut W) -> Result<()> {
        writeln!(out, "Original: {}", text)?;
        for &language in self.targets.iter().filter(|&&language| language != self.source) {
            let translated = self.translator.translate(text, language).await;
            writeln!(out, "Translated ({}): {}", language, translated)?;
            let voice = VoiceSettings {
                language,
                volume: self.volume,
            };
            speak_or_log(self.synthesizer, &translated, &voice).await;
        }
        Ok(())
    }
}
