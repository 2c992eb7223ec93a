/*
 * @file session.rs
 * @brief Interactive chat session loop
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

//! Interactive chat session orchestration.

use crate::config::{AppConfig, SpeechCredentials};
use crate::faq::load_faq;
use crate::generator::{Generator, OllamaGenerator};
use crate::language::Language;
use crate::resolver::{Resolution, Resolver};
use crate::speech::{
    speak_or_log, trim_utterance, CloudSpeech, Recognition, SpeechRecognizer, SpeechSynthesizer,
    VoiceSettings,
};
use crate::translate::{is_translation_error, localize, GoogleTranslator, Translator};
use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

/// Apology shown (and spoken) when a spoken question has no answer.
pub const SPOKEN_APOLOGY: &str = "That question seems incorrect. Please try rephrasing it.";

/// Apology shown when a typed question has no answer.
pub const WRITTEN_APOLOGY: &str = "That question seems incorrect. Please correct it and try again.";

const TYPED_FAREWELL: &str = "Thank you! Have a nice day!";
const SPOKEN_FAREWELL: &str = "Goodbye! Thank you for using the chatbot.";
const QUIT_WORD: &str = "quit";

/// How the user asks questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Speak,
    Write,
}

/// Per-session preferences read by the adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub language: Language,
    pub volume: u8,
    pub mode: Option<Mode>,
}

impl SessionContext {
    /// Starts in the default language with no mode chosen yet.
    pub fn new(volume: u8) -> Self {
        Self {
            language: Language::default(),
            volume: volume.min(100),
            mode: None,
        }
    }

    /// Sets the volume, clamping to `0..=100`.
    pub fn set_volume(&mut self, level: i64) {
        self.volume = level.clamp(0, 100) as u8;
    }

    /// Voice settings for the current language.
    pub fn voice(&self) -> VoiceSettings {
        self.voice_for(self.language)
    }

    /// Voice settings for `language` at the session volume.
    pub fn voice_for(&self, language: Language) -> VoiceSettings {
        VoiceSettings {
            language,
            volume: self.volume,
        }
    }
}

/// Microphone and speaker collaborators.
pub struct SpeechIo {
    pub recognizer: Box<dyn SpeechRecognizer>,
    pub synthesizer: Box<dyn SpeechSynthesizer>,
}

/// Runs the chat session on stdin/stdout until the user quits.
///
/// # Details
/// Without `credentials` the session is text-only: speak mode is refused
/// and nothing is vocalized.
///
/// # Errors
/// Returns an error only when the terminal cannot be read or written.
pub async fn run_chat_session(
    config: &AppConfig,
    credentials: Option<SpeechCredentials>,
) -> Result<()> {
    let generator = OllamaGenerator::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
        config.max_answer_length,
    );
    generator.check_availability().await;
    let resolver = Resolver::new(load_faq(&config.faq_path), generator);
    let speech = credentials.map(|creds| SpeechIo {
        recognizer: Box::new(CloudSpeech::new(&creds)),
        synthesizer: Box::new(CloudSpeech::new(&creds)),
    });
    let stdin = io::stdin();
    ChatSession::new(
        resolver,
        Box::new(GoogleTranslator::new(config.translate_url.clone())),
        speech,
        SessionContext::new(config.default_volume),
        stdin.lock(),
        io::stdout(),
    )
    .with_source_language(config.source_language)
    .run()
    .await
}

/// Session state plus its collaborators and terminal streams.
pub struct ChatSession<G, R, W> {
    resolver: Resolver<G>,
    translator: Box<dyn Translator>,
    speech: Option<SpeechIo>,
    context: SessionContext,
    default_volume: u8,
    source_language: Language,
    input: R,
    output: W,
}

impl<G, R, W> ChatSession<G, R, W>
where
    G: Generator,
    R: BufRead,
    W: Write,
{
    pub fn new(
        resolver: Resolver<G>,
        translator: Box<dyn Translator>,
        speech: Option<SpeechIo>,
        context: SessionContext,
        input: R,
        output: W,
    ) -> Self {
        Self {
            resolver,
            translator,
            speech,
            context,
            default_volume: context.volume,
            source_language: Language::default(),
            input,
            output,
        }
    }

    /// Language the FAQ answers are written in.
    pub fn with_source_language(mut self, language: Language) -> Self {
        self.source_language = language;
        self.context.language = language;
        self
    }

    /// Consumes the session, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Greets the user and processes turns until quit or end of input.
    ///
    /// # Errors
    /// Returns an error if the terminal streams fail.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the Customer Care Chatbot!")?;
        writeln!(
            self.output,
            "You can either speak or type your question. Type or say 'quit' to exit."
        )?;
        while self.process_iteration().await? {}
        writeln!(self.output, "Chatbot session ended.")?;
        Ok(())
    }

    /// Executes one turn.
    ///
    /// # Returns
    /// * `Ok(true)` to keep looping, `Ok(false)` to exit.
    async fn process_iteration(&mut self) -> Result<bool> {
        let Some(mode) = self.context.mode else {
            return match self.choose_mode().await? {
                Some(mode) => {
                    self.context.mode = Some(mode);
                    Ok(true)
                }
                None => Ok(false),
            };
        };
        if !self.adjust_volume()? {
            return Ok(false);
        }
        let user_text = match mode {
            Mode::Speak => match self.listen().await? {
                Some(text) => text,
                None => return Ok(true),
            },
            Mode::Write => match self.prompt("You: ")? {
                Some(line) => trim_utterance(&line).to_string(),
                None => return Ok(false),
            },
        };
        if user_text.eq_ignore_ascii_case(QUIT_WORD) {
            self.farewell(mode).await?;
            return Ok(false);
        }
        if user_text.is_empty() {
            return Ok(true);
        }
        match mode {
            Mode::Speak => writeln!(self.output, "You said: {}", user_text)?,
            Mode::Write => writeln!(self.output, "You wrote: {}", user_text)?,
        }
        let resolution = self.resolver.resolve(&user_text).await;
        self.deliver(resolution, mode).await?;
        Ok(true)
    }

    /// Asks for a mode until a valid one or quit is entered.
    ///
    /// # Returns
    /// * `Ok(Some(mode))` - Mode chosen.
    /// * `Ok(None)` - User quit or input ended.
    async fn choose_mode(&mut self) -> Result<Option<Mode>> {
        loop {
            let choice = match self
                .prompt("Would you like to speak or write your question? (Type 'speak' or 'write'): ")?
            {
                Some(choice) => choice.to_lowercase(),
                None => return Ok(None),
            };
            match choice.as_str() {
                QUIT_WORD => {
                    writeln!(self.output, "Chatbot: Goodbye!")?;
                    self.say(TYPED_FAREWELL, self.context.voice()).await;
                    return Ok(None);
                }
                "write" => return Ok(Some(Mode::Write)),
                "speak" if self.speech.is_none() => {
                    writeln!(
                        self.output,
                        "Voice mode needs speech credentials. Please type 'write'."
                    )?;
                }
                "speak" => {
                    if !self.choose_language().await? {
                        return Ok(None);
                    }
                    return Ok(Some(Mode::Speak));
                }
                _ => writeln!(self.output, "Invalid choice. Please type 'speak' or 'write'.")?,
            }
        }
    }

    /// Reads the response language; `Ok(false)` when input ended.
    async fn choose_language(&mut self) -> Result<bool> {
        writeln!(self.output, "Available languages: {}", Language::menu())?;
        let code = match self.prompt("Select your preferred language code for responses: ")? {
            Some(code) => code,
            None => return Ok(false),
        };
        match code.parse::<Language>() {
            Ok(language) => {
                self.context.language = language;
                writeln!(
                    self.output,
                    "Language set to {} ({})",
                    language.display_name(),
                    language.code()
                )?;
                let announcement = format!("Language set to {}.", language.display_name());
                self.say(&announcement, self.context.voice_for(self.source_language))
                    .await;
            }
            Err(err) => {
                info!(error = %err, "falling back to source language");
                self.context.language = self.source_language;
                writeln!(
                    self.output,
                    "Invalid language code. Defaulting to {}.",
                    self.source_language.display_name()
                )?;
            }
        }
        Ok(true)
    }

    /// Offers a volume change when voice output is available.
    ///
    /// # Returns
    /// * `Ok(false)` when input ended.
    fn adjust_volume(&mut self) -> Result<bool> {
        if self.speech.is_none() {
            return Ok(true);
        }
        let answer = match self
            .prompt("Would you like to adjust the volume? (Type 'yes' to adjust, 'no' to continue): ")?
        {
            Some(answer) => answer.to_lowercase(),
            None => return Ok(false),
        };
        if answer != "yes" {
            return Ok(true);
        }
        let message = format!(
            "Set the volume level (0-100, default is {}): ",
            self.default_volume
        );
        let level = match self.prompt(&message)? {
            Some(level) => level,
            None => return Ok(false),
        };
        match level.parse::<i64>() {
            Ok(level) => {
                self.context.set_volume(level);
                writeln!(self.output, "Volume set to {}.", self.context.volume)?;
            }
            Err(_) => writeln!(self.output, "Invalid input. Volume remains unchanged.")?,
        }
        Ok(true)
    }

    /// Listens for one utterance; `None` means re-prompt.
    async fn listen(&mut self) -> Result<Option<String>> {
        let Some(speech) = self.speech.as_ref() else {
            return Ok(None);
        };
        writeln!(self.output, "Listening... (Say 'quit' to exit chatbot)")?;
        self.output.flush()?;
        match speech.recognizer.recognize(self.source_language).await {
            Recognition::Recognized(text) => Ok(Some(text)),
            Recognition::NoSpeech => {
                writeln!(self.output, "No speech recognized. Please try again.")?;
                Ok(None)
            }
            Recognition::Failed(reason) => {
                warn!(%reason, "speech recognition failed");
                writeln!(self.output, "Speech recognition error: {}", reason)?;
                Ok(None)
            }
        }
    }

    async fn farewell(&mut self, mode: Mode) -> Result<()> {
        let spoken = match mode {
            Mode::Speak => {
                writeln!(self.output, "Exiting chatbot. Goodbye!")?;
                SPOKEN_FAREWELL
            }
            Mode::Write => {
                writeln!(self.output, "Chatbot: Goodbye!")?;
                TYPED_FAREWELL
            }
        };
        self.say(spoken, self.context.voice_for(self.source_language)).await;
        Ok(())
    }

    /// Prints, localizes and speaks the outcome of one turn.
    async fn deliver(&mut self, resolution: Resolution, mode: Mode) -> Result<()> {
        let is_greeting = resolution.is_greeting();
        let Some(answer) = resolution.text() else {
            let apology = match mode {
                Mode::Speak => SPOKEN_APOLOGY,
                Mode::Write => WRITTEN_APOLOGY,
            };
            writeln!(self.output, "Chatbot: {}", apology)?;
            if mode == Mode::Speak {
                self.say(apology, self.context.voice_for(self.source_language)).await;
            }
            return Ok(());
        };
        let language = self.context.language;
        let localized = localize(
            self.translator.as_ref(),
            answer,
            language,
            self.source_language,
        )
        .await;
        if is_greeting {
            writeln!(self.output, "Chatbot: {}", localized)?;
        } else {
            writeln!(
                self.output,
                "Chatbot Response ({}): {}",
                language.display_name(),
                localized
            )?;
        }
        let voice = if is_translation_error(&localized) {
            warn!(%language, "translation failed; answering in source voice");
            self.context.voice_for(self.source_language)
        } else {
            self.context.voice()
        };
        self.say(&localized, voice).await;
        Ok(())
    }

    async fn say(&self, text: &str, voice: VoiceSettings) {
        if let Some(speech) = self.speech.as_ref() {
            speak_or_log(speech.synthesizer.as_ref(), text, &voice).await;
        }
    }

    /// Writes `message` and reads one trimmed line; `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
