/*
 * @file speech.rs
 * @brief Speech recognition and synthesis adapters
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

//! Speech input and output.
//!
//! Recognition and synthesis go through the cloud speech service's REST
//! endpoints; capture and playback use the local audio devices.

use crate::audio::{
    contains_speech, decode_wav, encode_wav, play_audio, record_audio, Pcm, SAMPLE_RATE,
};
use crate::config::SpeechCredentials;
use crate::language::Language;
use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::escape::escape;
use serde::Deserialize;
use tracing::{debug, warn};

/// Output format requested from the synthesis endpoint.
const SYNTHESIS_FORMAT: &str = "riff-16khz-16bit-mono-pcm";

/// Voice and loudness used for one synthesis call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoiceSettings {
    pub language: Language,
    /// Loudness in `0..=100`.
    pub volume: u8,
}

/// Result of one listening attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recognition {
    /// Recognized text with surrounding punctuation removed.
    Recognized(String),
    /// Nothing intelligible was heard.
    NoSpeech,
    /// The service or the microphone failed; carries the reason.
    Failed(String),
}

/// Speech-to-text collaborator.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listens for one utterance in `language`.
    async fn recognize(&self, language: Language) -> Recognition;
}

/// Text-to-speech collaborator.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speaks `text` with `voice`, blocking until playback finishes.
    async fn speak(&self, text: &str, voice: &VoiceSettings) -> Result<()>;
}

/// Speaks `text`, logging instead of returning failures.
pub async fn speak_or_log<S>(synthesizer: &S, text: &str, voice: &VoiceSettings)
where
    S: SpeechSynthesizer + ?Sized,
{
    if let Err(err) = synthesizer.speak(text, voice).await {
        warn!(voice = voice.language.voice(), error = %err, "TTS error");
    }
}

/// Strips `.`, `!`, `?`, newlines and spaces from both ends of an utterance.
pub fn trim_utterance(text: &str) -> &str {
    text.trim_matches(|c: char| matches!(c, '.' | '!' | '?' | '\n' | '\r' | ' '))
}

/// Short-audio recognition response body.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecognitionResponse {
    recognition_status: String,
    #[serde(default)]
    display_text: String,
}

/// REST client for the cloud speech service.
pub struct CloudSpeech {
    client: reqwest::Client,
    key: String,
    stt_url: String,
    tts_url: String,
}

impl CloudSpeech {
    /// Builds a client for the regional endpoints of `credentials`.
    pub fn new(credentials: &SpeechCredentials) -> Self {
        let region = &credentials.region;
        Self::with_endpoints(
            credentials.key.clone(),
            format!(
                "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1",
                region
            ),
            format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1", region),
        )
    }

    /// Builds a client against explicit endpoint URLs.
    pub fn with_endpoints(
        key: impl Into<String>,
        stt_url: impl Into<String>,
        tts_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            key: key.into(),
            stt_url: stt_url.into(),
            tts_url: tts_url.into(),
        }
    }

    /// Sends captured samples for recognition.
    ///
    /// # Returns
    /// * `Recognition` - Text, a no-speech signal, or the failure reason.
    pub async fn transcribe(&self, samples: &[i16], language: Language) -> Recognition {
        match self.request_transcription(samples, language).await {
            Ok(recognition) => recognition,
            Err(err) => Recognition::Failed(format!("{:#}", err)),
        }
    }

    /// Posts the samples as WAV and parses the service reply.
    async fn request_transcription(
        &self,
        samples: &[i16],
        language: Language,
    ) -> Result<Recognition> {
        let wav = encode_wav(samples)?;
        let body: RecognitionResponse = self
            .client
            .post(&self.stt_url)
            .query(&[("language", language.locale()), ("format", "simple")])
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("audio/wav; codecs=audio/pcm; samplerate={}", SAMPLE_RATE),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .body(wav)
            .send()
            .await
            .with_context(|| "Failed to reach speech recognition service")?
            .error_for_status()
            .with_context(|| "Speech recognition service rejected the request")?
            .json()
            .await
            .with_context(|| "Failed to parse recognition response")?;
        Ok(interpret_recognition(body))
    }

    /// Requests synthesized audio for `text`.
    ///
    /// # Errors
    /// Returns an error on empty text, transport failure, or bad audio.
    pub async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Pcm> {
        if text.trim().is_empty() {
            anyhow::bail!("Cannot speak empty text");
        }
        let bytes = self
            .client
            .post(&self.tts_url)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", SYNTHESIS_FORMAT)
            .header(reqwest::header::USER_AGENT, "carebot")
            .body(build_ssml(text, voice))
            .send()
            .await
            .with_context(|| "Failed to reach speech synthesis service")?
            .error_for_status()
            .with_context(|| "Speech synthesis service rejected the request")?
            .bytes()
            .await
            .with_context(|| "Failed to download synthesized audio")?;
        decode_wav(&bytes)
    }
}

#[async_trait]
impl SpeechRecognizer for CloudSpeech {
    async fn recognize(&self, language: Language) -> Recognition {
        let samples = match tokio::task::spawn_blocking(record_audio).await {
            Ok(Ok(samples)) => samples,
            Ok(Err(err)) => return Recognition::Failed(format!("microphone error: {:#}", err)),
            Err(err) => return Recognition::Failed(format!("recording task failed: {}", err)),
        };
        if !contains_speech(&samples) {
            debug!("recording below silence threshold");
            return Recognition::NoSpeech;
        }
        self.transcribe(&samples, language).await
    }
}

#[async_trait]
impl SpeechSynthesizer for CloudSpeech {
    async fn speak(&self, text: &str, voice: &VoiceSettings) -> Result<()> {
        let pcm = self.synthesize(text, voice).await?;
        tokio::task::spawn_blocking(move || play_audio(&pcm))
            .await
            .with_context(|| "Playback task failed")?
    }
}

/// Maps a recognition status onto `Recognition`.
fn interpret_recognition(body: RecognitionResponse) -> Recognition {
    match body.recognition_status.as_str() {
        "Success" => {
            let text = trim_utterance(&body.display_text);
            if text.is_empty() {
                Recognition::NoSpeech
            } else {
                Recognition::Recognized(text.to_string())
            }
        }
        "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout" => Recognition::NoSpeech,
        other => Recognition::Failed(other.to_string()),
    }
}

/// Wraps `text` in an SSML document for the voice and volume.
fn build_ssml(text: &str, voice: &VoiceSettings) -> String {
    format!(
        "<speak version='1.0' xml:lang='{}'><voice name='{}'><prosody volume='{}'>{}</prosody></voice></speak>",
        voice.language.locale(),
        voice.language.voice(),
        voice.volume.min(100),
        escape(text)
    )
}
