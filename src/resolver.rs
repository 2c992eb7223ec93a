/*
 * @file resolver.rs
 * @brief Response resolution for one chat turn
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

//! Turns one user utterance into an answer.
//!
//! Resolution order: greeting set, exact FAQ match, substring FAQ match,
//! then the generative fallback.

use crate::faq::{canonicalize, FaqStore};
use crate::generator::Generator;
use crate::greeting::{greet, is_greeting};
use chrono::{Local, NaiveTime};
use tracing::{debug, info};

/// Where an answer came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerSource {
    Greeting,
    Faq,
    Generated,
}

/// Outcome of resolving one turn.
///
/// `NoAnswer` carries no text; the caller picks the apology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Answered { text: String, source: AnswerSource },
    NoAnswer,
}

impl Resolution {
    /// Answer text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Resolution::Answered { text, .. } => Some(text),
            Resolution::NoAnswer => None,
        }
    }

    /// Whether the answer came from the greeting set.
    pub fn is_greeting(&self) -> bool {
        matches!(
            self,
            Resolution::Answered {
                source: AnswerSource::Greeting,
                ..
            }
        )
    }

    fn answered(text: impl Into<String>, source: AnswerSource) -> Self {
        Resolution::Answered {
            text: text.into(),
            source,
        }
    }
}

/// Response resolver over an immutable FAQ table and a generator.
pub struct Resolver<G> {
    faq: FaqStore,
    generator: G,
}

impl<G: Generator> Resolver<G> {
    /// Creates a resolver over `faq` backed by `generator`.
    pub fn new(faq: FaqStore, generator: G) -> Self {
        Self { faq, generator }
    }

    /// FAQ table consulted before the generator.
    pub fn faq(&self) -> &FaqStore {
        &self.faq
    }

    /// Resolves `raw_text` using the local wall-clock time for greetings.
    pub async fn resolve(&self, raw_text: &str) -> Resolution {
        self.resolve_at(raw_text, Local::now().time()).await
    }

    /// Resolves `raw_text` as if the current time were `now`.
    ///
    /// # Arguments
    /// * `raw_text` - Unprocessed user input.
    /// * `now` - Time of day used for greeting selection.
    ///
    /// # Returns
    /// * `Resolution` - The answer and its source, or `NoAnswer`.
    pub async fn resolve_at(&self, raw_text: &str, now: NaiveTime) -> Resolution {
        let question = canonicalize(raw_text);
        if question.is_empty() {
            return Resolution::NoAnswer;
        }
        if is_greeting(&question) {
            return Resolution::answered(greet(&now), AnswerSource::Greeting);
        }
        if let Some(answer) = self.faq.find(&question) {
            debug!(%question, "FAQ hit");
            return Resolution::answered(answer, AnswerSource::Faq);
        }
        match self.generator.generate(raw_text).await {
            Ok(answer) if !answer.trim().is_empty() => {
                Resolution::answered(answer, AnswerSource::Generated)
            }
            Ok(_) => Resolution::NoAnswer,
            Err(err) => {
                info!(%question, error = %err, "no answer available");
                Resolution::NoAnswer
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faq::{default_faq, FaqEntry};
    use crate::generator::GenerationError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Generator double that records every question it receives.
    struct ScriptedGenerator {
        reply: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn replying(reply: &'static str) -> Self {
            Self {
                reply: Some(reply),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(&self, question: &str) -> Result<String, GenerationError> {
            self.calls.lock().unwrap().push(question.to_string());
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(GenerationError::Status(503)),
            }
        }
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 30, 0).expect("valid time")
    }

    #[tokio::test]
    async fn faq_hit_bypasses_generator() {
        let resolver = Resolver::new(default_faq(), ScriptedGenerator::failing());
        for input in [
            "What is your return policy?",
            "  WHAT IS YOUR RETURN POLICY!! ",
            "what is your return policy.\n",
        ] {
            assert_eq!(
                resolver.resolve_at(input, noon()).await,
                Resolution::Answered {
                    text: "Our return policy allows returns within 30 days of purchase.".to_string(),
                    source: AnswerSource::Faq,
                }
            );
        }
        assert!(resolver.generator.calls().is_empty());
    }

    #[tokio::test]
    async fn every_stored_question_resolves_to_its_answer() {
        let resolver = Resolver::new(default_faq(), ScriptedGenerator::failing());
        for entry in resolver.faq().entries().iter().filter(|e| !is_greeting(&e.question)) {
            let shouted = format!(" {}? ", entry.question.to_uppercase());
            let resolution = resolver.resolve_at(&shouted, noon()).await;
            assert_eq!(resolution.text(), Some(entry.answer.as_str()), "{}", entry.question);
        }
        assert!(resolver.generator.calls().is_empty());
    }

    #[tokio::test]
    async fn greetings_override_faq_entries() {
        let faq = FaqStore::from_entries(vec![FaqEntry::new("hello", "canned hello")]);
        let resolver = Resolver::new(faq, ScriptedGenerator::failing());
        for input in ["HELLO", " Good Morning! ", "hi"] {
            let resolution = resolver.resolve_at(input, noon()).await;
            assert!(resolution.is_greeting());
            assert_eq!(resolution.text(), Some("Good afternoon! How can I assist you?"));
        }
        assert!(resolver.generator.calls().is_empty());
    }

    #[tokio::test]
    async fn miss_uses_generator_once_with_raw_text() {
        let resolver = Resolver::new(default_faq(), ScriptedGenerator::replying("I don't know"));
        let resolution = resolver.resolve_at("banana", noon()).await;
        assert_eq!(
            resolution,
            Resolution::Answered {
                text: "I don't know".to_string(),
                source: AnswerSource::Generated,
            }
        );
        assert_eq!(resolver.generator.calls(), vec!["banana".to_string()]);

        let other = Resolver::new(default_faq(), ScriptedGenerator::replying("ok"));
        other.resolve_at("  Why Is The Sky Blue?", noon()).await;
        assert_eq!(other.generator.calls(), vec!["  Why Is The Sky Blue?".to_string()]);
    }

    #[tokio::test]
    async fn generator_failure_means_no_answer() {
        let resolver = Resolver::new(default_faq(), ScriptedGenerator::failing());
        assert_eq!(resolver.resolve_at("banana", noon()).await, Resolution::NoAnswer);
        assert_eq!(resolver.generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn blank_generation_means_no_answer() {
        let resolver = Resolver::new(default_faq(), ScriptedGenerator::replying("  "));
        assert_eq!(resolver.resolve_at("banana", noon()).await, Resolution::NoAnswer);
    }

    #[tokio::test]
    async fn empty_input_skips_generator() {
        let resolver = Resolver::new(default_faq(), ScriptedGenerator::replying("unused"));
        assert_eq!(resolver.resolve_at(" ?! ", noon()).await, Resolution::NoAnswer);
        assert!(resolver.generator.calls().is_empty());
    }

    #[tokio::test]
    async fn substring_match_precedes_generator() {
        let resolver = Resolver::new(default_faq(), ScriptedGenerator::replying("unused"));
        assert_eq!(
            resolver.resolve_at("Track my order", noon()).await.text(),
            Some("You can track your order through the 'My Orders' section on our website.")
        );
        assert_eq!(
            resolver.resolve_at("how can i track my order please", noon()).await.text(),
            Some("You can track your order through the 'My Orders' section on our website.")
        );
        assert!(resolver.generator.calls().is_empty());
    }
}
