/*
 * @file faq.rs
 * @brief FAQ table loading and question matching
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

//! FAQ table loading, canonicalization and question matching.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Punctuation stripped from both ends of a question before matching.
const TRIMMED_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// A single canned question/answer pair.
///
/// # Details
/// `question` is stored in canonical form once the entry lives inside a
/// [`FaqStore`]; entries read from `faq.json` may use any casing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// Question text, canonicalized when loaded into a store.
    pub question: String,
    /// Answer returned verbatim on a match.
    pub answer: String,
}

impl FaqEntry {
    /// Builds an entry from any string-like question and answer.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Immutable mapping from canonical question to canned answer.
///
/// # Details
/// Keeps entries in table order so substring matching has a stable
/// tie-break, plus a hash index for exact lookups. A duplicate canonical
/// question replaces the earlier answer but keeps the earlier position.
#[derive(Clone, Debug, Default)]
pub struct FaqStore {
    entries: Vec<FaqEntry>,
    index: HashMap<String, usize>,
}

impl FaqStore {
    /// Builds a store from entries in table order.
    ///
    /// # Arguments
    /// * `entries` - Question/answer pairs; questions may be non-canonical.
    ///
    /// # Returns
    /// * `FaqStore` - Store keyed by canonical question text.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = FaqEntry>,
    {
        let mut store = Self::default();
        for entry in entries {
            let question = canonicalize(&entry.question);
            match store.index.get(&question) {
                Some(&slot) => store.entries[slot].answer = entry.answer,
                None => {
                    store.index.insert(question.clone(), store.entries.len());
                    store.entries.push(FaqEntry::new(question, entry.answer));
                }
            }
        }
        store
    }

    /// Number of distinct canonical questions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no questions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in table order.
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// Returns the answer stored under exactly `canonical_question`.
    pub fn lookup(&self, canonical_question: &str) -> Option<&str> {
        self.index
            .get(canonical_question)
            .map(|&slot| self.entries[slot].answer.as_str())
    }

    /// Returns the answer of the first question (in table order) that
    /// contains `canonical_question` or is contained by it.
    ///
    /// # Details
    /// An empty query never matches; every key would contain it.
    pub fn lookup_substring(&self, canonical_question: &str) -> Option<&str> {
        if canonical_question.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| {
                entry.question.contains(canonical_question)
                    || canonical_question.contains(entry.question.as_str())
            })
            .map(|entry| entry.answer.as_str())
    }

    /// Exact match first, then substring match.
    pub fn find(&self, canonical_question: &str) -> Option<&str> {
        self.lookup(canonical_question)
            .or_else(|| self.lookup_substring(canonical_question))
    }
}

/// Lowercases `text` and trims whitespace plus `.`, `!`, `?` from both ends.
///
/// # Arguments
/// * `text` - Raw user input.
///
/// # Returns
/// * `String` - The canonical form used as the FAQ key.
pub fn canonicalize(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || TRIMMED_PUNCTUATION.contains(&c))
        .to_lowercase()
}

/// Loads the FAQ table from `path`.
///
/// # Details
/// Falls back to [`default_faq`] when the file is missing or malformed so
/// the chatbot can still answer the common questions.
///
/// # Arguments
/// * `path` - Location of the JSON table.
///
/// # Returns
/// * `FaqStore` - Loaded or built-in table.
pub fn load_faq(path: &Path) -> FaqStore {
    match load_faq_from_file(path) {
        Ok(store) => {
            debug!(path = %path.display(), entries = store.len(), "loaded FAQ table");
            store
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "using built-in FAQ table");
            default_faq()
        }
    }
}

/// Reads a JSON array of `{ "question", "answer" }` objects.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_faq_from_file(path: &Path) -> Result<FaqStore> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let entries: Vec<FaqEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(FaqStore::from_entries(entries))
}

/// Built-in customer-care table used when no `faq.json` is available.
pub fn default_faq() -> FaqStore {
    const TABLE: [(&str, &str); 30] = [
        (
            "what is your return policy",
            "Our return policy allows returns within 30 days of purchase.",
        ),
        (
            "how can i track my order",
            "You can track your order through the 'My Orders' section on our website.",
        ),
        (
            "what payment methods do you accept",
            "We accept credit/debit cards, PayPal, and other online payment options.",
        ),
        (
            "do you offer international shipping",
            "Yes, we offer international shipping to select countries.",
        ),
        (
            "how do i cancel my order",
            "To cancel your order, go to 'My Orders' and select 'Cancel Order'.",
        ),
        ("how long does shipping take", "Shipping typically takes 5-7 business days."),
        (
            "can i change my order after placing it",
            "You can change your order within one hour of placing it.",
        ),
        (
            "do you have a loyalty program",
            "Yes, we have a loyalty program that rewards you for every purchase.",
        ),
        (
            "how do i contact customer service",
            "You can contact customer service via email or phone.",
        ),
        (
            "what should i do if i receive a damaged item",
            "Please contact us immediately for a replacement or refund.",
        ),
        ("is there a warranty on products", "Yes, most products come with a one-year warranty."),
        (
            "how can i leave feedback about my experience",
            "You can leave feedback through our website's feedback form.",
        ),
        ("do you offer gift cards", "Yes, we offer gift cards that can be purchased online."),
        ("can i pick up my order in-store", "Yes, in-store pickup is available for select items."),
        (
            "what if i forgot my password",
            "You can reset your password using the 'Forgot Password' link on the login page.",
        ),
        (
            "are there any discounts available right now",
            "Check our website for current promotions and discounts.",
        ),
        (
            "how can i update my address",
            "You can update your address through the 'My Account' section of our website.",
        ),
        (
            "what should i do if i didn’t receive my order",
            "If your order hasn’t arrived, please contact customer service for assistance.",
        ),
        (
            "how do i report a problem with my order",
            "Please contact customer service to report any issues with your order.",
        ),
        (
            "can i speak to a customer care agent",
            "Yes, you can contact our customer care team via phone, email, or live chat.",
        ),
        ("hello", "Hi there! How can I assist you today?"),
        (
            "good morning",
            "Good morning! I hope you have a wonderful day ahead. How can I help you?",
        ),
        ("good evening", "Good evening! How was your day? Let me know how I can assist you."),
        ("how are you", "I'm just a program, but I'm here and ready to help you!"),
        ("what's your name", "I'm your friendly AI assistant, here to make your life easier."),
        (
            "what can you do",
            "I can answer your questions, translate languages, and assist you with various tasks.",
        ),
        ("thank you", "You're welcome! Let me know if there's anything else I can help with."),
        (
            "who are you",
            "I am an AI chatbot designed to assist you with your queries and provide support.",
        ),
        (
            "tell me a joke",
            "Why don’t skeletons fight each other? Because they don’t have the guts!",
        ),
        (
            "how is the weather",
            "I'm not sure, but you can check the weather app for accurate updates.",
        ),
    ];
    FaqStore::from_entries(
        TABLE
            .iter()
            .map(|(question, answer)| FaqEntry::new(*question, *answer)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn canonicalize_strips_case_and_punctuation() {
        assert_eq!(canonicalize("  What is your return policy?\n"), "what is your return policy");
        assert_eq!(canonicalize("HELLO!!!"), "hello");
        assert_eq!(canonicalize("?.!"), "");
    }

    #[test]
    fn canonicalize_keeps_inner_punctuation() {
        assert_eq!(canonicalize("What's your name?"), "what's your name");
        assert_eq!(
            canonicalize("Can I pick up my order in-store."),
            "can i pick up my order in-store"
        );
    }

    #[test]
    fn lookup_requires_exact_key() {
        let store = default_faq();
        assert_eq!(
            store.lookup("how long does shipping take"),
            Some("Shipping typically takes 5-7 business days.")
        );
        assert_eq!(store.lookup("shipping"), None);
    }

    #[test]
    fn substring_matches_in_table_order() {
        let store = FaqStore::from_entries(vec![
            FaqEntry::new("how do i cancel my order", "cancel"),
            FaqEntry::new("how do i report a problem with my order", "report"),
        ]);
        assert_eq!(store.lookup_substring("my order"), Some("cancel"));
        assert_eq!(store.lookup_substring("report a problem"), Some("report"));
    }

    #[test]
    fn substring_matches_when_input_contains_key() {
        let store = default_faq();
        assert_eq!(
            store.lookup_substring("please tell me a joke now"),
            Some("Why don’t skeletons fight each other? Because they don’t have the guts!")
        );
    }

    #[test]
    fn substring_ignores_empty_query() {
        assert_eq!(default_faq().lookup_substring(""), None);
    }

    #[test]
    fn find_prefers_exact_match() {
        let store = FaqStore::from_entries(vec![
            FaqEntry::new("order status help", "first"),
            FaqEntry::new("order status", "exact"),
        ]);
        assert_eq!(store.find("order status"), Some("exact"));
        assert_eq!(store.find("status"), Some("first"));
        assert_eq!(store.find("banana"), None);
    }

    #[test]
    fn duplicate_questions_keep_last_answer_and_first_position() {
        let store = FaqStore::from_entries(vec![
            FaqEntry::new("Refunds?", "old"),
            FaqEntry::new("shipping", "ship"),
            FaqEntry::new("refunds", "new"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("refunds"), Some("new"));
        assert_eq!(store.entries()[0].question, "refunds");
    }

    #[test]
    fn default_table_is_canonical() {
        let store = default_faq();
        assert_eq!(store.len(), 30);
        assert!(store
            .entries()
            .iter()
            .all(|entry| canonicalize(&entry.question) == entry.question));
    }

    #[test]
    fn load_faq_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"question": "Where is my Parcel?", "answer": "On its way."}}]"#
        )
        .expect("write faq");
        let store = load_faq(file.path());
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("where is my parcel"), Some("On its way."));
    }

    #[test]
    fn load_faq_falls_back_on_bad_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write faq");
        assert!(load_faq_from_file(file.path()).is_err());
        assert_eq!(load_faq(file.path()).len(), default_faq().len());
    }
}
