/*
 * @file lib.rs
 * @brief Carebot library root
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

//! Customer-care chatbot.
//!
//! Answers typed or spoken questions from a fixed FAQ table, falls back to
//! a local generative model, optionally translates the answer and speaks
//! it back in the chosen language:
//! - [`faq`] holds the canned question/answer table
//! - [`resolver`] picks the answer for one turn
//! - [`translate`] and [`speech`] wrap the cloud services
//! - [`session`] runs the interactive loop
//!
//! # Example
//! ```no_run
//! use anyhow::Result;
//! use carebot::config::{AppConfig, SpeechCredentials, CONFIG_PATH};
//! use std::path::Path;
//! use carebot::session;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     dotenv::dotenv().ok();
//!     let config = AppConfig::load(Path::new(CONFIG_PATH));
//!     session::run_chat_session(&config, Some(SpeechCredentials::from_env()?)).await
//! }
//! ```

pub mod audio;
pub mod config;
pub mod faq;
pub mod generator;
pub mod greeting;
pub mod interpreter;
pub mod language;
pub mod resolver;
pub mod session;
pub mod speech;
pub mod translate;

#[cfg(test)]
mod testing;
