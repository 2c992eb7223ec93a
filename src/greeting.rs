/*
 * @file greeting.rs
 * @brief Time-of-day greeting service
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

//! Time-of-day greetings.

use chrono::Timelike;

/// Inputs (canonical form) answered with a time-of-day greeting.
pub const GREETINGS: [&str; 5] = ["good morning", "good afternoon", "good evening", "hello", "hi"];

const MORNING: &str = "Good morning! How can I assist you?";
const AFTERNOON: &str = "Good afternoon! How can I assist you?";
const EVENING: &str = "Good evening! How can I assist you?";

/// Returns the greeting for the hour of `now`.
///
/// Morning covers 05:00-11:59, afternoon 12:00-17:59, evening the rest.
pub fn greet<T: Timelike>(now: &T) -> &'static str {
    match now.hour() {
        5..=11 => MORNING,
        12..=17 => AFTERNOON,
        _ => EVENING,
    }
}

/// True when the canonical input belongs to the greeting set.
pub fn is_greeting(canonical: &str) -> bool {
    GREETINGS.contains(&canonical)
}
