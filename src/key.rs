//! Answer key parsing.
//!
//! Keys are written as comma/semicolon separated `<question><sep><symbol>`
//! tokens, e.g. `1:a, 2-d; 3) e, 4 v, 5:F`. Accepted separators are `:`, `-`,
//! `)` and plain whitespace.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::answers::{AnswerKey, QuestionNumber, Symbol};
use crate::error::{Error, Result};

lazy_static! {
    static ref TOKEN_SPLIT: Regex = Regex::new(r"[;,]+").unwrap();
    static ref PUNCTUATED_TOKEN: Regex = Regex::new(r"(?i)^(\d+)\s*[:\-)]\s*([a-evf])$").unwrap();
    static ref SPACED_TOKEN: Regex = Regex::new(r"(?i)^(\d+)\s+([a-evf])$").unwrap();
}

/// Parse a single key token such as `3:b` or `4 v`.
fn parse_token(token: &str) -> Option<(QuestionNumber, Symbol)> {
    let caps = PUNCTUATED_TOKEN
        .captures(token)
        .or_else(|| SPACED_TOKEN.captures(token))?;

    let question: QuestionNumber = caps[1].parse().ok()?;
    if question == 0 {
        return None;
    }
    let symbol = caps[2].chars().next().and_then(Symbol::from_char)?;
    Some((question, symbol))
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    TOKEN_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Parse an answer key, skipping malformed tokens.
///
/// A repeated question number keeps the last value given.
pub fn parse_answer_key(text: &str) -> AnswerKey {
    let mut key = AnswerKey::new();
    for token in tokens(text) {
        match parse_token(token) {
            Some((question, symbol)) => {
                key.insert(question, symbol);
            },
            None => log::debug!("Skipping malformed answer key token '{}'", token),
        }
    }
    key
}

impl FromStr for AnswerKey {
    type Err = Error;

    /// Strict parse: the first malformed token is an error.
    fn from_str(s: &str) -> Result<Self> {
        let mut key = AnswerKey::new();
        for token in tokens(s) {
            let (question, symbol) =
                parse_token(token).ok_or_else(|| Error::InvalidAnswerKey(token.to_string()))?;
            key.insert(question, symbol);
        }
        Ok(key)
    }
}
