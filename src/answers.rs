//! Answer symbols, answer keys and detected answers.
//!
//! Both [`AnswerKey`] and [`DetectedAnswers`] map 1-based question numbers to a
//! [`Symbol`]. The difference is in what absence means: every question in a key
//! has an expected answer, while a question missing from `DetectedAnswers` was
//! simply not recognised on the sheet (which is not the same as a wrong answer).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 1-based question number.
pub type QuestionNumber = u32;

/// An answer symbol: a multiple-choice option or a true/false value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    /// Option a
    A,
    /// Option b
    B,
    /// Option c
    C,
    /// Option d
    D,
    /// Option e
    E,
    /// Verdadero (true)
    V,
    /// Falso (false)
    F,
}

impl Symbol {
    /// Multiple-choice options in scan order.
    pub const MULTIPLE_CHOICE: [Symbol; 5] = [Symbol::A, Symbol::B, Symbol::C, Symbol::D, Symbol::E];

    /// True/false options.
    pub const TRUE_FALSE: [Symbol; 2] = [Symbol::V, Symbol::F];

    /// Parse a symbol from a single character, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(Self::A),
            'b' => Some(Self::B),
            'c' => Some(Self::C),
            'd' => Some(Self::D),
            'e' => Some(Self::E),
            'v' => Some(Self::V),
            'f' => Some(Self::F),
            _ => None,
        }
    }

    /// Multiple-choice option for a zero-based slot index (0 = a).
    pub fn from_option_slot(slot: usize) -> Option<Self> {
        Self::MULTIPLE_CHOICE.get(slot).copied()
    }

    /// Normalized (lowercase) character for this symbol.
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'a',
            Self::B => 'b',
            Self::C => 'c',
            Self::D => 'd',
            Self::E => 'e',
            Self::V => 'v',
            Self::F => 'f',
        }
    }

    /// Uppercase label as it appears on a printed sheet.
    pub fn label(self) -> char {
        self.as_char().to_ascii_uppercase()
    }

    /// Whether this is a true/false symbol.
    pub fn is_true_false(self) -> bool {
        Self::TRUE_FALSE.contains(&self)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The instructor-supplied mapping from question number to correct symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKey {
    entries: BTreeMap<QuestionNumber, Symbol>,
}

impl AnswerKey {
    /// Create an empty key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected symbol for a question, replacing any previous value.
    pub fn insert(&mut self, question: QuestionNumber, symbol: Symbol) -> Option<Symbol> {
        self.entries.insert(question, symbol)
    }

    /// Expected symbol for a question.
    pub fn get(&self, question: QuestionNumber) -> Option<Symbol> {
        self.entries.get(&question).copied()
    }

    /// Number of questions in the key.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the key has no questions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(question, symbol)` pairs in question order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionNumber, Symbol)> + '_ {
        self.entries.iter().map(|(&q, &s)| (q, s))
    }
}

impl FromIterator<(QuestionNumber, Symbol)> for AnswerKey {
    fn from_iter<I: IntoIterator<Item = (QuestionNumber, Symbol)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (question, symbol) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", question, symbol)?;
            first = false;
        }
        Ok(())
    }
}

/// Answers recovered from one student's document.
///
/// May cover only a subset of the questions; absent entries mean "not recognised".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedAnswers {
    entries: BTreeMap<QuestionNumber, Symbol>,
}

impl DetectedAnswers {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a detection, replacing a previous detection for the same question.
    pub fn insert(&mut self, question: QuestionNumber, symbol: Symbol) -> Option<Symbol> {
        self.entries.insert(question, symbol)
    }

    /// Merge detections from a later page.
    ///
    /// Questions already present are kept (first writer wins). Returns the
    /// number of newly added questions.
    pub fn merge_missing(&mut self, later: DetectedAnswers) -> usize {
        let mut added = 0;
        for (question, symbol) in later.entries {
            if let std::collections::btree_map::Entry::Vacant(slot) = self.entries.entry(question) {
                slot.insert(symbol);
                added += 1;
            }
        }
        added
    }

    /// Detected symbol for a question, `None` when nothing was recognised.
    pub fn get(&self, question: QuestionNumber) -> Option<Symbol> {
        self.entries.get(&question).copied()
    }

    /// Whether a detection exists for a question.
    pub fn contains(&self, question: QuestionNumber) -> bool {
        self.entries.contains_key(&question)
    }

    /// Number of questions with a detection.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(question, symbol)` pairs in question order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionNumber, Symbol)> + '_ {
        self.entries.iter().map(|(&q, &s)| (q, s))
    }
}

impl FromIterator<(QuestionNumber, Symbol)> for DetectedAnswers {
    fn from_iter<I: IntoIterator<Item = (QuestionNumber, Symbol)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
