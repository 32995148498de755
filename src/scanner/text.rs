//! Text-layer scanner.
//!
//! Reads the extracted text of one page line by line. A line starting with a
//! question number (`12.` or `12)`) opens that question; the following lines
//! are searched for a mark until one resolves it or the next header replaces
//! it. Questions that never resolve are left out of the result.
//!
//! Mark rules, evaluated on the uppercased line:
//!
//! 1. Multiple choice: an option label (`A)` / `A.` through `E)` / `E.`)
//!    followed anywhere later by the mark glyph `X`. Labels are tried in order
//!    A to E and the first hit wins.
//! 2. True/false, only when rule 1 did not fire: the line is cut at its last
//!    `X`. If only `V` occurs before the cut the answer is `v`, if only `F`
//!    occurs it is `f`. Both or neither means no detection.

use lazy_static::lazy_static;
use regex::Regex;

use crate::answers::{DetectedAnswers, QuestionNumber, Symbol};

/// Glyph students use to mark the chosen option.
pub const MARK_GLYPH: char = 'X';

lazy_static! {
    static ref QUESTION_HEADER: Regex = Regex::new(r"^\s*(\d+)[.)]\s*").unwrap();
    static ref OPTION_MARKS: [(Symbol, Regex); 5] = Symbol::MULTIPLE_CHOICE.map(|symbol| {
        let pattern = format!(r"{}[).].*{}", symbol.label(), MARK_GLYPH);
        (symbol, Regex::new(&pattern).unwrap())
    });
}

/// Scanner state between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// No open question
    #[default]
    AwaitingHeader,
    /// Question header seen, looking for its mark
    AwaitingMark(QuestionNumber),
}

impl ScanState {
    /// Advance over one uppercased line.
    ///
    /// Returns the next state and the answer resolved on this line, if any.
    /// Header lines are never inspected for marks.
    pub fn step(self, line: &str) -> (ScanState, Option<(QuestionNumber, Symbol)>) {
        if let Some(caps) = QUESTION_HEADER.captures(line) {
            let next = match caps[1].parse::<QuestionNumber>() {
                Ok(question) if question > 0 => ScanState::AwaitingMark(question),
                _ => ScanState::AwaitingHeader,
            };
            return (next, None);
        }

        match self {
            ScanState::AwaitingHeader => (self, None),
            ScanState::AwaitingMark(question) => match detect_mark(line) {
                Some(symbol) => (ScanState::AwaitingHeader, Some((question, symbol))),
                None => (self, None),
            },
        }
    }
}

/// Detect a marked option on an uppercased line.
pub fn detect_mark(line: &str) -> Option<Symbol> {
    detect_multiple_choice(line).or_else(|| detect_true_false(line))
}

fn detect_multiple_choice(line: &str) -> Option<Symbol> {
    OPTION_MARKS
        .iter()
        .find(|(_, pattern)| pattern.is_match(line))
        .map(|(symbol, _)| *symbol)
}

fn detect_true_false(line: &str) -> Option<Symbol> {
    let mark = line.rfind(MARK_GLYPH)?;
    let before = &line[..mark];
    let mut present = Symbol::TRUE_FALSE
        .into_iter()
        .filter(|symbol| before.contains(symbol.label()));
    match (present.next(), present.next()) {
        (Some(symbol), None) => Some(symbol),
        _ => None,
    }
}

/// Scan the full text of one page.
///
/// Pure and deterministic; empty text yields an empty mapping. If a page
/// resolves the same question twice the later line wins.
pub fn scan_text(page_text: &str) -> DetectedAnswers {
    let text = page_text.to_uppercase();
    let mut state = ScanState::default();
    let mut answers = DetectedAnswers::new();

    for line in text.lines() {
        let (next, resolved) = state.step(line);
        if let Some((question, symbol)) = resolved {
            log::debug!("Question {} marked '{}' in text layer", question, symbol);
            answers.insert(question, symbol);
        }
        state = next;
    }

    if let ScanState::AwaitingMark(question) = state {
        log::debug!("Question {} has no mark before end of page", question);
    }

    answers
}
