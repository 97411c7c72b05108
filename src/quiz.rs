//! True/false quiz
//!
//! Questions are static catalog data. A session's score only ever grows and
//! an already answered question is never re-scored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Button token prefix for a "true" answer
pub const ANSWER_TRUE_PREFIX: &str = "tf_true:";
/// Button token prefix for a "false" answer
pub const ANSWER_FALSE_PREFIX: &str = "tf_false:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub correct_answer: bool,
    pub feedback_if_correct: String,
    pub feedback_if_incorrect: String,
}

impl QuizQuestion {
    pub fn feedback(&self, verdict: AnswerVerdict) -> Option<&str> {
        match verdict {
            AnswerVerdict::Correct => Some(self.feedback_if_correct.as_str()),
            AnswerVerdict::Incorrect => Some(self.feedback_if_incorrect.as_str()),
            AnswerVerdict::AlreadyAnswered => None,
        }
    }
}

/// All questions, keyed by the code participants type to open them
#[derive(Debug, Clone, Default)]
pub struct QuizBank {
    questions: BTreeMap<String, QuizQuestion>,
}

impl QuizBank {
    pub fn new(questions: BTreeMap<String, QuizQuestion>) -> Self {
        Self { questions }
    }

    pub fn get(&self, key: &str) -> Option<&QuizQuestion> {
        self.questions.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.questions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.questions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Open the question named by `key`
    pub fn ask<'a>(&'a self, score: &QuizScore, key: &str) -> AskOutcome<'a> {
        if score.is_complete(self.len()) {
            return AskOutcome::AllAnswered;
        }
        match self.questions.get_key_value(key) {
            Some(_) if score.contains(key) => AskOutcome::AlreadyAnswered,
            Some((key, question)) => AskOutcome::Question {
                key: key.as_str(),
                question,
            },
            None => AskOutcome::UnknownQuestion,
        }
    }

    /// Judge an answer without recording it
    pub fn judge(&self, score: &QuizScore, key: &str, given: bool) -> Option<AnswerVerdict> {
        let question = self.questions.get(key)?;
        Some(if score.contains(key) {
            AnswerVerdict::AlreadyAnswered
        } else if question.correct_answer == given {
            AnswerVerdict::Correct
        } else {
            AnswerVerdict::Incorrect
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome<'a> {
    Question {
        key: &'a str,
        question: &'a QuizQuestion,
    },
    AlreadyAnswered,
    AllAnswered,
    UnknownQuestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerVerdict {
    Correct,
    Incorrect,
    AlreadyAnswered,
}

/// Per-session score: question key to "answered correctly"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    answers: BTreeMap<String, bool>,
}

impl QuizScore {
    pub fn contains(&self, key: &str) -> bool {
        self.answers.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.answers.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.values().filter(|correct| **correct).count()
    }

    pub fn is_complete(&self, total: usize) -> bool {
        self.answers.len() >= total
    }

    /// Record a result unless the question was already answered.
    ///
    /// Returns `false` (and changes nothing) for a repeat.
    pub fn record(&mut self, key: &str, correct: bool) -> bool {
        if self.answers.contains_key(key) {
            return false;
        }
        self.answers.insert(key.to_string(), correct);
        true
    }

    /// Judge and record in one step
    #[cfg(test)]
    pub fn answer(&mut self, bank: &QuizBank, key: &str, given: bool) -> Option<AnswerVerdict> {
        let verdict = bank.judge(self, key, given)?;
        if verdict != AnswerVerdict::AlreadyAnswered {
            self.record(key, verdict == AnswerVerdict::Correct);
        }
        Some(verdict)
    }
}

/// Parse an answer button token into `(question key, given answer)`
pub fn parse_answer_token(token: &str) -> Option<(&str, bool)> {
    if let Some(key) = token.strip_prefix(ANSWER_TRUE_PREFIX) {
        Some((key, true))
    } else {
        token
            .strip_prefix(ANSWER_FALSE_PREFIX)
            .map(|key| (key, false))
    }
}

pub fn answer_token(key: &str, given: bool) -> String {
    let prefix = if given {
        ANSWER_TRUE_PREFIX
    } else {
        ANSWER_FALSE_PREFIX
    };
    format!("{prefix}{key}")
}
