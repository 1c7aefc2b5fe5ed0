use std::path::PathBuf;

use serde::Serialize;

use super::WordRubric;

/// Outcome for one call: either a computed verdict or the reason none could be computed
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallVerdict<T> {
    Scored { source: PathBuf, verdict: T },
    Skipped { source: PathBuf, reason: String },
}

impl<T> CallVerdict<T> {
    pub fn source(&self) -> &PathBuf {
        match self {
            CallVerdict::Scored { source, .. } | CallVerdict::Skipped { source, .. } => source,
        }
    }

    pub fn scored(&self) -> Option<&T> {
        match self {
            CallVerdict::Scored { verdict, .. } => Some(verdict),
            CallVerdict::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CallVerdict::Skipped { .. })
    }
}

/// Anything that ends in a pass/fail decision
pub trait Graded {
    fn passed(&self) -> bool;
}

/// Greeting or closing result for one call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordVerdict {
    pub contact_id: String,
    pub rubric: WordRubric,
    /// Vocabulary words found, in first-occurrence order
    pub matched_words: Vec<String>,
    pub match_count: usize,
    pub pass: bool,
}

impl Graded for WordVerdict {
    fn passed(&self) -> bool {
        self.pass
    }
}

/// Pace result for one call; evidence is the fastest qualifying agent sentence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceVerdict {
    pub contact_id: String,
    /// Characters per second, rounded to 2 decimals; 0 when nothing qualified
    pub max_pace: f64,
    pub sentence_text: String,
    pub sentence_word_count: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    /// Sentences excluded because they had no positive duration
    pub zero_duration_sentences: usize,
    pub pass: bool,
}

impl Graded for PaceVerdict {
    fn passed(&self) -> bool {
        self.pass
    }
}

/// Sentiment bucket, decided in precedence order short > positive > negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentBucket {
    Short,
    Positive,
    Negative,
}

/// Sentiment result for one call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentEntry {
    pub contact_id: String,
    pub extension: String,
    pub polarity_score: i64,
    /// Display text: spaces removed, newlines collapsed to single spaces
    pub text: String,
    pub bucket: SentimentBucket,
}
