use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AqmError, Result};

/// Default greeting vocabulary
pub const GREETING_WORDS: &[&str] = &[
    "您好", "大金", "客服", "请问", "先生", "女士", "空调", "为您服务", "需要", "帮助", "售后",
    "高兴",
];

/// Default closing vocabulary
pub const CLOSING_WORDS: &[&str] = &[
    "感谢", "您", "大金", "支持", "关注", "祝您", "生活", "愉快", "再见",
];

/// Which end of the agent's speech a word rubric inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordRubric {
    /// First N agent tokens
    Greeting,
    /// Last N agent tokens
    Closing,
}

impl WordRubric {
    pub fn default_words(self) -> &'static [&'static str] {
        match self {
            WordRubric::Greeting => GREETING_WORDS,
            WordRubric::Closing => CLOSING_WORDS,
        }
    }
}

impl fmt::Display for WordRubric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordRubric::Greeting => write!(f, "greeting"),
            WordRubric::Closing => write!(f, "closing"),
        }
    }
}

/// Parameters for a greeting or closing run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordRubricConfig {
    pub rubric: WordRubric,
    /// Vocabulary, trimmed and deduplicated, in first-listed order
    pub words: Vec<String>,
    /// Number of agent tokens inspected from the relevant end of the call
    pub window: usize,
    /// Minimum number of distinct vocabulary words for a pass
    pub threshold: usize,
}

impl WordRubricConfig {
    pub fn new<S: AsRef<str>>(
        rubric: WordRubric,
        words: &[S],
        window: i64,
        threshold: i64,
    ) -> Result<Self> {
        let window = usize::try_from(window)
            .map_err(|_| AqmError::invalid_config("window", format!("{window} is negative")))?;
        let threshold = usize::try_from(threshold).map_err(|_| {
            AqmError::invalid_config("threshold", format!("{threshold} is negative"))
        })?;

        let mut vocabulary: Vec<String> = Vec::with_capacity(words.len());
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() && !vocabulary.iter().any(|w| w == word) {
                vocabulary.push(word.to_string());
            }
        }

        Ok(Self {
            rubric,
            words: vocabulary,
            window,
            threshold,
        })
    }

    /// Default vocabulary with window 20 and threshold 5
    pub fn with_defaults(rubric: WordRubric) -> Self {
        Self {
            rubric,
            words: rubric.default_words().iter().map(|w| w.to_string()).collect(),
            window: 20,
            threshold: 5,
        }
    }

    /// Keep only the vocabulary words listed in `keep`
    pub fn narrowed<S: AsRef<str>>(mut self, keep: &[S]) -> Self {
        self.words.retain(|w| keep.iter().any(|k| k.as_ref().trim() == w));
        self
    }
}

/// Parameters for a pace run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceConfig {
    /// Sentences shorter than this (characters, whitespace removed) are ignored
    pub min_words: usize,
    /// Highest pace (characters per second) that still passes
    pub pace_to_pass: f64,
}

impl PaceConfig {
    pub fn new(min_words: i64, pace_to_pass: f64) -> Result<Self> {
        let min_words = usize::try_from(min_words).map_err(|_| {
            AqmError::invalid_config("min_words", format!("{min_words} is negative"))
        })?;
        if !pace_to_pass.is_finite() || pace_to_pass < 0.0 {
            return Err(AqmError::invalid_config(
                "pace_to_pass",
                format!("{pace_to_pass} is not a non-negative number"),
            ));
        }
        Ok(Self {
            min_words,
            pace_to_pass,
        })
    }
}

impl Default for PaceConfig {
    fn default() -> Self {
        Self {
            min_words: 10,
            pace_to_pass: 5.0,
        }
    }
}
