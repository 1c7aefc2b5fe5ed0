use serde::{Deserialize, Serialize};

use super::CallRecord;

/// Which side of the call produced a word or sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Agent,
    /// Any non-agent tag; the original tag is kept for display
    Customer(String),
}

impl Speaker {
    pub fn from_tag(tag: &str) -> Self {
        if tag == "Agent" {
            Speaker::Agent
        } else {
            Speaker::Customer(tag.to_string())
        }
    }

    pub fn is_agent(&self) -> bool {
        matches!(self, Speaker::Agent)
    }
}

/// A single spoken token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub speaker: Speaker,
    pub token: String,
    /// Index of the word in the call
    pub position: usize,
}

/// A sentence with millisecond timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    pub speaker: Speaker,
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Sentence {
    /// Duration in milliseconds, `None` when the sentence has no positive duration
    pub fn duration_ms(&self) -> Option<u64> {
        self.end_ms
            .checked_sub(self.start_ms)
            .filter(|duration| *duration > 0)
    }
}

/// One call, as spoken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub contact_id: String,
    pub extension: String,
    /// All words in spoken order
    pub words: Vec<Word>,
    /// All sentences in spoken order
    pub sentences: Vec<Sentence>,
    pub plain_text: String,
}

impl Transcript {
    pub fn from_record(record: CallRecord) -> Self {
        let words = record
            .transcript_detailed
            .words
            .into_iter()
            .enumerate()
            .map(|(position, w)| Word {
                speaker: Speaker::from_tag(&w.sp),
                token: w.w,
                position,
            })
            .collect();

        let sentences = record
            .plain_text_time
            .verbatims
            .into_iter()
            .map(|s| Sentence {
                speaker: Speaker::from_tag(&s.sp),
                text: s.w,
                start_ms: s.s,
                end_ms: s.e,
            })
            .collect();

        Self {
            contact_id: record.metadata.contact_id,
            extension: record.metadata.extension,
            words,
            sentences,
            plain_text: record.plain_text,
        }
    }

    /// Tokens spoken by the agent, in order
    pub fn agent_tokens(&self) -> Vec<&str> {
        self.words
            .iter()
            .filter(|w| w.speaker.is_agent())
            .map(|w| w.token.as_str())
            .collect()
    }

    /// Sentences spoken by the agent, in order
    pub fn agent_sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter().filter(|s| s.speaker.is_agent())
    }
}
