use serde::{Deserialize, Serialize};

/// Root record written by the upstream transcription system, one per call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallRecord {
    pub metadata: CallMetadata,
    pub transcript_detailed: DetailedTranscript,
    #[serde(rename = "plainTextTime")]
    pub plain_text_time: TimedText,
    #[serde(rename = "plainText")]
    pub plain_text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallMetadata {
    /// Unique call identifier
    #[serde(rename = "ContactID")]
    pub contact_id: String,
    /// Agent extension
    #[serde(rename = "String_extension")]
    pub extension: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetailedTranscript {
    pub words: Vec<RecordWord>,
}

/// A single recognized word with its speaker tag
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordWord {
    /// The recognized text
    pub w: String,
    /// Speaker tag ("Agent" or the customer side)
    pub sp: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimedText {
    pub verbatims: Vec<RecordSentence>,
}

/// A sentence with millisecond timestamps
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordSentence {
    pub sp: String,
    pub w: String,
    /// Start timestamp in milliseconds
    pub s: u64,
    /// End timestamp in milliseconds
    pub e: u64,
}
