pub mod classifier;
pub mod error;
pub mod io;
pub mod models;
pub mod rubrics;

pub use classifier::{
    Classifier, ClassifierConfig, HttpClassifier, LexiconClassifier, PolarityClassifier,
};
pub use error::{AqmError, Result};
pub use io::{
    load_transcripts, parse_transcript_file, parse_transcript_json, Delimiter, LoadedCall,
    ReportEnvelope, TabularVerdict,
};
pub use models::{
    CallVerdict, PaceConfig, PaceVerdict, SentimentBucket, SentimentEntry, Transcript,
    WordRubric, WordRubricConfig, WordVerdict,
};
pub use rubrics::{
    match_count_distribution, score_pace_rubric, score_sentiment, score_word_rubric,
    PassSummary, SentimentReport,
};
