use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::classifier::PolarityClassifier;
use crate::io::LoadedCall;
use crate::models::{SentimentBucket, SentimentEntry};

/// Texts this short (in characters, after cleaning) are bucketed as short
pub const SHORT_TEXT_MAX_CHARS: usize = 10;

/// Running totals across a sentiment run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub num_total_calls: usize,
    pub num_negative_calls: usize,
    pub num_positive_calls: usize,
    pub num_short_calls: usize,
    /// Calls with no score: the transcript failed to load or the classifier failed
    pub num_skipped_calls: usize,
}

/// Sentiment results keyed by transcript file stem
#[derive(Debug, Clone, Default, Serialize)]
pub struct SentimentReport {
    pub counts: SentimentCounts,
    pub negative_calls: BTreeMap<String, SentimentEntry>,
    pub positive_calls: BTreeMap<String, SentimentEntry>,
    pub short_calls: BTreeMap<String, SentimentEntry>,
    pub all_calls: BTreeMap<String, SentimentEntry>,
    /// File stem to reason
    pub skipped: BTreeMap<String, String>,
}

impl SentimentReport {
    fn record(&mut self, key: String, entry: SentimentEntry) {
        self.counts.num_total_calls += 1;
        let bucket = match entry.bucket {
            SentimentBucket::Short => {
                self.counts.num_short_calls += 1;
                &mut self.short_calls
            }
            SentimentBucket::Positive => {
                self.counts.num_positive_calls += 1;
                &mut self.positive_calls
            }
            SentimentBucket::Negative => {
                self.counts.num_negative_calls += 1;
                &mut self.negative_calls
            }
        };
        bucket.insert(key.clone(), entry.clone());
        self.all_calls.insert(key, entry);
    }

    fn skip(&mut self, key: String, reason: String) {
        self.counts.num_skipped_calls += 1;
        self.skipped.insert(key, reason);
    }
}

/// Report key for a call: the transcript file name without its extension
pub fn call_key(source: &Path) -> String {
    match source.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => source.display().to_string(),
    }
}

/// Display form of call text: spaces removed, each newline becomes one space
pub fn clean_text(text: &str) -> String {
    text.replace(' ', "").replace('\n', " ")
}

/// Bucket a call on its raw score; short text wins over the score sign
pub fn bucket_for(cleaned_text: &str, raw_score: f64) -> SentimentBucket {
    if cleaned_text.chars().count() <= SHORT_TEXT_MAX_CHARS {
        SentimentBucket::Short
    } else if raw_score >= 0.0 {
        SentimentBucket::Positive
    } else {
        SentimentBucket::Negative
    }
}

/// Classify every loaded call and bucket the results
///
/// Calls are classified one at a time. A classifier failure only affects the
/// call it happened on.
pub async fn score_sentiment<C: PolarityClassifier>(
    calls: &[LoadedCall],
    classifier: &C,
) -> SentimentReport {
    let mut report = SentimentReport::default();

    for call in calls {
        let key = call_key(&call.source);
        let transcript = match &call.transcript {
            Ok(transcript) => transcript,
            Err(e) => {
                report.skip(key, e.to_string());
                continue;
            }
        };

        let raw_score = match classifier.classify(&transcript.plain_text).await {
            Ok(score) => score,
            Err(e) => {
                warn!("{}: {}", key, e);
                report.skip(key, e.to_string());
                continue;
            }
        };

        let text = clean_text(&transcript.plain_text);
        let bucket = bucket_for(&text, raw_score);
        debug!("{}: score {} -> {:?}", key, raw_score, bucket);

        report.record(
            key,
            SentimentEntry {
                contact_id: transcript.contact_id.clone(),
                extension: transcript.extension.clone(),
                polarity_score: raw_score.trunc() as i64,
                text,
                bucket,
            },
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AqmError, Result};
    use crate::models::Transcript;
    use crate::models::transcript::fixtures::transcript;

    /// Returns a fixed score, or fails for texts containing "故障"
    struct FixedClassifier(f64);

    impl PolarityClassifier for FixedClassifier {
        async fn classify(&self, text: &str) -> Result<f64> {
            if text.contains("故障") {
                return Err(AqmError::ClassifierUnavailable("service down".to_string()));
            }
            Ok(self.0)
        }
    }

    fn call(contact_id: &str, text: &str) -> LoadedCall {
        call_from(&format!("{contact_id}.json"), contact_id, text)
    }

    fn call_from(source: &str, contact_id: &str, text: &str) -> LoadedCall {
        let mut t: Transcript = transcript(contact_id, &[], &[]);
        t.plain_text = text.to_string();
        LoadedCall {
            source: source.into(),
            transcript: Ok(t),
        }
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("您好 大金\n\n请问 您"), "您好大金  请问您");
        assert_eq!(clean_text("a\r\nb"), "a\r b");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_call_key_is_file_stem() {
        assert_eq!(call_key(Path::new("/calls/2023-05/c-1.json")), "c-1");
        assert_eq!(call_key(Path::new("broken.json")), "broken");
    }

    #[test]
    fn test_bucket_precedence() {
        let eleven = "一二三四五六七八九十壹";
        assert_eq!(bucket_for("一二三四五六七八九十", -5.0), SentimentBucket::Short);
        assert_eq!(bucket_for("一二三四五六七八九十", 5.0), SentimentBucket::Short);
        assert_eq!(bucket_for(eleven, -1.0), SentimentBucket::Negative);
        assert_eq!(bucket_for(eleven, -0.5), SentimentBucket::Negative);
        assert_eq!(bucket_for(eleven, 0.0), SentimentBucket::Positive);
    }

    #[tokio::test]
    async fn test_small_negative_score_buckets_negative() {
        let calls = vec![call("c-1", "一二三四五六七八九十壹")];
        let report = score_sentiment(&calls, &FixedClassifier(-0.5)).await;

        let entry = &report.all_calls["c-1"];
        assert_eq!(entry.polarity_score, 0);
        assert_eq!(entry.bucket, SentimentBucket::Negative);
        assert!(report.negative_calls.contains_key("c-1"));
        assert!(report.positive_calls.is_empty());
    }

    #[tokio::test]
    async fn test_each_newline_counts_toward_length() {
        let calls = vec![call("c-1", "好\n\n\n\n\n\n\n\n\n坏")];
        let report = score_sentiment(&calls, &FixedClassifier(-3.0)).await;

        let entry = &report.all_calls["c-1"];
        assert_eq!(entry.text.chars().count(), 11);
        assert_eq!(entry.bucket, SentimentBucket::Negative);
        assert_eq!(report.counts.num_short_calls, 0);
    }

    #[tokio::test]
    async fn test_duplicate_contact_ids_keep_both_calls() {
        let calls = vec![
            call_from("a/first.json", "dup", "您好这里是大金空调客服请问有什么可以帮您"),
            call_from("b/second.json", "dup", "我家空调又坏了已经是第三次了真的很生气"),
        ];
        let report = score_sentiment(&calls, &FixedClassifier(-1.0)).await;

        assert_eq!(report.counts.num_total_calls, 2);
        assert_eq!(report.all_calls.len(), report.counts.num_total_calls);
        assert_eq!(report.negative_calls.len(), report.counts.num_negative_calls);
        assert_eq!(report.all_calls["first"].contact_id, "dup");
        assert_eq!(report.all_calls["second"].contact_id, "dup");
    }

    #[tokio::test]
    async fn test_short_text_overrides_positive_score() {
        let calls = vec![call("c-1", "您好 大金 空调 客服")];
        let report = score_sentiment(&calls, &FixedClassifier(3.0)).await;

        let entry = &report.all_calls["c-1"];
        assert_eq!(entry.text.chars().count(), 8);
        assert_eq!(entry.polarity_score, 3);
        assert_eq!(entry.bucket, SentimentBucket::Short);
        assert!(report.short_calls.contains_key("c-1"));
        assert!(report.positive_calls.is_empty());
    }

    #[tokio::test]
    async fn test_counts_and_buckets() {
        let calls = vec![
            call("c-1", "您好这里是大金空调客服请问有什么可以帮您"),
            call("c-2", "短"),
            call("c-3", "我家空调又出故障了已经是第三次了"),
            LoadedCall {
                source: "broken.json".into(),
                transcript: Err(AqmError::MalformedTranscript {
                    path: "broken.json".into(),
                    reason: "missing field `plainText`".to_string(),
                }),
            },
        ];

        let report = score_sentiment(&calls, &FixedClassifier(-2.0)).await;

        assert_eq!(
            report.counts,
            SentimentCounts {
                num_total_calls: 2,
                num_negative_calls: 1,
                num_positive_calls: 0,
                num_short_calls: 1,
                num_skipped_calls: 2,
            }
        );
        assert!(report.negative_calls.contains_key("c-1"));
        assert!(report.short_calls.contains_key("c-2"));
        assert!(report.skipped.contains_key("c-3"));
        assert!(report.skipped.contains_key("broken"));
        assert_eq!(report.all_calls.len(), 2);
        assert_eq!(report.skipped.len(), report.counts.num_skipped_calls);
        assert_eq!(report.all_calls["c-1"].extension, "8000");
    }
}
