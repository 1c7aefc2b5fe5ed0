use tracing::debug;

use crate::error::AqmError;
use crate::io::LoadedCall;
use crate::models::{CallVerdict, PaceConfig, PaceVerdict, Sentence, Transcript};

/// Sentence length in characters, ignoring whitespace
pub fn sentence_length(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Characters per second over a sentence, rounded to 2 decimals
///
/// Returns `None` for sentences without a positive duration.
pub fn sentence_pace(length: usize, sentence: &Sentence) -> Option<f64> {
    let duration_ms = sentence.duration_ms()?;
    let pace = length as f64 * 1000.0 / duration_ms as f64;
    Some((pace * 100.0).round() / 100.0)
}

/// Score one call: find the agent's fastest qualifying sentence
pub fn score_pace(transcript: &Transcript, config: &PaceConfig) -> PaceVerdict {
    let mut verdict = PaceVerdict {
        contact_id: transcript.contact_id.clone(),
        max_pace: 0.0,
        sentence_text: String::new(),
        sentence_word_count: 0,
        start_ms: 0,
        end_ms: 0,
        zero_duration_sentences: 0,
        pass: true,
    };

    for sentence in transcript.agent_sentences() {
        let length = sentence_length(&sentence.text);
        if length < config.min_words {
            continue;
        }

        let Some(pace) = sentence_pace(length, sentence) else {
            let skipped = AqmError::ZeroDurationSentence {
                start_ms: sentence.start_ms,
                end_ms: sentence.end_ms,
            };
            debug!("{}: excluding sentence: {}", transcript.contact_id, skipped);
            verdict.zero_duration_sentences += 1;
            continue;
        };

        if pace > verdict.max_pace {
            verdict.max_pace = pace;
            verdict.sentence_text = sentence.text.clone();
            verdict.sentence_word_count = length;
            verdict.start_ms = sentence.start_ms;
            verdict.end_ms = sentence.end_ms;
        }
    }

    verdict.pass = verdict.max_pace <= config.pace_to_pass;
    verdict
}

/// Score every loaded call; calls that failed to load are reported as skipped
pub fn score_pace_rubric(
    calls: &[LoadedCall],
    config: &PaceConfig,
) -> Vec<CallVerdict<PaceVerdict>> {
    calls
        .iter()
        .map(|call| match &call.transcript {
            Ok(transcript) => CallVerdict::Scored {
                source: call.source.clone(),
                verdict: score_pace(transcript, config),
            },
            Err(e) => CallVerdict::Skipped {
                source: call.source.clone(),
                reason: e.to_string(),
            },
        })
        .collect()
}
