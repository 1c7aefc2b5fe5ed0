use std::collections::HashSet;

use tracing::debug;

use crate::io::LoadedCall;
use crate::models::{CallVerdict, Transcript, WordRubric, WordRubricConfig, WordVerdict};

/// Vocabulary words found in a window, in first-occurrence order
///
/// Each vocabulary word counts at most once, however often it is repeated.
pub fn match_window<S: AsRef<str>>(window: &[&str], words: &[S]) -> Vec<String> {
    let mut remaining: HashSet<&str> = words.iter().map(|w| w.as_ref()).collect();
    let mut matched = Vec::new();

    for token in window {
        if remaining.remove(token) {
            matched.push(token.to_string());
        }
    }

    matched
}

/// Slice the agent tokens down to the inspected window
pub fn select_window<'a>(
    agent_tokens: &'a [&'a str],
    rubric: WordRubric,
    size: usize,
) -> &'a [&'a str] {
    let size = size.min(agent_tokens.len());
    match rubric {
        WordRubric::Greeting => &agent_tokens[..size],
        WordRubric::Closing => &agent_tokens[agent_tokens.len() - size..],
    }
}

/// Score one call against a greeting or closing rubric
pub fn score_words(transcript: &Transcript, config: &WordRubricConfig) -> WordVerdict {
    let agent_tokens = transcript.agent_tokens();
    let window = select_window(&agent_tokens, config.rubric, config.window);
    let matched_words = match_window(window, config.words.as_slice());
    let match_count = matched_words.len();

    debug!(
        "{} {}: {}/{} words matched in {} tokens",
        config.rubric,
        transcript.contact_id,
        match_count,
        config.threshold,
        window.len()
    );

    WordVerdict {
        contact_id: transcript.contact_id.clone(),
        rubric: config.rubric,
        matched_words,
        match_count,
        pass: match_count >= config.threshold,
    }
}

/// Score every loaded call; calls that failed to load are reported as skipped
pub fn score_word_rubric(
    calls: &[LoadedCall],
    config: &WordRubricConfig,
) -> Vec<CallVerdict<WordVerdict>> {
    calls
        .iter()
        .map(|call| match &call.transcript {
            Ok(transcript) => CallVerdict::Scored {
                source: call.source.clone(),
                verdict: score_words(transcript, config),
            },
            Err(e) => CallVerdict::Skipped {
                source: call.source.clone(),
                reason: e.to_string(),
            },
        })
        .collect()
}
