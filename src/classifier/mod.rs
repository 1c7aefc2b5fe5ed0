pub mod client;
pub mod lexicon;

pub use client::*;
pub use lexicon::*;

use crate::error::Result;

/// Text in, raw polarity out; a score of zero or above is non-negative sentiment
#[allow(async_fn_in_trait)]
pub trait PolarityClassifier {
    async fn classify(&self, text: &str) -> Result<f64>;
}

/// Classifier chosen at runtime: the HTTP service when configured, else the lexicon
pub enum Classifier {
    Http(HttpClassifier),
    Lexicon(LexiconClassifier),
}

impl Classifier {
    pub fn name(&self) -> &'static str {
        match self {
            Classifier::Http(_) => "http",
            Classifier::Lexicon(_) => "lexicon",
        }
    }
}

impl PolarityClassifier for Classifier {
    async fn classify(&self, text: &str) -> Result<f64> {
        match self {
            Classifier::Http(client) => client.classify(text).await,
            Classifier::Lexicon(lexicon) => lexicon.classify(text).await,
        }
    }
}
