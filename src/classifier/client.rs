use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::PolarityClassifier;
use crate::error::{AqmError, Result};

/// Configuration for the HTTP polarity classifier
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Endpoint accepting `{"text": ...}` and answering `{"score": ...}`
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClassifierConfig {
    /// Create config from environment variables
    ///
    /// Returns `None` when `AQM_CLASSIFIER_URL` is not set.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(endpoint) = std::env::var("AQM_CLASSIFIER_URL") else {
            return Ok(None);
        };

        let timeout_secs = match std::env::var("AQM_CLASSIFIER_TIMEOUT_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|_| {
                AqmError::ClassifierUnavailable(format!(
                    "AQM_CLASSIFIER_TIMEOUT_SECS is not a number of seconds: {value:?}"
                ))
            })?,
            Err(_) => 30,
        };

        Ok(Some(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }

    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Polarity classifier served over HTTP
pub struct HttpClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl HttpClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AqmError::ClassifierUnavailable(format!("failed to build client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl PolarityClassifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<f64> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(|e| AqmError::ClassifierUnavailable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AqmError::ClassifierUnavailable(format!(
                "classifier returned {status}: {body}"
            )));
        }

        let response: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| AqmError::ClassifierUnavailable(format!("unreadable response: {e}")))?;

        response.finite_score()
    }
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    score: f64,
}

impl ClassifyResponse {
    fn finite_score(&self) -> Result<f64> {
        if !self.score.is_finite() {
            return Err(AqmError::ClassifierUnavailable(format!(
                "non-finite score {}",
                self.score
            )));
        }
        Ok(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(ClassifyRequest { text: "您好" }).unwrap();
        assert_eq!(body, serde_json::json!({"text": "您好"}));
    }

    #[test]
    fn test_raw_score_kept() {
        let parse = |json: &str| {
            serde_json::from_str::<ClassifyResponse>(json)
                .unwrap()
                .finite_score()
                .unwrap()
        };

        assert_eq!(parse(r#"{"score": 3.9}"#), 3.9);
        assert_eq!(parse(r#"{"score": -0.5}"#), -0.5);
        assert_eq!(parse(r#"{"score": 4, "label": "pos"}"#), 4.0);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let mut config = ClassifierConfig::new("http://127.0.0.1:9/classify".to_string());
        config.timeout = Duration::from_secs(2);
        let classifier = HttpClassifier::new(config).unwrap();

        let err = classifier.classify("您好").await.unwrap_err();
        assert!(matches!(err, AqmError::ClassifierUnavailable(_)));
    }
}
