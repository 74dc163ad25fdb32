use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ModelError;

use super::EntailmentModel;

/// Entailment model served behind a text-classification inference endpoint.
///
/// The request carries the candidate as `text` and the hypothesis as
/// `text_pair`; the response is a list of `{label, score}` objects, possibly
/// nested one level deep.
pub struct HttpEntailmentModel {
    client: Client,
    url: Url,
    api_token: Option<String>,
}

impl HttpEntailmentModel {
    pub fn new(url: &str, api_token: Option<String>, timeout: Duration) -> Result<Self, ModelError> {
        let url = Url::parse(url)
            .map_err(|e| ModelError::Unavailable(format!("invalid endpoint {:?}: {}", url, e)))?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url,
            api_token,
        })
    }
}

#[async_trait]
impl EntailmentModel for HttpEntailmentModel {
    fn name(&self) -> &str {
        self.url.as_str()
    }

    async fn entailment(&self, premise: &str, hypothesis: &str) -> Result<f64, ModelError> {
        let payload = serde_json::json!({
            "inputs": {"text": premise, "text_pair": hypothesis},
            "parameters": {"top_k": 3}
        });

        let mut request = self.client.post(self.url.clone()).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Invocation(format!(
                "entailment endpoint error: {} - {}",
                status, body
            )));
        }

        let body: Value = response.json().await?;
        entailment_probability(&body)
    }
}

/// Find the score of the `entailment` label in a classification response
pub fn entailment_probability(body: &Value) -> Result<f64, ModelError> {
    find_entailment(body).ok_or_else(|| {
        ModelError::MalformedOutput(format!("no entailment label in response: {}", body))
    })
}

fn find_entailment(value: &Value) -> Option<f64> {
    match value {
        Value::Array(items) => items.iter().find_map(find_entailment),
        Value::Object(map) => {
            let label = map.get("label")?.as_str()?;
            if label.eq_ignore_ascii_case("entailment") {
                map.get("score")?.as_f64()
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_response() {
        let body = serde_json::json!([
            {"label": "NEUTRAL", "score": 0.1},
            {"label": "ENTAILMENT", "score": 0.85},
            {"label": "CONTRADICTION", "score": 0.05}
        ]);
        assert_eq!(entailment_probability(&body).unwrap(), 0.85);
    }

    #[test]
    fn test_nested_response() {
        let body = serde_json::json!([[
            {"label": "contradiction", "score": 0.7},
            {"label": "entailment", "score": 0.2}
        ]]);
        assert_eq!(entailment_probability(&body).unwrap(), 0.2);
    }

    #[test]
    fn test_missing_label_is_malformed() {
        let body = serde_json::json!({"error": "model loading"});
        assert!(matches!(
            entailment_probability(&body),
            Err(ModelError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_invalid_url_unavailable() {
        let result = HttpEntailmentModel::new("::nope", None, Duration::from_secs(1));
        assert!(matches!(result, Err(ModelError::Unavailable(_))));
    }
}
