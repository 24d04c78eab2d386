//! AI-assisted merchant insights.
//!
//! Wraps the OpenAI chat completions API. Two properties shape the whole
//! module:
//!
//! 1. **Never fail the request.** Insight endpoints degrade, they don't
//!    error: any upstream failure (network, quota, unparseable output)
//!    produces a deterministic fallback instead of an error response.
//! 2. **Mock without a key.** When no API key is configured the client
//!    returns clearly labeled mock output, so development works end-to-end
//!    without credentials.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default chat completions endpoint base.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Model used for all insight generation.
const MODEL: &str = "gpt-4o";

/// Multiplier applied when suggesting a price without model output.
const FALLBACK_MARKUP: f64 = 1.1;

const MOCK_RECOMMENDATION: &str = "[Mock] Based on your store's recent activity, consider \
     highlighting your top-viewed products on the landing page and bundling slow movers with \
     bestsellers. Configure an AI provider key to receive live recommendations.";

const FALLBACK_RECOMMENDATION: &str = "We couldn't generate a fresh recommendation right now. \
     Review your most-viewed products and consider featuring them more prominently.";

const MOCK_REASONING: &str = "[Mock] A modest increase keeps you competitive while improving \
     margin. Configure an AI provider key for live pricing analysis.";

const FALLBACK_REASONING: &str =
    "Suggested a conservative increase based on standard margin guidance.";

/// A product submitted for price optimization.
#[derive(Clone, Debug, Deserialize)]
pub struct ProductInput {
    /// Product identifier, echoed back in the suggestion.
    pub id: Value,
    /// Product title, if the caller has one.
    #[serde(default)]
    pub title: Option<String>,
    /// Current price.
    pub price: f64,
}

/// A price suggestion for a single product.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSuggestion {
    /// The product this suggestion is for.
    pub id: Value,
    /// Product title as submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The price the caller submitted.
    pub original_price: f64,
    /// The suggested new price.
    pub suggested_price: f64,
    /// Why this price was suggested.
    pub reasoning: String,
}

/// Shape of the model's per-product output when it cooperates.
#[derive(Deserialize)]
struct ModelSuggestion {
    #[serde(default)]
    suggested_price: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client for AI-backed insights.
pub struct AiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl AiClient {
    /// Creates a client. With `api_key == None` every call returns labeled
    /// mock output without touching the network.
    #[must_use]
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at an alternative API base (tests only).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generates a merchandising recommendation from store tracking data.
    ///
    /// Infallible: upstream failures produce [`FALLBACK_RECOMMENDATION`]
    /// rather than an error.
    pub async fn recommend(&self, tracking_data: &Value) -> String {
        let Some(api_key) = &self.api_key else {
            return MOCK_RECOMMENDATION.to_string();
        };

        let prompt = format!(
            "You are an e-commerce analyst. Given this store activity data, give one concise, \
             actionable merchandising recommendation:\n{tracking_data}"
        );

        match self.chat(api_key, &prompt).await {
            Some(content) => content,
            None => {
                tracing::warn!("recommendation generation failed, returning fallback");
                FALLBACK_RECOMMENDATION.to_string()
            }
        }
    }

    /// Suggests a new price for each submitted product.
    ///
    /// Infallible and order-preserving: every input product yields exactly
    /// one suggestion. Products the model skips or mangles get the
    /// deterministic markup fallback.
    pub async fn optimize_prices(&self, products: &[ProductInput]) -> Vec<PriceSuggestion> {
        let Some(api_key) = &self.api_key else {
            return products
                .iter()
                .map(|p| Self::fallback_suggestion(p, MOCK_REASONING))
                .collect();
        };

        let listing = serde_json::to_string(
            &products
                .iter()
                .map(|p| json!({"id": p.id, "title": p.title, "price": p.price}))
                .collect::<Vec<_>>(),
        )
        .unwrap_or_default();

        let prompt = format!(
            "You are a pricing analyst. For each product below, reply with a JSON array of \
             objects with fields \"suggested_price\" (number) and \"reasoning\" (string), in the \
             same order as the input, with no surrounding text:\n{listing}"
        );

        let model_output = match self.chat(api_key, &prompt).await {
            Some(content) => serde_json::from_str::<Vec<ModelSuggestion>>(&content)
                .ok()
                .unwrap_or_default(),
            None => {
                tracing::warn!("price optimization failed, returning fallback for all products");
                Vec::new()
            }
        };

        products
            .iter()
            .enumerate()
            .map(|(i, product)| {
                match model_output.get(i) {
                    Some(ModelSuggestion {
                        suggested_price: Some(price),
                        reasoning,
                    }) if *price > 0.0 => PriceSuggestion {
                        id: product.id.clone(),
                        title: product.title.clone(),
                        original_price: product.price,
                        suggested_price: round_cents(*price),
                        reasoning: reasoning
                            .clone()
                            .unwrap_or_else(|| FALLBACK_REASONING.to_string()),
                    },
                    // Skipped or unusable model output for this product.
                    _ => Self::fallback_suggestion(product, FALLBACK_REASONING),
                }
            })
            .collect()
    }

    fn fallback_suggestion(product: &ProductInput, reasoning: &str) -> PriceSuggestion {
        PriceSuggestion {
            id: product.id.clone(),
            title: product.title.clone(),
            original_price: product.price,
            suggested_price: round_cents(product.price * FALLBACK_MARKUP),
            reasoning: reasoning.to_string(),
        }
    }

    /// Sends a single-message chat completion. `None` on any failure.
    async fn chat(&self, api_key: &str, prompt: &str) -> Option<String> {
        let body = json!({
            "model": MODEL,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "ai provider returned an error status");
            return None;
        }

        let parsed: ChatResponse = response.json().await.ok()?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn products() -> Vec<ProductInput> {
        vec![
            ProductInput {
                id: json!(1),
                title: Some("Widget".to_string()),
                price: 10.0,
            },
            ProductInput {
                id: json!(2),
                title: None,
                price: 19.99,
            },
        ]
    }

    #[tokio::test]
    async fn test_keyless_client_returns_labeled_mock_recommendation() {
        let client = AiClient::new(reqwest::Client::new(), None);
        let text = client.recommend(&json!({"views": 10})).await;
        assert!(text.starts_with("[Mock]"));
    }

    #[tokio::test]
    async fn test_keyless_client_suggests_markup_prices() {
        let client = AiClient::new(reqwest::Client::new(), None);
        let suggestions = client.optimize_prices(&products()).await;

        assert_eq!(suggestions.len(), 2);
        assert!((suggestions[0].suggested_price - 11.0).abs() < f64::EPSILON);
        assert!((suggestions[1].suggested_price - 21.99).abs() < 0.001);
        assert!(suggestions[0].reasoning.starts_with("[Mock]"));
    }

    #[tokio::test]
    async fn test_live_recommendation_uses_model_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Feature your mugs."}}]
            })))
            .mount(&server)
            .await;

        let client = AiClient::new(reqwest::Client::new(), Some("sk-test".to_string()))
            .with_base_url(server.uri());
        let text = client.recommend(&json!({"views": 10})).await;
        assert_eq!(text, "Feature your mugs.");
    }

    #[tokio::test]
    async fn test_upstream_error_falls_back_without_failing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = AiClient::new(reqwest::Client::new(), Some("sk-test".to_string()))
            .with_base_url(server.uri());

        let text = client.recommend(&json!({})).await;
        assert_eq!(text, FALLBACK_RECOMMENDATION);

        let suggestions = client.optimize_prices(&products()).await;
        assert_eq!(suggestions.len(), 2);
        assert!((suggestions[0].suggested_price - 11.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_live_optimization_parses_model_json() {
        let server = MockServer::start().await;
        let content = r#"[{"suggested_price": 12.5, "reasoning": "Demand supports it."}]"#;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })))
            .mount(&server)
            .await;

        let client = AiClient::new(reqwest::Client::new(), Some("sk-test".to_string()))
            .with_base_url(server.uri());
        let suggestions = client.optimize_prices(&products()).await;

        // First product gets the model's suggestion, second the fallback.
        assert!((suggestions[0].suggested_price - 12.5).abs() < f64::EPSILON);
        assert_eq!(suggestions[0].reasoning, "Demand supports it.");
        assert!((suggestions[1].suggested_price - 21.99).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_unparseable_model_output_falls_back_per_product() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "sorry, no JSON today"}}]
            })))
            .mount(&server)
            .await;

        let client = AiClient::new(reqwest::Client::new(), Some("sk-test".to_string()))
            .with_base_url(server.uri());
        let suggestions = client.optimize_prices(&products()).await;
        assert_eq!(suggestions.len(), 2);
        assert!((suggestions[0].suggested_price - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_suggestions_serialize_camel_case() {
        let suggestion = PriceSuggestion {
            id: json!(1),
            title: Some("Widget".to_string()),
            original_price: 10.0,
            suggested_price: 11.0,
            reasoning: "r".to_string(),
        };
        let value = serde_json::to_value(&suggestion).unwrap();
        assert!(value.get("originalPrice").is_some());
        assert!(value.get("suggestedPrice").is_some());
        assert!(value.get("original_price").is_none());
    }
}
