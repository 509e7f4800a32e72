use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InvokeError;
use crate::types::ModelRef;

/// The single external boundary: hand an instruction, a model reference and
/// the user input to a model-serving endpoint and get text back.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn invoke(
        &self,
        instruction: &str,
        model: &ModelRef,
        input: &str,
    ) -> Result<String, InvokeError>;
}

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    async fn invoke(
        &self,
        instruction: &str,
        model: &ModelRef,
        input: &str,
    ) -> Result<String, InvokeError> {
        let request = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: instruction.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: input.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            model.as_str(),
            self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| InvokeError::ModelUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InvokeError::ModelUnavailable(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let result: GeminiResponse = response
            .json()
            .await
            .map_err(|e| InvokeError::ModelUnavailable(e.to_string()))?;

        let candidate = result
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| InvokeError::ModelUnavailable("no candidates in response".to_string()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(InvokeError::ContentFiltered);
        }

        candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| InvokeError::ModelUnavailable("empty candidate content".to_string()))
    }
}

/// Deterministic provider for tests: scripted responses matched against the
/// instruction text, since the instruction is what distinguishes roles.
pub struct MockModelProvider {
    scripts: Vec<(String, Result<String, InvokeError>)>,
}

impl MockModelProvider {
    pub fn new() -> Self {
        Self {
            scripts: Vec::new(),
        }
    }

    /// Responds with `response` to any invocation whose instruction contains
    /// `instruction_fragment`.
    pub fn respond(
        mut self,
        instruction_fragment: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.scripts
            .push((instruction_fragment.into(), Ok(response.into())));
        self
    }

    /// Fails any invocation whose instruction contains `instruction_fragment`.
    pub fn fail(mut self, instruction_fragment: impl Into<String>, error: InvokeError) -> Self {
        self.scripts
            .push((instruction_fragment.into(), Err(error)));
        self
    }
}

impl Default for MockModelProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn invoke(
        &self,
        instruction: &str,
        _model: &ModelRef,
        _input: &str,
    ) -> Result<String, InvokeError> {
        for (fragment, outcome) in &self.scripts {
            if instruction.contains(fragment) {
                return outcome.clone();
            }
        }
        Err(InvokeError::ModelUnavailable(
            "no scripted response for instruction".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("test-key".to_string());
        assert!(provider.base_url.contains("generativelanguage"));
    }

    #[tokio::test]
    async fn test_mock_provider_matches_instruction() {
        let provider = MockModelProvider::new()
            .respond("tax", "tax analysis")
            .respond("legal", "legal analysis");

        let model = ModelRef::from("test-model");
        let out = provider
            .invoke("you are a tax expert", &model, "context")
            .await
            .unwrap();
        assert_eq!(out, "tax analysis");
    }

    #[tokio::test]
    async fn test_mock_provider_scripted_failure() {
        let provider =
            MockModelProvider::new().fail("legal", InvokeError::ContentFiltered);

        let model = ModelRef::from("test-model");
        let err = provider
            .invoke("legal counsel", &model, "context")
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::ContentFiltered));
    }

    #[tokio::test]
    async fn test_mock_provider_unscripted_is_unavailable() {
        let provider = MockModelProvider::new();
        let model = ModelRef::from("test-model");
        let err = provider.invoke("anything", &model, "x").await.unwrap_err();
        assert!(matches!(err, InvokeError::ModelUnavailable(_)));
    }
}
