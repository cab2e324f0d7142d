use crate::core::advisor::{self, AdviceProvider, EMPTY_ANSWER};
use crate::core::config::{API_KEY_ENV, AdvisorConfig};
use crate::core::ledger::Category;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Google Gemini `generateContent` client.
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiProvider {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("moneymaster/0.1")
            .build()?;
        Ok(GeminiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        Self::with_resolved_key(config, config.resolved_api_key())
    }

    fn with_resolved_key(config: &AdvisorConfig, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key.ok_or_else(|| {
            anyhow!(
                "Gemini API key is missing. Set advisor.api_key in the config \
                 or the {API_KEY_ENV} environment variable"
            )
        })?;
        Self::new(&config.base_url, &config.model, &api_key)
    }

    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            system_instruction: system.map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
        };
        debug!("Requesting completion from {}", url);

        let response = with_retry(
            || {
                self.client
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&body)
                    .send()
            },
            3,
            500,
        )
        .await
        .with_context(|| format!("Failed to reach Gemini at {}", self.base_url))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read Gemini response")?;
        if !status.is_success() {
            bail!("Gemini request failed with status {status}: {response_text}");
        }

        let parsed: GenerateResponse = serde_json::from_str(&response_text)
            .with_context(|| format!("Failed to parse Gemini response: '{response_text}'"))?;
        Ok(parsed.text())
    }
}

#[async_trait]
impl AdviceProvider for GeminiProvider {
    async fn advise(&self, question: &str, context: &str) -> Result<String> {
        let instruction = advisor::system_instruction(context);
        let answer = self
            .generate(Some(&instruction), &format!("User Question: {question}"))
            .await?;
        Ok(answer.unwrap_or_else(|| EMPTY_ANSWER.to_string()))
    }

    async fn categorize(&self, title: &str) -> Result<Category> {
        let answer = self
            .generate(None, &advisor::categorize_prompt(title))
            .await?
            .ok_or_else(|| anyhow!("Empty categorization for '{title}'"))?;
        Ok(answer.parse::<Category>()?)
    }
}
