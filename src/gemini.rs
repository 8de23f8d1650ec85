use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Thin client for the Gemini generateContent REST endpoint. The pipeline
/// treats it as an opaque text-completion service; one call per question,
/// no retries.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn generate_text(&self, model: &str, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct GenerateReq<'a> {
            contents: Vec<ReqContent<'a>>,
        }

        #[derive(Serialize)]
        struct ReqContent<'a> {
            parts: Vec<ReqPart<'a>>,
        }

        #[derive(Serialize)]
        struct ReqPart<'a> {
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct GenerateResp {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: RespContent,
        }

        #[derive(Deserialize)]
        struct RespContent {
            #[serde(default)]
            parts: Vec<RespPart>,
        }

        #[derive(Deserialize)]
        struct RespPart {
            text: String,
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateReq {
                contents: vec![ReqContent {
                    parts: vec![ReqPart { text: prompt }],
                }],
            })
            .send()
            .await
            .context("failed to call gemini generate endpoint")?
            .error_for_status()
            .context("gemini generate returned non-success status")?
            .json::<GenerateResp>()
            .await
            .context("failed to decode gemini generate response")?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| anyhow::anyhow!("gemini response contained no candidate text"))?;

        Ok(text.trim().to_string())
    }
}
