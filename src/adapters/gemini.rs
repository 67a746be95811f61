use crate::domain::ports::{CompletionProvider, ConfigProvider};
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro";

const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// `generateContent` 用戶端，一次搜尋只送出一個請求
#[derive(Clone)]
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: String,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let key = config.api_key();
        let api_key = validate_required_field("api_key", &key)?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            endpoint: config.api_endpoint().to_string(),
            model: config.model().to_string(),
            api_key: api_key.to_string(),
            client: builder.build()?,
        })
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = self.generate_url();
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        tracing::debug!("Sending generateContent request to: {}", url);
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            // 錯誤回應可能不是 JSON，解析失敗就用預設訊息
            let error_body: Option<serde_json::Value> = response.json().await.ok();
            let message = error_body
                .as_ref()
                .and_then(|v| v.pointer("/error/message"))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("Failed to fetch results")
                .to_string();
            return Err(SearchError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        let data: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| SearchError::UnexpectedResponse {
                    message: format!("response body is not JSON: {}", e.without_url()),
                })?;

        let text = data
            .pointer(TEXT_POINTER)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SearchError::UnexpectedResponse {
                message: format!("missing {}", TEXT_POINTER),
            })?;

        tracing::debug!("Received {} characters of completion text", text.len());
        Ok(text.to_string())
    }
}
