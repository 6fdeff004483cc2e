pub mod error;
pub mod types;

pub use error::{ChatError, Result};
pub use types::{ChatRequest, ChatResponse, Role, WireMessage};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Chat-completions client for OpenAI-compatible endpoints.
/// Holds the key and base URL; one HTTP request per `chat` call.
#[derive(Clone)]
pub struct ChatClient {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Point at a non-default endpoint (proxy, compatible provider, mock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Send one chat-completions request and return the first choice's
    /// content. Messages go out in the order given.
    ///
    /// Transport failures and non-success statuses are `Http`/`Api`; a 200
    /// whose body is not the expected envelope (not JSON, no choices, null
    /// content) is `Envelope` with the raw body preserved, so callers can
    /// treat a broken reply differently from an unreachable service.
    pub async fn chat(&self, messages: Vec<WireMessage>) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
        };

        debug!(model = %request.model, "Chat completion request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|_| ChatError::Envelope { raw: body.clone() })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ChatError::Envelope { raw: body })
    }
}
