//! AI companion client.
//!
//! A thin synchronous client for the "old captain" companion chat. All
//! intelligence lives provider-side; this module owns the persisted provider
//! settings record, the session-only message types, and the failure policy:
//! any transport, status, or decode failure is caught at this boundary and
//! replaced with a static in-character fallback line. No retry, no backoff.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Static reply used whenever the provider cannot be reached.
pub const FALLBACK_MESSAGE: &str = "The sea link is down for the moment, sailor. \
Pour yourself a warm cup, watch the horizon, and hail me again in a little while. ⚓";

/// System instruction for the companion persona.
const COMPANION_PERSONA: &str = "You are a wise, warm, and empathetic retired sea captain \
keeping company with seafarers on long voyages. Offer comfort on homesickness, watchkeeping \
fatigue, and the weight of the work; do not answer technical questions here. Speak gently, \
like a chat by the stove, and use a warm nautical emoji now and then (🌊, ⚓, 🕯️, ☕).";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosted providers the settings record can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    /// Xiaomi MiMo hosted endpoint.
    XiaomiMimo,
    /// DeepSeek hosted endpoint.
    DeepSeek,
    /// Google Gemini hosted endpoint.
    Gemini,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XiaomiMimo => write!(f, "XiaomiMimo"),
            Self::DeepSeek => write!(f, "DeepSeek"),
            Self::Gemini => write!(f, "Gemini"),
        }
    }
}

/// Persisted assistant provider settings.
///
/// Owned by the record store (`ai_settings` slot); panels read and write it
/// through the store rather than keeping private copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantSettings {
    /// Base URL of the provider API.
    pub base_url: String,

    /// Model identifier passed on every request.
    pub model_name: String,

    /// Which provider the base URL belongs to.
    pub provider: Provider,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.xiaomimimo.com/v1/".to_string(),
            model_name: "gemini-3-pro-preview".to_string(),
            provider: Provider::Gemini,
        }
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// The crew member.
    User,
    /// The companion model.
    Model,
}

impl ChatRole {
    /// Role name used on the provider wire.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "assistant",
        }
    }
}

/// A single chat message. Session-only, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message stamped now.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a model message stamped now.
    #[must_use]
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A web source cited alongside a grounded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    /// Source page title.
    pub title: String,
    /// Source URI.
    pub uri: String,
}

/// A grounded search answer: text plus its cited sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAnswer {
    /// Answer text.
    pub text: String,
    /// Sources the answer is attributed to.
    pub sources: Vec<GroundingSource>,
}

/// Synchronous client for the companion chat endpoint.
#[derive(Debug)]
pub struct AssistantClient {
    settings: AssistantSettings,
    api_key: Option<String>,
    agent: ureq::Agent,
}

impl AssistantClient {
    /// Create a client for the given settings with the default timeout.
    #[must_use]
    pub fn new(settings: AssistantSettings) -> Self {
        Self::with_timeout(settings, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    #[must_use]
    pub fn with_timeout(settings: AssistantSettings, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            settings,
            api_key: None,
            agent,
        }
    }

    /// Attach a bearer token sent with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The settings this client was built from.
    #[must_use]
    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }

    /// Send a chat message and return the companion's reply.
    ///
    /// Never fails: any provider failure is logged and replaced by
    /// [`FALLBACK_MESSAGE`].
    #[must_use]
    pub fn chat(&self, message: &str, history: &[ChatMessage]) -> String {
        match self.request_chat(message, history) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "Assistant request failed, serving fallback");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    /// Perform the provider request, surfacing every failure as an error.
    fn request_chat(&self, message: &str, history: &[ChatMessage]) -> Result<String> {
        let url = chat_endpoint(&self.settings.base_url);
        debug!(%url, model = %self.settings.model_name, "Sending chat request");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": COMPANION_PERSONA,
        })];
        for msg in history {
            messages.push(serde_json::json!({
                "role": msg.role.wire_name(),
                "content": msg.content,
            }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": message }));

        let mut request = self.agent.post(&url).set("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.set("Authorization", &format!("Bearer {key}"));
        }

        let response = request
            .send_json(serde_json::json!({
                "model": self.settings.model_name,
                "messages": messages,
                "temperature": 0.8,
            }))
            .map_err(|err| Error::provider(err.to_string()))?;

        let body: serde_json::Value = response
            .into_json()
            .map_err(|err| Error::provider(err.to_string()))?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| Error::provider("response carried no message content"))
    }
}

/// Join the chat completions path onto a base URL.
fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}
