//! Chat-completion client that turns a query into shell commands.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_COMPLETION_BASE, DEFAULT_MODEL, NETWORK_TIMEOUT};
use crate::core::BashgptError;

/// Instructions sent ahead of every query.
pub const SYSTEM_MESSAGE: &str = "You are a bash shell autocompletion utility. \
Users invoke you from a terminal by writing a query at the bash prompt and using \
bash's autocomplete feature to convert their query into appropriate bash commands. \
Write your responses in strict bash shell syntax without any additional information. \
Only respond with a single code block which encapsulates the user's query. \
When responding with a code block that includes curl or wget, explicitly specify \
the same user agent as Google Chrome on Windows 10.";

/// Settings for the completion service, stored under `[completion]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Chat model to ask.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_COMPLETION_BASE.to_string()
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

/// Client for `POST <api_base>/chat/completions`.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    api_key: String,
    config: CompletionConfig,
}

impl CompletionClient {
    /// Create a client authenticating with `api_key`.
    pub fn new(api_key: impl Into<String>, config: CompletionConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(NETWORK_TIMEOUT).build()?,
            api_key: api_key.into(),
            config,
        })
    }

    /// Ask for the command matching `query` and return it ready to print.
    pub async fn suggest(&self, query: &str) -> Result<String, BashgptError> {
        let reply = self.complete(query).await?;
        Ok(extract_command(&reply))
    }

    /// Send `query` and return the raw reply text.
    pub async fn complete(&self, query: &str) -> Result<String, BashgptError> {
        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
        };
        debug!("Requesting completion from {url} with model {}", self.config.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BashgptError::Completion {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BashgptError::Completion {
                reason: format!("API error ({status}): {}", text.trim()),
            });
        }

        let reply: ChatResponse = response.json().await.map_err(|e| BashgptError::Completion {
            reason: format!("invalid response: {e}"),
        })?;

        match <[Choice; 1]>::try_from(reply.choices) {
            Ok([choice]) => Ok(choice.message.content),
            Err(choices) => Err(BashgptError::UnexpectedChoices {
                count: choices.len(),
            }),
        }
    }
}

/// Reduce a reply to the command it suggests.
///
/// When the reply contains fenced code blocks, only the lines inside the
/// fences are kept, each terminated by a newline. Otherwise the reply is
/// returned unchanged.
#[must_use]
pub fn extract_command(reply: &str) -> String {
    if !reply.contains("```") {
        return reply.to_string();
    }

    let mut command = String::new();
    let mut in_block = false;
    for line in reply.split('\n') {
        if line.starts_with("```") {
            in_block = !in_block;
        } else if in_block {
            command.push_str(line);
            command.push('\n');
        }
    }
    command
}
