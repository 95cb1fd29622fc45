//! One-shot AI text replies.
//!
//! Each flow substitutes caller text into a fixed prompt template and
//! invokes the hosted model once. No state, no retries: upstream
//! failures surface verbatim to the caller.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Caller-supplied text was empty or whitespace; detected before
    /// any network round-trip.
    #[error("prompt text is empty")]
    EmptyInput,

    /// The hosted model call failed (network, quota, malformed or
    /// empty response). Carries the client's report verbatim.
    #[error("model request failed: {0}")]
    Upstream(String),
}

/// Opaque text-completion function over a hosted model.
#[allow(async_fn_in_trait)]
pub trait TextModel {
    async fn complete(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Generate an initial post from a short user prompt.
pub async fn generate_post_content(model: &impl TextModel, prompt: &str) -> Result<String, GenerateError> {
    let prompt = require_text(prompt)?;
    run(model, format!("Generate an initial post based on the following prompt: {prompt}")).await
}

/// Translate text into the named target language (e.g. "es", "fr").
pub async fn translate_text(
    model: &impl TextModel,
    text: &str,
    target_language: &str,
) -> Result<String, GenerateError> {
    let text = require_text(text)?;
    let target_language = require_text(target_language)?;
    run(model, format!("Translate the following text to {target_language}: {text}")).await
}

/// Summarize a comma-separated list of trending topics.
pub async fn summarize_trending_topics(model: &impl TextModel, topics: &str) -> Result<String, GenerateError> {
    let topics = require_text(topics)?;
    run(
        model,
        format!(
            "You are an AI assistant specializing in summarizing trending topics.\n\n\
             Provide a concise summary of the following trending topics:\n\n{topics}"
        ),
    )
    .await
}

fn require_text(text: &str) -> Result<&str, GenerateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerateError::EmptyInput);
    }
    Ok(trimmed)
}

async fn run(model: &impl TextModel, prompt: String) -> Result<String, GenerateError> {
    debug!(prompt_len = prompt.len(), "invoking hosted model");
    let completion = model.complete(&prompt).await?;
    let completion = completion.trim();
    if completion.is_empty() {
        // A structurally valid reply with nothing in it is a failure,
        // not an empty success.
        return Err(GenerateError::Upstream("empty response".to_string()));
    }
    Ok(completion.to_string())
}

/// Hosted model client speaking a minimal JSON completion protocol:
/// POST `{ model, prompt }`, receive `{ text }`.
pub struct HostedModel {
    http: reqwest::Client,
    endpoint: url::Url,
    model: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    text: String,
}

impl HostedModel {
    pub fn new(endpoint: url::Url, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            model: model.into(),
            api_key,
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            config.model_endpoint.clone(),
            config.model_name.clone(),
            config.model_api_key.clone(),
        )
    }
}

impl TextModel for HostedModel {
    async fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        let mut request = self.http.post(self.endpoint.clone()).json(&serde_json::json!({
            "model": self.model,
            "prompt": prompt,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| GenerateError::Upstream(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Upstream(format!("HTTP {status}: {body}")));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|err| GenerateError::Upstream(format!("malformed response: {err}")))?;
        Ok(completion.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedModel(&'static str);

    impl TextModel for CannedModel {
        async fn complete(&self, _prompt: &str) -> Result<String, GenerateError> {
            Ok(self.0.to_string())
        }
    }

    struct EchoModel;

    impl TextModel for EchoModel {
        async fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
            Ok(prompt.to_string())
        }
    }

    #[tokio::test]
    async fn templates_substitute_caller_text() {
        let prompt = generate_post_content(&EchoModel, "a rainy day").await.expect("generate");
        assert_eq!(prompt, "Generate an initial post based on the following prompt: a rainy day");

        let prompt = translate_text(&EchoModel, "hello", "es").await.expect("translate");
        assert_eq!(prompt, "Translate the following text to es: hello");
    }

    #[tokio::test]
    async fn whitespace_completion_is_an_upstream_error() {
        let err = generate_post_content(&CannedModel("   "), "hi").await.unwrap_err();
        match err {
            GenerateError::Upstream(message) => assert_eq!(message, "empty response"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn input_is_trimmed_before_templating() {
        let out = translate_text(&EchoModel, "  bonjour  ", " fr ").await.expect("translate");
        assert_eq!(out, "Translate the following text to fr: bonjour");
    }
}
