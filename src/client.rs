use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GenerateRequest {
    prompt: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    // Absent or empty is a valid response, not a decode failure.
    #[serde(default)]
    text: Option<String>,
}

/// Client for the generation backend's `POST /api/generate` endpoint.
///
/// Cheap to clone (reqwest pools connections internally), so the controller
/// can move a copy into each request task.
#[derive(Clone)]
pub struct GenerateClient {
    client: Client,
    base_url: String,
}

impl GenerateClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Request one completion for the given prompt.
    ///
    /// Transport errors and non-2xx statuses are both returned as errors;
    /// the controller treats them uniformly. An empty string means the
    /// backend answered but had nothing to say.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            prompt: prompt.to_string(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "coach backend returned status {}",
                response.status()
            ));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.text.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn posts_the_prompt_and_returns_the_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "prompt": "hello coach"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text":"hello back"}"#)
            .create_async()
            .await;

        let client = GenerateClient::new(&server.url());
        let text = client.complete("hello coach").await.unwrap();

        assert_eq!(text, "hello back");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_text_field_decodes_as_empty() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = GenerateClient::new(&server.url());
        assert_eq!(client.complete("hi").await.unwrap(), "");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/generate")
            .with_status(503)
            .create_async()
            .await;

        let client = GenerateClient::new(&server.url());
        let err = client.complete("hi").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_error() {
        // Nothing listens on port 1.
        let client = GenerateClient::new("http://127.0.0.1:1");
        assert!(client.complete("hi").await.is_err());
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_tolerated() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text":"ok"}"#)
            .create_async()
            .await;

        let client = GenerateClient::new(&format!("{}/", server.url()));
        assert_eq!(client.complete("hi").await.unwrap(), "ok");
    }
}
