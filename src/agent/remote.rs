//! HTTP query agent.
//!
//! Talks to an agent executor exposed over HTTP: the request body is
//! `{"input": "<instruction>"}` and the reply carries the answer in its
//! `output` field.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::error::AgentError;
use super::{AgentResponse, QueryAgent};

#[derive(Serialize)]
struct InvokeRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    output: Option<String>,
}

/// Query agent reached over HTTP.
pub struct RemoteAgent {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl RemoteAgent {
    /// Creates an agent posting to `endpoint`.
    pub fn new(endpoint: Url) -> Result<Self> {
        Ok(Self {
            client: crate::llm::ai::build_http_client()?,
            endpoint,
            token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl QueryAgent for RemoteAgent {
    fn answer<'a>(
        &'a self,
        instruction: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AgentResponse>> + Send + 'a>> {
        Box::pin(async move {
            info!(endpoint = %self.endpoint, "Sending instruction to remote query agent");
            debug!(instruction = %instruction, "Remote agent request content");

            let mut builder = self
                .client
                .post(self.endpoint.clone())
                .json(&InvokeRequest { input: instruction });
            if let Some(ref token) = self.token {
                builder = builder.bearer_auth(token);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| AgentError::Unreachable(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_else(|e| {
                    debug!("Failed to read agent error body: {e}");
                    String::new()
                });
                return Err(AgentError::Rejected {
                    status: status.as_u16(),
                    body,
                }
                .into());
            }

            let reply: InvokeResponse = response
                .json()
                .await
                .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;
            let output = reply.output.ok_or(AgentError::MissingOutput)?;

            debug!(output_len = output.len(), "Received remote agent answer");
            Ok(AgentResponse { output })
        })
    }

    fn describe(&self) -> String {
        format!("remote agent at {}", self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn agent_for(server: &MockServer) -> RemoteAgent {
        let url = Url::parse(&format!("{}/invoke", server.uri())).unwrap();
        RemoteAgent::new(url).unwrap()
    }

    #[tokio::test]
    async fn posts_input_and_reads_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invoke"))
            .and(body_json(serde_json::json!({"input": "¿Cuántos hogares?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": "Hay 90,324 hogares.",
                "intermediate_steps": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let agent = agent_for(&server).await;
        let response = agent.answer("¿Cuántos hogares?").await.unwrap();
        assert_eq!(response.output, "Hay 90,324 hogares.");
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"output": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let agent = agent_for(&server).await.with_token("secret");
        assert_eq!(agent.answer("q").await.unwrap().output, "ok");
    }

    #[tokio::test]
    async fn rejected_status_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
            .mount(&server)
            .await;

        let err = agent_for(&server).await.answer("q").await.unwrap_err();
        match err.downcast_ref::<AgentError>() {
            Some(AgentError::Rejected { status, body }) => {
                assert_eq!(*status, 500);
                assert_eq!(body, "database is locked");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_output_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": "x"})),
            )
            .mount(&server)
            .await;

        let err = agent_for(&server).await.answer("q").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AgentError>(),
            Some(AgentError::MissingOutput)
        ));
    }

    #[tokio::test]
    async fn non_json_reply_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = agent_for(&server).await.answer("q").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AgentError>(),
            Some(AgentError::InvalidResponse(_))
        ));
    }

    #[test]
    fn describe_names_endpoint() {
        let agent = RemoteAgent::new(Url::parse("http://localhost:8000/invoke").unwrap()).unwrap();
        assert_eq!(agent.describe(), "remote agent at http://localhost:8000/invoke");
    }
}
