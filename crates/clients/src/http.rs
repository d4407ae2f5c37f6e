//! Blocking JSON-over-HTTP transport shared by the REST adapters.
//!
//! Every request goes through an agent built with a finite timeout, so no
//! call can block indefinitely.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use vdbbench_core::Secret;

use crate::error::{ClientError, ClientResult};

const BODY_PREVIEW: usize = 512;

/// JSON client bound to one base endpoint.
pub(crate) struct HttpClient {
    agent: ureq::Agent,
    base: Secret,
    label: String,
    api_key: Option<Secret>,
}

impl HttpClient {
    /// A client for `base`. `label` replaces the base in error messages.
    pub(crate) fn new(
        base: Secret,
        label: impl Into<String>,
        timeout: Duration,
        api_key: Option<Secret>,
    ) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base,
            label: label.into(),
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.expose().trim_end_matches('/'), path)
    }

    fn display_url(&self, path: &str) -> String {
        format!("{}{}", self.label, path)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let request = self.agent.request(method, &self.url(path));
        match &self.api_key {
            Some(key) => request.set("x-api-key", key.expose()),
            None => request,
        }
    }

    /// Send `body` and decode the JSON response.
    pub(crate) fn send_json<B: Serialize>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> ClientResult<Value> {
        debug!("{} {}", method, self.display_url(path));
        let response = self
            .request(method, path)
            .send_json(body)
            .map_err(|e| self.map_error(path, e))?;
        self.decode(path, response)
    }

    /// Send a request without a body and decode the JSON response.
    pub(crate) fn call(&self, method: &str, path: &str) -> ClientResult<Value> {
        debug!("{} {}", method, self.display_url(path));
        let response = self
            .request(method, path)
            .call()
            .map_err(|e| self.map_error(path, e))?;
        self.decode(path, response)
    }

    fn decode(&self, path: &str, response: ureq::Response) -> ClientResult<Value> {
        response
            .into_json::<Value>()
            .map_err(|e| ClientError::Decode {
                url: self.display_url(path),
                message: e.to_string(),
            })
    }

    fn map_error(&self, path: &str, error: ureq::Error) -> ClientError {
        let url = self.display_url(path);
        match error {
            ureq::Error::Status(status, response) => {
                let mut body = response.into_string().unwrap_or_default();
                if body.len() > BODY_PREVIEW {
                    let mut end = BODY_PREVIEW;
                    while !body.is_char_boundary(end) {
                        end -= 1;
                    }
                    body.truncate(end);
                }
                ClientError::Status { url, status, body }
            }
            // Transport's Display embeds the full URL, which may carry credentials
            ureq::Error::Transport(transport) => {
                let mut message = transport.kind().to_string();
                if let Some(detail) = transport.message() {
                    message.push_str(": ");
                    message.push_str(detail);
                }
                if let Some(source) = std::error::Error::source(&transport) {
                    message.push_str(": ");
                    message.push_str(&source.to_string());
                }
                ClientError::Transport { url, message }
            }
        }
    }
}
