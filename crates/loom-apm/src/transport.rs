// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound transport for the assembled payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{ApmSdkError, Result};
use crate::http;

/// One prepared ingestion request: endpoint, credentials, serialized body.
#[derive(Debug, Clone)]
pub struct IngestRequest {
	pub endpoint: String,
	pub api_key: String,
	/// JSON-serialized payload bytes.
	pub body: Vec<u8>,
}

/// Result of one ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestResponse {
	pub status: u16,
	pub body: String,
}

/// Sends one prepared request, fire-and-forget. No retries live here or
/// anywhere above; the collector issues at most one send per request
/// lifecycle.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, request: IngestRequest) -> Result<IngestResponse>;
}

/// Default transport: a single HTTP POST via `reqwest`.
pub struct HttpTransport {
	client: Client,
}

impl HttpTransport {
	/// Creates a transport with the SDK user agent and the given timeout.
	pub fn new(timeout: Duration) -> Result<Self> {
		let client = http::builder().timeout(timeout).build()?;
		Ok(Self { client })
	}

	/// Wraps an existing client, e.g. one shared with the host application.
	pub fn from_client(client: Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, request: IngestRequest) -> Result<IngestResponse> {
		debug!(endpoint = %request.endpoint, bytes = request.body.len(), "Sending APM payload");

		let response = self
			.client
			.post(&request.endpoint)
			.header("content-type", "application/json")
			.header("x-api-key", &request.api_key)
			.body(request.body)
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await.unwrap_or_default();

		if !status.is_success() {
			return Err(ApmSdkError::ServerError {
				status: status.as_u16(),
				message: body,
			});
		}

		Ok(IngestResponse {
			status: status.as_u16(),
			body,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn request(endpoint: String) -> IngestRequest {
		IngestRequest {
			endpoint,
			api_key: "loom_apm_key".to_string(),
			body: b"{}".to_vec(),
		}
	}

	#[tokio::test]
	async fn send_posts_json_with_api_key_header() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/intake/v1/ingest"))
			.and(header("x-api-key", "loom_apm_key"))
			.and(header("content-type", "application/json"))
			.respond_with(ResponseTemplate::new(200).set_body_string("ok"))
			.expect(1)
			.mount(&server)
			.await;

		let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
		let response = transport
			.send(request(format!("{}/intake/v1/ingest", server.uri())))
			.await
			.unwrap();

		assert_eq!(response.status, 200);
		assert_eq!(response.body, "ok");
	}

	#[tokio::test]
	async fn non_success_status_is_a_server_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
			.expect(1)
			.mount(&server)
			.await;

		let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
		let err = transport
			.send(request(format!("{}/intake/v1/ingest", server.uri())))
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			ApmSdkError::ServerError { status: 403, ref message } if message == "bad key"
		));
	}
}
