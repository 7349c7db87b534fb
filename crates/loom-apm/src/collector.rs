// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The collector: per-request payload assembly and delivery.

use std::sync::Arc;
use std::time::Duration;

use loom_apm_core::{Data, ErrorEvent, ErrorSource, Payload, Record, Severity};
use tracing::{debug, info};

use crate::error::{ApmSdkError, Result};
use crate::masker::{FieldMasker, Masker};
use crate::policy::FailurePolicy;
use crate::provider::{
	ErrorProvider, FixedRequestProvider, FixedResponseProvider, HostServerProvider,
	LanguageProvider, RequestProvider, ResponseProvider, RustLanguageProvider, ServerProvider,
};
use crate::stash::{ErrorStash, MAX_ERROR_EVENTS};
use crate::transport::{HttpTransport, IngestRequest, Transport};

/// SDK version for identification.
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
const SDK_NAME: &str = "loom-apm-rust";

/// Production ingestion endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://loom.ghuntley.com";
/// Ingestion path appended to the base URL.
const INGEST_PATH: &str = "/intake/v1/ingest";

/// Configuration for the collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
	/// Timeout for the outbound HTTP request.
	pub request_timeout: Duration,
	/// Maximum error events stashed per request.
	pub max_error_events: usize,
}

impl Default for CollectorConfig {
	fn default() -> Self {
		Self {
			request_timeout: Duration::from_secs(30),
			max_error_events: MAX_ERROR_EVENTS,
		}
	}
}

/// Builder for constructing a [`Collector`].
pub struct CollectorBuilder {
	api_key: Option<String>,
	project_id: Option<String>,
	base_url: Option<String>,
	policy: FailurePolicy,
	config: CollectorConfig,
	server: Option<Arc<dyn ServerProvider>>,
	language: Option<Arc<dyn LanguageProvider>>,
	request: Option<Arc<dyn RequestProvider>>,
	response: Option<Arc<dyn ResponseProvider>>,
	errors: Option<Arc<dyn ErrorProvider>>,
	masker: Option<Arc<dyn Masker>>,
	transport: Option<Arc<dyn Transport>>,
}

impl CollectorBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			api_key: None,
			project_id: None,
			base_url: None,
			policy: FailurePolicy::default(),
			config: CollectorConfig::default(),
			server: None,
			language: None,
			request: None,
			response: None,
			errors: None,
			masker: None,
			transport: None,
		}
	}

	/// Sets the API key sent in the `x-api-key` header and payload.
	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());
		self
	}

	/// Sets the project ID for this application.
	pub fn project_id(mut self, id: impl Into<String>) -> Self {
		self.project_id = Some(id.into());
		self
	}

	/// Overrides the ingestion endpoint base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	/// Sets the failure policy applied at every fallible step.
	pub fn policy(mut self, policy: FailurePolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	/// Sets the maximum number of error events stashed per request.
	pub fn max_error_events(mut self, max: usize) -> Self {
		self.config.max_error_events = max;
		self
	}

	/// Replaces the server snapshot provider.
	pub fn server_provider(mut self, provider: Arc<dyn ServerProvider>) -> Self {
		self.server = Some(provider);
		self
	}

	/// Replaces the language snapshot provider.
	pub fn language_provider(mut self, provider: Arc<dyn LanguageProvider>) -> Self {
		self.language = Some(provider);
		self
	}

	/// Replaces the request snapshot provider.
	pub fn request_provider(mut self, provider: Arc<dyn RequestProvider>) -> Self {
		self.request = Some(provider);
		self
	}

	/// Replaces the response snapshot provider.
	pub fn response_provider(mut self, provider: Arc<dyn ResponseProvider>) -> Self {
		self.response = Some(provider);
		self
	}

	/// Replaces the error accumulation provider.
	pub fn error_provider(mut self, provider: Arc<dyn ErrorProvider>) -> Self {
		self.errors = Some(provider);
		self
	}

	/// Replaces the masker.
	pub fn masker(mut self, masker: Arc<dyn Masker>) -> Self {
		self.masker = Some(masker);
		self
	}

	/// Replaces the transport. Injected explicitly; there is no runtime
	/// discovery of HTTP implementations.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Builds the collector.
	pub fn build(self) -> Result<Collector> {
		let api_key = self.api_key.ok_or(ApmSdkError::MissingApiKey)?;
		let project_id = self.project_id.ok_or(ApmSdkError::MissingProjectId)?;

		// Normalize base URL
		let base_url = self
			.base_url
			.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
		let endpoint = format!("{}{INGEST_PATH}", base_url.trim_end_matches('/'));

		let transport: Arc<dyn Transport> = match self.transport {
			Some(transport) => transport,
			None => Arc::new(HttpTransport::new(self.config.request_timeout)?),
		};

		let collector = Collector {
			api_key,
			project_id,
			endpoint: endpoint.clone(),
			policy: self.policy,
			server: self
				.server
				.unwrap_or_else(|| Arc::new(HostServerProvider)),
			language: self
				.language
				.unwrap_or_else(|| Arc::new(RustLanguageProvider::new())),
			request: self
				.request
				.unwrap_or_else(|| Arc::new(FixedRequestProvider::default())),
			response: self
				.response
				.unwrap_or_else(|| Arc::new(FixedResponseProvider::default())),
			errors: self.errors.unwrap_or_else(|| {
				Arc::new(ErrorStash::new(self.config.max_error_events))
			}),
			masker: self.masker.unwrap_or_else(|| Arc::new(FieldMasker::new())),
			transport,
		};

		info!(endpoint = %endpoint, "APM collector initialized");

		Ok(collector)
	}
}

impl Default for CollectorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Collects request-cycle context and ships it at end-of-request.
///
/// One instance serves one request lifecycle: error hooks accumulate events,
/// then [`on_shutdown`](Collector::on_shutdown) assembles, masks, serializes,
/// and POSTs exactly one payload, best-effort.
///
/// # Example
///
/// ```ignore
/// use loom_apm::Collector;
///
/// let collector = Collector::builder()
///     .api_key("loom_apm_xxx")
///     .project_id("proj_xxx")
///     .build()?;
///
/// // Error hook
/// collector.on_error(Severity::Warning, "deprecated call", None, None).await?;
///
/// // Exception hook
/// if let Err(e) = handle(req) {
///     collector.on_exception(&e).await?;
/// }
///
/// // End of request
/// collector.on_shutdown().await?;
/// ```
pub struct Collector {
	api_key: String,
	project_id: String,
	endpoint: String,
	policy: FailurePolicy,
	server: Arc<dyn ServerProvider>,
	language: Arc<dyn LanguageProvider>,
	request: Arc<dyn RequestProvider>,
	response: Arc<dyn ResponseProvider>,
	errors: Arc<dyn ErrorProvider>,
	masker: Arc<dyn Masker>,
	transport: Arc<dyn Transport>,
}

impl Collector {
	/// Creates a new builder for constructing a Collector.
	pub fn builder() -> CollectorBuilder {
		CollectorBuilder::new()
	}

	/// Records a handler-reported error.
	///
	/// Append failures are absorbed per the failure policy; under
	/// [`FailurePolicy::Swallow`] request processing continues unaffected.
	pub async fn on_error(
		&self,
		severity: Severity,
		message: impl Into<String>,
		file: Option<String>,
		line: Option<u32>,
	) -> Result<()> {
		let event = ErrorEvent::new(
			ErrorSource::Handler,
			severity.to_string(),
			message,
			file,
			line,
		);
		self.record(event).await
	}

	/// Records a captured error value.
	///
	/// The event's type is the concrete error type name, the message its
	/// `Display` output, and file/line the call site of this hook.
	#[track_caller]
	pub fn on_exception<'a, E>(
		&'a self,
		error: &'a E,
	) -> impl std::future::Future<Output = Result<()>> + 'a
	where
		E: std::error::Error + ?Sized,
	{
		let location = std::panic::Location::caller();
		let event = ErrorEvent::new(
			ErrorSource::Exception,
			std::any::type_name_of_val(error),
			error.to_string(),
			Some(location.file().to_string()),
			Some(location.line()),
		);
		async move { self.record(event).await }
	}

	async fn record(&self, event: ErrorEvent) -> Result<()> {
		debug!(kind = %event.kind, source = %event.source, "Recording error event");
		let result = self
			.errors
			.add(event)
			.await
			.map_err(|e| ApmSdkError::Provider {
				domain: "error",
				source: e,
			});
		self.policy.absorb("record error event", result, || ())
	}

	/// Assembles the payload from all provider snapshots.
	///
	/// A failing provider contributes an empty record under
	/// [`FailurePolicy::Swallow`]; the error stash is read, not drained.
	pub async fn build_payload(&self) -> Result<Payload> {
		let server = self.snapshot("server", || self.server.snapshot())?;
		let language = self.snapshot("language", || self.language.snapshot())?;
		let request = self.snapshot("request", || self.request.snapshot())?;
		let response = self.snapshot("response", || self.response.snapshot())?;

		let errors = self.policy.absorb(
			"snapshot errors",
			self.errors
				.snapshot()
				.await
				.map_err(|e| ApmSdkError::Provider {
					domain: "error",
					source: e,
				}),
			Vec::new,
		)?;

		Ok(Payload {
			api_key: self.api_key.clone(),
			project_id: self.project_id.clone(),
			version: SDK_VERSION.to_string(),
			sdk: SDK_NAME.to_string(),
			data: Data {
				server,
				language,
				request,
				response,
				errors,
			},
		})
	}

	fn snapshot(
		&self,
		domain: &'static str,
		read: impl FnOnce() -> std::result::Result<Record, crate::error::CollaboratorError>,
	) -> Result<Record> {
		self.policy.absorb(
			"snapshot provider",
			read().map_err(|e| ApmSdkError::Provider { domain, source: e }),
			Record::new,
		)
	}

	/// Masks, serializes, and ships the payload. Exactly one POST is issued
	/// per invocation; there are no retries.
	///
	/// On mask or serialization failure the deterministic empty payload
	/// (credentials intact, [`Data::empty`]) is sent instead, unless the
	/// policy propagates.
	pub async fn on_shutdown(&self) -> Result<()> {
		let payload = self.build_payload().await?;
		let Payload {
			api_key,
			project_id,
			version,
			sdk,
			data,
		} = payload;

		let data = self.policy.absorb(
			"mask data",
			self.masker.mask(data).map_err(ApmSdkError::MaskingFailed),
			Data::empty,
		)?;

		let payload = Payload {
			api_key,
			project_id,
			version,
			sdk,
			data,
		};

		let body = self.policy.absorb(
			"serialize payload",
			serde_json::to_vec(&payload).map_err(ApmSdkError::from),
			|| empty_payload_bytes(&payload),
		)?;

		let request = IngestRequest {
			endpoint: self.endpoint.clone(),
			api_key: self.api_key.clone(),
			body,
		};

		match self.transport.send(request).await {
			Ok(response) => {
				info!(status = response.status, "APM payload delivered");
				Ok(())
			}
			Err(e) => self.policy.absorb("send payload", Err(e), || ()),
		}
	}
}

/// Serialized form of the empty fallback payload.
fn empty_payload_bytes(payload: &Payload) -> Vec<u8> {
	let empty = Payload::empty(
		payload.api_key.clone(),
		payload.project_id.clone(),
		payload.version.clone(),
		payload.sdk.clone(),
	);
	serde_json::to_vec(&empty).unwrap_or_default()
}
