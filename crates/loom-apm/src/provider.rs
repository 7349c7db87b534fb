// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider traits and host-side implementations.
//!
//! Each provider exposes one capability: produce a current snapshot of its
//! domain as a flat [`Record`]. The error provider additionally accumulates
//! [`ErrorEvent`]s before its final snapshot.

use async_trait::async_trait;
use loom_apm_core::{ErrorEvent, Record};
use serde_json::Value;

use crate::error::CollaboratorError;

/// Produces a snapshot of the host server environment.
pub trait ServerProvider: Send + Sync {
	fn snapshot(&self) -> Result<Record, CollaboratorError>;
}

/// Produces a snapshot of the language runtime.
pub trait LanguageProvider: Send + Sync {
	fn snapshot(&self) -> Result<Record, CollaboratorError>;
}

/// Produces a snapshot of the current inbound request.
pub trait RequestProvider: Send + Sync {
	fn snapshot(&self) -> Result<Record, CollaboratorError>;
}

/// Produces a snapshot of the outbound response.
pub trait ResponseProvider: Send + Sync {
	fn snapshot(&self) -> Result<Record, CollaboratorError>;
}

/// Accumulates error events during the request and reports them at the end.
#[async_trait]
pub trait ErrorProvider: Send + Sync {
	/// Records one event.
	async fn add(&self, event: ErrorEvent) -> Result<(), CollaboratorError>;
	/// Returns the events recorded so far, oldest first.
	async fn snapshot(&self) -> Result<Vec<ErrorEvent>, CollaboratorError>;
}

/// Server snapshot read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct HostServerProvider;

impl ServerProvider for HostServerProvider {
	fn snapshot(&self) -> Result<Record, CollaboratorError> {
		let mut record = Record::new();
		if let Ok(hostname) = std::env::var("HOSTNAME") {
			record.insert("hostname".to_string(), Value::String(hostname));
		}
		record.insert(
			"os".to_string(),
			Value::String(std::env::consts::OS.to_string()),
		);
		record.insert(
			"arch".to_string(),
			Value::String(std::env::consts::ARCH.to_string()),
		);
		record.insert("pid".to_string(), Value::from(std::process::id()));
		Ok(record)
	}
}

/// Language snapshot for the Rust runtime.
#[derive(Debug, Clone, Default)]
pub struct RustLanguageProvider {
	toolchain: Option<String>,
}

impl RustLanguageProvider {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the toolchain version reported alongside the language name.
	pub fn with_toolchain(mut self, toolchain: impl Into<String>) -> Self {
		self.toolchain = Some(toolchain.into());
		self
	}
}

impl LanguageProvider for RustLanguageProvider {
	fn snapshot(&self) -> Result<Record, CollaboratorError> {
		let mut record = Record::new();
		record.insert("name".to_string(), Value::String("rust".to_string()));
		if let Some(toolchain) = &self.toolchain {
			record.insert("version".to_string(), Value::String(toolchain.clone()));
		}
		Ok(record)
	}
}

/// Request snapshot captured ahead of time by the embedding integration.
///
/// This layer has no framework coupling; the integration that sits inside
/// the host's middleware builds the record and hands it over.
#[derive(Debug, Clone, Default)]
pub struct FixedRequestProvider {
	record: Record,
}

impl FixedRequestProvider {
	pub fn new(record: Record) -> Self {
		Self { record }
	}
}

impl RequestProvider for FixedRequestProvider {
	fn snapshot(&self) -> Result<Record, CollaboratorError> {
		Ok(self.record.clone())
	}
}

/// Response snapshot captured ahead of time by the embedding integration.
#[derive(Debug, Clone, Default)]
pub struct FixedResponseProvider {
	record: Record,
}

impl FixedResponseProvider {
	pub fn new(record: Record) -> Self {
		Self { record }
	}
}

impl ResponseProvider for FixedResponseProvider {
	fn snapshot(&self) -> Result<Record, CollaboratorError> {
		Ok(self.record.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn host_server_snapshot_reports_platform() {
		let record = HostServerProvider.snapshot().unwrap();
		assert_eq!(record["os"], std::env::consts::OS);
		assert_eq!(record["arch"], std::env::consts::ARCH);
		assert!(record.contains_key("pid"));
	}

	#[test]
	fn language_snapshot_names_rust() {
		let record = RustLanguageProvider::new().snapshot().unwrap();
		assert_eq!(record["name"], "rust");
		assert!(!record.contains_key("version"));
	}

	#[test]
	fn language_snapshot_includes_toolchain_when_set() {
		let record = RustLanguageProvider::new()
			.with_toolchain("1.77.0")
			.snapshot()
			.unwrap();
		assert_eq!(record["version"], "1.77.0");
	}

	#[test]
	fn fixed_providers_return_their_record() {
		let mut record = Record::new();
		record.insert("method".to_string(), Value::String("GET".to_string()));
		let provider = FixedRequestProvider::new(record.clone());
		assert_eq!(provider.snapshot().unwrap(), record);
	}
}
