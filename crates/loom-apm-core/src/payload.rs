// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The per-request payload shipped to the ingestion endpoint.

use serde::{Deserialize, Serialize};

use crate::event::ErrorEvent;

/// A flat snapshot produced by one provider.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Aggregate of all provider snapshots for one request lifecycle.
///
/// Plain value object: built once, never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data {
	pub server: Record,
	pub language: Record,
	pub request: Record,
	pub response: Record,
	pub errors: Vec<ErrorEvent>,
}

impl Data {
	/// The deterministic fallback shape: four empty records, no errors.
	///
	/// Sent in place of real data when masking or serialization fails and
	/// the failure policy absorbs the fault.
	pub fn empty() -> Self {
		Self {
			server: Record::new(),
			language: Record::new(),
			request: Record::new(),
			response: Record::new(),
			errors: Vec::new(),
		}
	}
}

/// The body POSTed to the ingestion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payload {
	pub api_key: String,
	pub project_id: String,
	/// SDK crate version.
	pub version: String,
	/// SDK name constant.
	pub sdk: String,
	pub data: Data,
}

impl Payload {
	/// A payload carrying real credentials but [`Data::empty`] content.
	pub fn empty(
		api_key: impl Into<String>,
		project_id: impl Into<String>,
		version: impl Into<String>,
		sdk: impl Into<String>,
	) -> Self {
		Self {
			api_key: api_key.into(),
			project_id: project_id.into(),
			version: version.into(),
			sdk: sdk.into(),
			data: Data::empty(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_payload() -> Payload {
		Payload::empty("loom_apm_key", "proj_123", "0.1.0", "loom-apm-rust")
	}

	#[test]
	fn payload_has_exactly_the_wire_keys() {
		let json = serde_json::to_value(test_payload()).unwrap();
		let object = json.as_object().unwrap();
		assert_eq!(object.len(), 5);
		for key in ["api_key", "project_id", "version", "sdk", "data"] {
			assert!(object.contains_key(key), "missing key {key}");
		}
	}

	#[test]
	fn data_has_exactly_the_five_domains() {
		let json = serde_json::to_value(Data::empty()).unwrap();
		let object = json.as_object().unwrap();
		assert_eq!(object.len(), 5);
		for key in ["server", "language", "request", "response", "errors"] {
			assert!(object.contains_key(key), "missing key {key}");
		}
	}

	#[test]
	fn empty_data_is_empty_objects_and_list() {
		let json = serde_json::to_value(Data::empty()).unwrap();
		for domain in ["server", "language", "request", "response"] {
			assert!(json[domain].as_object().unwrap().is_empty());
		}
		assert!(json["errors"].as_array().unwrap().is_empty());
	}

	#[test]
	fn payload_roundtrips_through_json() {
		let payload = test_payload();
		let bytes = serde_json::to_vec(&payload).unwrap();
		let back: Payload = serde_json::from_slice(&bytes).unwrap();
		assert_eq!(back.api_key, payload.api_key);
		assert_eq!(back.project_id, payload.project_id);
		assert!(back.data.errors.is_empty());
	}
}
