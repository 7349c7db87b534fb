// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sensitive-field redaction applied before transmission.

use loom_apm_core::{Data, Record};
use serde_json::Value;

use crate::error::CollaboratorError;

/// Marker written in place of redacted values.
pub const REDACTED: &str = "[REDACTED]";

/// Field names redacted by the default masker, matched case-insensitively.
const DEFAULT_SENSITIVE_KEYS: &[&str] = &[
	"password",
	"passwd",
	"secret",
	"token",
	"api_key",
	"apikey",
	"x-api-key",
	"authorization",
	"proxy-authorization",
	"cookie",
	"set-cookie",
	"session",
];

/// Redacts sensitive fields from the data aggregate before it is shipped.
pub trait Masker: Send + Sync {
	/// Returns a copy of `data` with sensitive values replaced.
	fn mask(&self, data: Data) -> Result<Data, CollaboratorError>;
}

/// Identity masker; passes data through untouched.
#[derive(Debug, Clone, Default)]
pub struct NoopMasker;

impl Masker for NoopMasker {
	fn mask(&self, data: Data) -> Result<Data, CollaboratorError> {
		Ok(data)
	}
}

/// Masks values whose key matches a sensitive-name list, recursing into
/// nested objects and arrays.
#[derive(Debug, Clone)]
pub struct FieldMasker {
	keys: Vec<String>,
}

impl FieldMasker {
	/// Creates a masker with the default sensitive-key list.
	pub fn new() -> Self {
		Self {
			keys: DEFAULT_SENSITIVE_KEYS
				.iter()
				.map(|k| (*k).to_string())
				.collect(),
		}
	}

	/// Creates a masker with a custom sensitive-key list.
	pub fn with_keys(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			keys: keys.into_iter().map(|k| k.into().to_lowercase()).collect(),
		}
	}

	fn is_sensitive(&self, key: &str) -> bool {
		let key = key.to_lowercase();
		self.keys.iter().any(|k| k == &key)
	}

	fn mask_record(&self, record: Record) -> Record {
		record
			.into_iter()
			.map(|(key, value)| {
				if self.is_sensitive(&key) {
					(key, Value::String(REDACTED.to_string()))
				} else {
					let masked = self.mask_value(value);
					(key, masked)
				}
			})
			.collect()
	}

	fn mask_value(&self, value: Value) -> Value {
		match value {
			Value::Object(map) => Value::Object(self.mask_record(map)),
			Value::Array(items) => {
				Value::Array(items.into_iter().map(|v| self.mask_value(v)).collect())
			}
			other => other,
		}
	}
}

impl Default for FieldMasker {
	fn default() -> Self {
		Self::new()
	}
}

impl Masker for FieldMasker {
	fn mask(&self, data: Data) -> Result<Data, CollaboratorError> {
		Ok(Data {
			server: self.mask_record(data.server),
			language: self.mask_record(data.language),
			request: self.mask_record(data.request),
			response: self.mask_record(data.response),
			errors: data.errors,
		})
	}
}
