// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error events recorded during one request lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ApmCoreError;

/// An error recorded by the collector's error/exception hooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
	/// Which hook reported the error.
	pub source: ErrorSource,
	/// Severity label or exception type name.
	#[serde(rename = "type")]
	pub kind: String,
	pub message: String,
	pub file: Option<String>,
	pub line: Option<u32>,
	/// When the event was recorded.
	pub timestamp: DateTime<Utc>,
}

impl ErrorEvent {
	/// Creates an event stamped with the current time.
	pub fn new(
		source: ErrorSource,
		kind: impl Into<String>,
		message: impl Into<String>,
		file: Option<String>,
		line: Option<u32>,
	) -> Self {
		Self {
			source,
			kind: kind.into(),
			message: message.into(),
			file,
			line,
			timestamp: Utc::now(),
		}
	}
}

/// Which hook produced an [`ErrorEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSource {
	/// Reported through the error handler hook.
	Handler,
	/// Captured from a concrete error value.
	Exception,
}

impl fmt::Display for ErrorSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Handler => write!(f, "handler"),
			Self::Exception => write!(f, "exception"),
		}
	}
}

impl FromStr for ErrorSource {
	type Err = ApmCoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"handler" => Ok(Self::Handler),
			"exception" => Ok(Self::Exception),
			_ => Err(ApmCoreError::InvalidErrorSource(s.to_string())),
		}
	}
}

/// Severity of a handler-reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
	Debug,
	Info,
	Warning,
	Error,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Debug => write!(f, "debug"),
			Self::Info => write!(f, "info"),
			Self::Warning => write!(f, "warning"),
			Self::Error => write!(f, "error"),
		}
	}
}

impl FromStr for Severity {
	type Err = ApmCoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"debug" => Ok(Self::Debug),
			"info" => Ok(Self::Info),
			"warning" => Ok(Self::Warning),
			"error" => Ok(Self::Error),
			_ => Err(ApmCoreError::InvalidSeverity(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn event_serializes_kind_as_type() {
		let event = ErrorEvent::new(
			ErrorSource::Handler,
			"warning",
			"deprecated call",
			Some("app.rs".to_string()),
			Some(42),
		);
		let json = serde_json::to_value(&event).unwrap();
		assert_eq!(json["type"], "warning");
		assert_eq!(json["source"], "handler");
		assert_eq!(json["file"], "app.rs");
		assert_eq!(json["line"], 42);
	}

	#[test]
	fn invalid_severity_is_rejected() {
		let err = "fatal".parse::<Severity>().unwrap_err();
		assert!(matches!(err, ApmCoreError::InvalidSeverity(_)));
	}

	proptest! {
		#[test]
		fn severity_roundtrip(severity in prop_oneof![
			Just(Severity::Debug),
			Just(Severity::Info),
			Just(Severity::Warning),
			Just(Severity::Error),
		]) {
			let s = severity.to_string();
			let parsed: Severity = s.parse().unwrap();
			prop_assert_eq!(severity, parsed);
		}

		#[test]
		fn error_source_roundtrip(source in prop_oneof![
			Just(ErrorSource::Handler),
			Just(ErrorSource::Exception),
		]) {
			let s = source.to_string();
			let parsed: ErrorSource = s.parse().unwrap();
			prop_assert_eq!(source, parsed);
		}
	}
}
