// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for APM core operations.

use thiserror::Error;

/// Result type alias for APM core operations.
pub type Result<T> = std::result::Result<T, ApmCoreError>;

/// Errors that can occur when working with APM core types.
#[derive(Debug, Error)]
pub enum ApmCoreError {
	/// Unknown severity string.
	#[error("invalid severity: {0}")]
	InvalidSeverity(String),

	/// Unknown error source string.
	#[error("invalid error source: {0}")]
	InvalidErrorSource(String),
}
