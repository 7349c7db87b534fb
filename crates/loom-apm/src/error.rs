// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the APM SDK.

use thiserror::Error;

/// Boxed error returned by provider and masker collaborators.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for APM SDK operations.
pub type Result<T> = std::result::Result<T, ApmSdkError>;

/// Errors that can occur in the APM SDK.
#[derive(Debug, Error)]
pub enum ApmSdkError {
	/// API key was not supplied to the builder.
	#[error("API key is required")]
	MissingApiKey,

	/// Project ID was not supplied to the builder.
	#[error("project ID is required")]
	MissingProjectId,

	/// A provider failed to produce its snapshot.
	#[error("{domain} provider failed: {source}")]
	Provider {
		/// Which domain's provider failed.
		domain: &'static str,
		#[source]
		source: CollaboratorError,
	},

	/// The masker rejected the data aggregate.
	#[error("masking failed: {0}")]
	MaskingFailed(#[source] CollaboratorError),

	/// Failed to serialize the payload.
	#[error("serialization error: {0}")]
	SerializationError(#[from] serde_json::Error),

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Server returned an error.
	#[error("server error (status {status}): {message}")]
	ServerError {
		/// HTTP status code.
		status: u16,
		/// Error message from server.
		message: String,
	},
}
