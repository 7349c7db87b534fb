// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client construction with the SDK User-Agent header.

use reqwest::{Client, ClientBuilder};

/// Creates an HTTP client builder with the standard APM User-Agent header.
///
/// Use this when the client needs further customization (e.g. a timeout).
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Returns the SDK User-Agent string.
///
/// Format: `loom-apm/{version}/{os}-{arch}`
/// Example: `loom-apm/0.1.0/linux-x86_64`
pub fn user_agent() -> String {
	format!(
		"loom-apm/{}/{}-{}",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_correct_format() {
		let ua = user_agent();
		assert!(ua.starts_with("loom-apm/"));
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts.len(), 3);
		assert_eq!(parts[1], env!("CARGO_PKG_VERSION"));
	}

	#[test]
	fn builder_produces_a_client() {
		assert!(builder().build().is_ok());
	}
}
