// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Failure policy applied at every fallible step of the pipeline.

use tracing::error;

use crate::error::Result;

/// What to do when a collection step fails.
///
/// Evaluated uniformly at each fallible step: provider reads, masking,
/// serialization, and the outbound send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
	/// Log the fault and continue with a fallback value. Collection must
	/// never crash or block the host application.
	#[default]
	Swallow,
	/// Return the error to the caller. Intended for integration work.
	Propagate,
}

impl FailurePolicy {
	/// Resolves a step result against this policy.
	///
	/// Under [`Swallow`](Self::Swallow) a failure is logged and replaced by
	/// the fallback; under [`Propagate`](Self::Propagate) it is returned.
	pub fn absorb<T>(self, step: &'static str, result: Result<T>, fallback: impl FnOnce() -> T) -> Result<T> {
		match result {
			Ok(value) => Ok(value),
			Err(e) => match self {
				Self::Swallow => {
					error!(step, error = %e, "APM step failed, continuing");
					Ok(fallback())
				}
				Self::Propagate => Err(e),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ApmSdkError;

	#[test]
	fn swallow_substitutes_fallback() {
		let result: Result<u32> = Err(ApmSdkError::MissingApiKey);
		let resolved = FailurePolicy::Swallow.absorb("test", result, || 7);
		assert_eq!(resolved.unwrap(), 7);
	}

	#[test]
	fn swallow_passes_success_through() {
		let resolved = FailurePolicy::Swallow.absorb("test", Ok(1), || 7);
		assert_eq!(resolved.unwrap(), 1);
	}

	#[test]
	fn propagate_returns_the_error() {
		let result: Result<u32> = Err(ApmSdkError::MissingApiKey);
		let resolved = FailurePolicy::Propagate.absorb("test", result, || 7);
		assert!(matches!(resolved, Err(ApmSdkError::MissingApiKey)));
	}

	#[test]
	fn default_is_swallow() {
		assert_eq!(FailurePolicy::default(), FailurePolicy::Swallow);
	}
}
