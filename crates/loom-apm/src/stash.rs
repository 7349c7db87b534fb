// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory error accumulation for one request lifecycle.

use async_trait::async_trait;
use loom_apm_core::ErrorEvent;
use tokio::sync::RwLock;
use tracing::warn;

use crate::error::CollaboratorError;
use crate::provider::ErrorProvider;

/// Default cap on stashed events.
pub const MAX_ERROR_EVENTS: usize = 100;

/// Capped in-memory event store, the default [`ErrorProvider`].
///
/// When the cap is reached the oldest events are dropped so the most recent
/// context survives to the final snapshot.
pub struct ErrorStash {
	events: RwLock<Vec<ErrorEvent>>,
	max_events: usize,
}

impl ErrorStash {
	/// Creates a stash holding at most `max_events` events.
	pub fn new(max_events: usize) -> Self {
		Self {
			events: RwLock::new(Vec::new()),
			max_events,
		}
	}

	/// Number of events currently stashed.
	pub async fn len(&self) -> usize {
		self.events.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.events.read().await.is_empty()
	}
}

impl Default for ErrorStash {
	fn default() -> Self {
		Self::new(MAX_ERROR_EVENTS)
	}
}

#[async_trait]
impl ErrorProvider for ErrorStash {
	async fn add(&self, event: ErrorEvent) -> Result<(), CollaboratorError> {
		let mut events = self.events.write().await;
		events.push(event);

		// Trim to cap, oldest first
		while events.len() > self.max_events {
			let dropped = events.remove(0);
			warn!(
				kind = %dropped.kind,
				source = %dropped.source,
				"Dropped error event due to stash overflow"
			);
		}

		Ok(())
	}

	async fn snapshot(&self) -> Result<Vec<ErrorEvent>, CollaboratorError> {
		Ok(self.events.read().await.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use loom_apm_core::ErrorSource;

	fn event(message: &str) -> ErrorEvent {
		ErrorEvent::new(ErrorSource::Handler, "error", message, None, None)
	}

	#[tokio::test]
	async fn add_and_snapshot_preserve_order() {
		let stash = ErrorStash::default();
		stash.add(event("first")).await.unwrap();
		stash.add(event("second")).await.unwrap();

		let events = stash.snapshot().await.unwrap();
		assert_eq!(events.len(), 2);
		assert_eq!(events[0].message, "first");
		assert_eq!(events[1].message, "second");
	}

	#[tokio::test]
	async fn overflow_drops_oldest() {
		let stash = ErrorStash::new(3);
		for i in 0..5 {
			stash.add(event(&format!("event{i}"))).await.unwrap();
		}

		let events = stash.snapshot().await.unwrap();
		assert_eq!(events.len(), 3);
		assert_eq!(events[0].message, "event2");
		assert_eq!(events[2].message, "event4");
	}

	#[tokio::test]
	async fn snapshot_does_not_drain() {
		let stash = ErrorStash::default();
		stash.add(event("kept")).await.unwrap();

		let _ = stash.snapshot().await.unwrap();
		assert_eq!(stash.len().await, 1);
	}
}
