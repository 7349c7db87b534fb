// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom APM collection system.
//!
//! This crate provides the shared value types exchanged between the APM
//! collector SDK (`loom-apm`) and the ingestion endpoint: the per-request
//! payload, the data aggregate of provider snapshots, and the error events
//! accumulated over one request lifecycle.
//!
//! # Overview
//!
//! - One [`Payload`] is assembled and shipped per request lifecycle
//! - [`Data`] aggregates server, language, request, and response snapshots
//!   plus the recorded [`ErrorEvent`]s
//! - [`ErrorEvent`]s accumulate zero or more times before the single send
//! - [`Data::empty`] is the deterministic fallback shape used when masking
//!   or serialization fails downstream

pub mod error;
pub mod event;
pub mod payload;

pub use error::{ApmCoreError, Result};
pub use event::{ErrorEvent, ErrorSource, Severity};
pub use payload::{Data, Payload, Record};
