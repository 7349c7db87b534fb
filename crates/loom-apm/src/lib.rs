// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! APM collection SDK for Rust applications.
//!
//! Embedded in a host application, the SDK gathers contextual snapshots of
//! the current request/response cycle, the runtime, and any errors recorded
//! during the request, assembles one payload per request lifecycle, masks
//! sensitive fields, and ships the result with a single best-effort POST to
//! the Loom ingestion endpoint.
//!
//! # Overview
//!
//! - [`Collector`] orchestrates assembly and delivery, one instance per
//!   request lifecycle
//! - Provider traits ([`ServerProvider`], [`LanguageProvider`],
//!   [`RequestProvider`], [`ResponseProvider`], [`ErrorProvider`]) supply
//!   domain snapshots; host-side defaults are included
//! - [`Masker`] redacts sensitive fields before transmission;
//!   [`FieldMasker`] is the default
//! - [`Transport`] performs the send; [`HttpTransport`] is the default and
//!   all collaborators are injected explicitly at build time
//! - [`FailurePolicy`] decides at every fallible step whether faults are
//!   swallowed (production) or propagated (integration)
//!
//! There are no retries, no batching, and no background workers: at most one
//! POST leaves the process per request lifecycle.

pub mod collector;
pub mod error;
pub mod http;
pub mod masker;
pub mod policy;
pub mod provider;
pub mod stash;
pub mod transport;

pub use collector::{Collector, CollectorBuilder, CollectorConfig, DEFAULT_BASE_URL};
pub use error::{ApmSdkError, CollaboratorError, Result};
pub use masker::{FieldMasker, Masker, NoopMasker, REDACTED};
pub use policy::FailurePolicy;
pub use provider::{
	ErrorProvider, FixedRequestProvider, FixedResponseProvider, HostServerProvider,
	LanguageProvider, RequestProvider, ResponseProvider, RustLanguageProvider, ServerProvider,
};
pub use stash::{ErrorStash, MAX_ERROR_EVENTS};
pub use transport::{HttpTransport, IngestRequest, IngestResponse, Transport};

// Re-export the core types embedders handle directly.
pub use loom_apm_core::{Data, ErrorEvent, ErrorSource, Payload, Record, Severity};
