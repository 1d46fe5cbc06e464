// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource type lookup collaborator.
//!
//! The engine asks this collaborator which [`ResourceType`] a resource id belongs
//! to. Implementations are persistence-backed; the trait keeps the engine free of
//! any storage dependency.

use async_trait::async_trait;
use uuid::Uuid;

use super::types::ResourceType;

/// Result of classifying a resource id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
	Found(ResourceType),
	NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
	#[error("lookup backend failed: {0}")]
	Backend(String),

	#[error("stored resource has an unrecognized type: {0}")]
	UnknownType(String),
}

#[async_trait]
pub trait ResourceTypeLookup: Send + Sync {
	/// Determine the runtime subtype of `id`.
	async fn classify(&self, id: Uuid) -> Result<Classification, LookupError>;
}
