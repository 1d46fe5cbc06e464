// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-based access control constants.
//!
//! These values are read once at startup and never change while the server runs:
//!
//! - `org_prefix`: namespace prepended to every synthesized role
//!   (`{org_prefix}.{Permission}.{ResourceType}`)
//! - `bypass_roles`: roles that pass every check regardless of resource type
//! - `client_id`: this service's client id, selecting `resource_access.{client_id}.roles`
//! - `lookup_timeout_ms`: upper bound on a resource type lookup; expiry denies

use serde::Deserialize;

pub const DEFAULT_ORG_PREFIX: &str = "Area-3.Team-11";
pub const DEFAULT_CLIENT_ID: &str = "master-data";
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;

fn default_bypass_roles() -> Vec<String> {
	vec!["sau-admin".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RbacConfig {
	pub org_prefix: String,
	pub bypass_roles: Vec<String>,
	pub client_id: String,
	pub lookup_timeout_ms: u64,
}

impl Default for RbacConfig {
	fn default() -> Self {
		Self {
			org_prefix: DEFAULT_ORG_PREFIX.to_string(),
			bypass_roles: default_bypass_roles(),
			client_id: DEFAULT_CLIENT_ID.to_string(),
			lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RbacConfigLayer {
	#[serde(default)]
	pub org_prefix: Option<String>,
	#[serde(default)]
	pub bypass_roles: Option<Vec<String>>,
	#[serde(default)]
	pub client_id: Option<String>,
	#[serde(default)]
	pub lookup_timeout_ms: Option<u64>,
}

impl RbacConfigLayer {
	pub fn merge(&mut self, other: RbacConfigLayer) {
		if other.org_prefix.is_some() {
			self.org_prefix = other.org_prefix;
		}
		if other.bypass_roles.is_some() {
			self.bypass_roles = other.bypass_roles;
		}
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.lookup_timeout_ms.is_some() {
			self.lookup_timeout_ms = other.lookup_timeout_ms;
		}
	}

	pub fn finalize(self) -> RbacConfig {
		RbacConfig {
			org_prefix: self
				.org_prefix
				.unwrap_or_else(|| DEFAULT_ORG_PREFIX.to_string()),
			bypass_roles: self.bypass_roles.unwrap_or_else(default_bypass_roles),
			client_id: self
				.client_id
				.unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
			lookup_timeout_ms: self.lookup_timeout_ms.unwrap_or(DEFAULT_LOOKUP_TIMEOUT_MS),
		}
	}
}
