// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! RBAC decision engine.
//!
//! Two check patterns are supported:
//!
//! 1. **Static** ([`RbacEngine::check_static`]): the caller must hold one of a fixed
//!    set of roles declared by the endpoint. No resource lookup is made.
//! 2. **Resource-aware** ([`RbacEngine::check_resource`]): the resource's runtime
//!    [`ResourceType`] is looked up and the required role is synthesized as
//!    `{org_prefix}.{Permission}.{ResourceType}`.
//!
//! In both patterns a bypass role grants access before anything else is
//! evaluated. Every failure path denies.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;
use uuid::Uuid;

use super::lookup::{Classification, ResourceTypeLookup};
use super::types::{required_role, scoped_role, Decision, Denial, DenyReason, Permission, ResourceType};
use crate::context::AuthorizationContext;

/// Upper bound on a single type lookup before the check fails closed.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Organization-wide role naming and bypass configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RbacPolicy {
	org_prefix: String,
	bypass_roles: BTreeSet<String>,
}

impl RbacPolicy {
	pub fn new<I, S>(org_prefix: impl Into<String>, bypass_roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			org_prefix: org_prefix.into(),
			bypass_roles: bypass_roles.into_iter().map(Into::into).collect(),
		}
	}

	pub fn org_prefix(&self) -> &str {
		&self.org_prefix
	}

	pub fn bypass_roles(&self) -> &BTreeSet<String> {
		&self.bypass_roles
	}

	pub fn required_role(&self, permission: Permission, resource_type: ResourceType) -> String {
		required_role(&self.org_prefix, permission, resource_type)
	}

	/// Role for a non-typed scope, e.g. `scoped_role(Read, "User")`.
	pub fn scoped_role(&self, permission: Permission, scope: &str) -> String {
		scoped_role(&self.org_prefix, permission, scope)
	}

	/// Every role that could grant `permission` on some resource type.
	pub fn candidate_roles(&self, permission: Permission) -> Vec<String> {
		ResourceType::ALL
			.into_iter()
			.map(|resource_type| self.required_role(permission, resource_type))
			.collect()
	}

	/// The bypass role held by the caller, if any.
	pub fn bypass_granted<'p>(&'p self, ctx: &AuthorizationContext) -> Option<&'p str> {
		ctx.first_held(&self.bypass_roles)
	}
}

/// Evaluates authorization decisions against an [`RbacPolicy`].
///
/// Cheap to clone; the policy and lookup are shared.
#[derive(Clone)]
pub struct RbacEngine {
	policy: Arc<RbacPolicy>,
	lookup: Arc<dyn ResourceTypeLookup>,
	lookup_timeout: Duration,
}

impl fmt::Debug for RbacEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RbacEngine")
			.field("policy", &self.policy)
			.field("lookup_timeout", &self.lookup_timeout)
			.finish_non_exhaustive()
	}
}

impl RbacEngine {
	pub fn new(policy: RbacPolicy, lookup: Arc<dyn ResourceTypeLookup>) -> Self {
		Self {
			policy: Arc::new(policy),
			lookup,
			lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
		}
	}

	pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
		self.lookup_timeout = timeout;
		self
	}

	pub fn policy(&self) -> &RbacPolicy {
		&self.policy
	}

	/// Static check: allow if the caller holds any of `required` or a bypass role.
	///
	/// On denial, `expected` lists `required` in declaration order.
	#[instrument(
		level = "debug",
		skip(self, ctx, required),
		fields(username = %ctx.username(), required = ?required)
	)]
	pub fn check_static(&self, ctx: &AuthorizationContext, required: &[String]) -> Decision {
		if let Some(role) = self.policy.bypass_granted(ctx) {
			tracing::debug!(granted_by = role, "bypass role granted access");
			return Decision::Allow {
				granted_by: role.to_string(),
			};
		}

		match ctx.first_held(required) {
			Some(role) => {
				tracing::debug!(granted_by = role, "static role check passed");
				Decision::Allow {
					granted_by: role.to_string(),
				}
			}
			None => Decision::Deny(Denial::new(DenyReason::MissingRole, required.to_vec())),
		}
	}

	/// Resource-aware check for `permission` on the resource identified by `raw_id`.
	///
	/// The lookup is skipped for bypass holders and for ids that do not parse.
	#[instrument(
		level = "debug",
		skip(self, ctx, permission),
		fields(username = %ctx.username(), permission = %permission, resource_type = tracing::field::Empty)
	)]
	pub async fn check_resource(
		&self,
		ctx: &AuthorizationContext,
		raw_id: &str,
		permission: Permission,
	) -> Decision {
		if let Some(role) = self.policy.bypass_granted(ctx) {
			tracing::debug!(granted_by = role, "bypass role granted access");
			return Decision::Allow {
				granted_by: role.to_string(),
			};
		}

		let Ok(id) = Uuid::parse_str(raw_id) else {
			tracing::debug!("resource id is not a valid UUID");
			return self.deny_untyped(DenyReason::InvalidResourceId, permission);
		};

		let resource_type = match tokio::time::timeout(self.lookup_timeout, self.lookup.classify(id)).await {
			Ok(Ok(Classification::Found(resource_type))) => resource_type,
			Ok(Ok(Classification::NotFound)) => {
				tracing::debug!(%id, "resource not found");
				return self.deny_untyped(DenyReason::ResourceNotFound, permission);
			}
			Ok(Err(e)) => {
				tracing::error!(%id, error = %e, "resource type lookup failed");
				return self.deny_untyped(DenyReason::LookupFailed, permission);
			}
			Err(_) => {
				tracing::error!(%id, timeout_ms = self.lookup_timeout.as_millis() as u64, "resource type lookup timed out");
				return self.deny_untyped(DenyReason::LookupFailed, permission);
			}
		};
		tracing::Span::current().record("resource_type", resource_type.as_str());

		let role = self.policy.required_role(permission, resource_type);
		if ctx.has_role(&role) {
			tracing::debug!(granted_by = %role, "resource role check passed");
			Decision::Allow { granted_by: role }
		} else {
			Decision::Deny(Denial::new(DenyReason::MissingRole, vec![role]))
		}
	}

	/// Denial for paths where the resource type is unknown.
	fn deny_untyped(&self, reason: DenyReason, permission: Permission) -> Decision {
		Decision::Deny(Denial::new(reason, self.policy.candidate_roles(permission)))
	}
}
