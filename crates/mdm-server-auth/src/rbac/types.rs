// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for RBAC evaluation.
//!
//! - [`ResourceType`]: runtime subtype of a person resource
//! - [`Permission`]: the operation being performed
//! - [`Decision`] / [`Denial`]: the typed outcome of a check
//!
//! Required roles are synthesized as `{org_prefix}.{Permission}.{ResourceType}`,
//! e.g. `Area-3.Team-11.Write.Lecturer`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subtype of a person resource. Every existing resource has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
	Student,
	Employee,
	Lecturer,
}

impl ResourceType {
	pub const ALL: [ResourceType; 3] = [
		ResourceType::Student,
		ResourceType::Employee,
		ResourceType::Lecturer,
	];

	/// Segment used in synthesized role names.
	pub fn as_str(&self) -> &'static str {
		match self {
			ResourceType::Student => "Student",
			ResourceType::Employee => "Employee",
			ResourceType::Lecturer => "Lecturer",
		}
	}
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type: {0}")]
pub struct UnknownResourceType(pub String);

impl FromStr for ResourceType {
	type Err = UnknownResourceType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ResourceType::ALL
			.into_iter()
			.find(|t| t.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| UnknownResourceType(s.to_string()))
	}
}

/// Operations that are gated per resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
	Read,
	Write,
	Delete,
}

impl Permission {
	pub const ALL: [Permission; 3] = [Permission::Read, Permission::Write, Permission::Delete];

	pub fn as_str(&self) -> &'static str {
		match self {
			Permission::Read => "Read",
			Permission::Write => "Write",
			Permission::Delete => "Delete",
		}
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Builds `{org_prefix}.{permission}.{resource_type}`.
pub fn required_role(org_prefix: &str, permission: Permission, resource_type: ResourceType) -> String {
	scoped_role(org_prefix, permission, resource_type.as_str())
}

/// Builds `{org_prefix}.{permission}.{scope}` for scopes that are not a
/// [`ResourceType`], such as the collection-wide `User` scope.
pub fn scoped_role(org_prefix: &str, permission: Permission, scope: &str) -> String {
	format!("{org_prefix}.{permission}.{scope}")
}

/// Why a check denied access. Only ever reported server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
	/// The caller holds none of the expected roles.
	MissingRole,
	/// The resource id could not be parsed; no lookup was made.
	InvalidResourceId,
	/// The lookup reported that no such resource exists.
	ResourceNotFound,
	/// The lookup failed or timed out.
	LookupFailed,
}

impl DenyReason {
	pub fn as_str(&self) -> &'static str {
		match self {
			DenyReason::MissingRole => "missing_role",
			DenyReason::InvalidResourceId => "invalid_resource_id",
			DenyReason::ResourceNotFound => "resource_not_found",
			DenyReason::LookupFailed => "lookup_failed",
		}
	}
}

impl fmt::Display for DenyReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Details of a denied check: the roles that would have granted access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
	pub expected: Vec<String>,
	pub reason: DenyReason,
}

impl Denial {
	pub fn new(reason: DenyReason, expected: Vec<String>) -> Self {
		Self { expected, reason }
	}

	/// Expected roles joined for a single log field.
	pub fn expected_description(&self) -> String {
		self.expected.join(" | ")
	}
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
	/// Access granted by the named role.
	Allow { granted_by: String },
	Deny(Denial),
}

impl Decision {
	pub fn is_allowed(&self) -> bool {
		matches!(self, Decision::Allow { .. })
	}

	/// Converts into a `Result` so handlers can use `?`.
	pub fn into_result(self) -> Result<(), Denial> {
		match self {
			Decision::Allow { .. } => Ok(()),
			Decision::Deny(denial) => Err(denial),
		}
	}
}
