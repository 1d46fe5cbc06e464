// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The identity resolved for one request.

use serde::Serialize;
use std::collections::BTreeSet;

/// Identity and granted roles of the caller, rebuilt from verified claims on every
/// request and never persisted.
///
/// Roles are held in a [`BTreeSet`] so that duplicates collapse and logging output
/// is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Principal {
	pub subject: Option<String>,
	pub username: String,
	pub email: Option<String>,
	pub given_name: Option<String>,
	pub family_name: Option<String>,
	pub roles: BTreeSet<String>,
}

impl Principal {
	/// A principal that carries only a username and no roles.
	///
	/// Used when a request is authenticated without a token payload.
	pub fn named(username: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			..Default::default()
		}
	}

	/// Builder: add roles.
	pub fn with_roles<I, S>(mut self, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.roles.extend(roles.into_iter().map(Into::into));
		self
	}
}
