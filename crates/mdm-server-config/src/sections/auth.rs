// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration.

use serde::Deserialize;

fn default_environment() -> String {
	"development".to_string()
}

fn default_dev_username() -> String {
	"dev".to_string()
}

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
	/// Requests without credentials resolve to a role-less fallback principal.
	pub dev_mode: bool,
	pub environment: String,
	/// Username given to the fallback principal in dev mode.
	pub dev_username: String,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			dev_mode: false,
			environment: default_environment(),
			dev_username: default_dev_username(),
		}
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub dev_mode: Option<bool>,
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub dev_username: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.dev_mode.is_some() {
			self.dev_mode = other.dev_mode;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.dev_username.is_some() {
			self.dev_username = other.dev_username;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			dev_mode: self.dev_mode.unwrap_or(false),
			environment: self.environment.unwrap_or_else(default_environment),
			dev_username: self.dev_username.unwrap_or_else(default_dev_username),
		}
	}
}
