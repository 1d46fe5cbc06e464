// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the MDM server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`MDM_SERVER_*`)
//!
//! The RBAC constants (organization prefix, bypass roles, client id) are part of
//! the resolved [`ServerConfig`] and are immutable once loaded.
//!
//! # Usage
//!
//! ```ignore
//! use mdm_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub rbac: RbacConfig,
	pub oidc: OidcConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`MDM_SERVER_*`)
/// 2. Config file (`/etc/mdm/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let rbac = layer.rbac.unwrap_or_default().finalize();
	let oidc = layer.oidc.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&auth, &rbac)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		org_prefix = %rbac.org_prefix,
		bypass_role_count = rbac.bypass_roles.len(),
		client_id = %rbac.client_id,
		jwks_configured = oidc.jwks_url.is_some(),
		dev_mode = auth.dev_mode,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		rbac,
		oidc,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(auth: &AuthConfig, rbac: &RbacConfig) -> Result<(), ConfigError> {
	if auth.dev_mode && auth.environment == "production" {
		return Err(ConfigError::Validation(
			"MDM_SERVER_AUTH_DEV_MODE=1 is set while MDM_SERVER_AUTH_ENVIRONMENT=production. \
			 Remove MDM_SERVER_AUTH_DEV_MODE or set MDM_SERVER_AUTH_ENVIRONMENT to a non-production value."
				.to_string(),
		));
	}

	if rbac.org_prefix.trim().is_empty() {
		return Err(ConfigError::Validation(
			"rbac.org_prefix must not be empty".to_string(),
		));
	}

	if rbac.bypass_roles.iter().any(|r| r.trim().is_empty()) {
		return Err(ConfigError::Validation(
			"rbac.bypass_roles must not contain empty role names".to_string(),
		));
	}

	if rbac.lookup_timeout_ms == 0 {
		return Err(ConfigError::Validation(
			"rbac.lookup_timeout_ms must be greater than zero".to_string(),
		));
	}

	Ok(())
}
