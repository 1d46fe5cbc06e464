// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! MDM server binary.

use clap::{Parser, Subcommand};
use mdm_server::{create_app_state, create_router};
use mdm_server_auth::{JwksVerifier, TokenVerifier};
use mdm_server_config::LogFormat;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// MDM server - person master data with role-based access control.
#[derive(Parser, Debug)]
#[command(name = "mdm-server", about = "MDM person master data server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/mdm/server.toml)
	#[arg(long, env = "MDM_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => mdm_server_config::load_config_with_file(path)?,
		None => mdm_server_config::load_config()?,
	};

	let json_logs = config.logging.format == LogFormat::Json;
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
		.with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		org_prefix = %config.rbac.org_prefix,
		dev_mode = config.auth.dev_mode,
		"starting mdm-server"
	);

	let pool = mdm_server_db::create_pool(&config.database.url).await?;
	mdm_server_db::run_migrations(&pool).await?;

	let verifier: Option<Arc<dyn TokenVerifier>> = match &config.oidc.jwks_url {
		Some(url) => {
			let client = reqwest::Client::new();
			let verifier = JwksVerifier::fetch(
				&client,
				url,
				config.oidc.issuer.clone(),
				config.oidc.audience.clone(),
			)
			.await?;
			Some(Arc::new(verifier))
		}
		None => {
			tracing::warn!("no JWKS URL configured; bearer tokens will be rejected");
			None
		}
	};

	let state = create_app_state(pool, &config, verifier);
	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
