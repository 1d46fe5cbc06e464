// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request isolation tests.
//!
//! Each request resolves its own principal. Interleaved requests from callers
//! with different grants must never observe each other's roles.

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinSet;

use super::support::{body_json, role, TestApp, TestUser};

const ROUNDS: usize = 32;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_callers_keep_their_own_decisions() {
	let app = Arc::new(TestApp::new().await);
	let path = format!("/api/persons/{}", app.fixtures.lecturer.id);
	let reader = app.fixtures.student_reader.clone();
	let admin = app.fixtures.admin.clone();

	let mut requests = JoinSet::new();
	for i in 0..ROUNDS {
		let (user, expected) = if i % 2 == 0 {
			(reader.clone(), StatusCode::FORBIDDEN)
		} else {
			(admin.clone(), StatusCode::OK)
		};
		let app = Arc::clone(&app);
		let path = path.clone();
		requests.spawn(async move {
			let status = app.get(&path, Some(&user)).await.status();
			(user.username, status, expected)
		});
	}

	let mut seen = 0;
	while let Some(result) = requests.join_next().await {
		let (username, status, expected) = result.unwrap();
		assert_eq!(status, expected, "{username} got {status}");
		seen += 1;
	}
	assert_eq!(seen, ROUNDS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn me_reports_each_callers_own_roles_under_concurrency() {
	let app = Arc::new(TestApp::new().await);
	let callers: Vec<(TestUser, serde_json::Value)> = vec![
		(
			app.fixtures.student_reader.clone(),
			json!([role("Read", "Student")]),
		),
		(app.fixtures.admin.clone(), json!(["sau-admin"])),
		(app.fixtures.no_roles.clone(), json!([])),
	];

	let mut requests = JoinSet::new();
	for i in 0..ROUNDS {
		let (user, roles) = callers[i % callers.len()].clone();
		let app = Arc::clone(&app);
		requests.spawn(async move {
			let response = app.get("/api/me", Some(&user)).await;
			assert_eq!(response.status(), StatusCode::OK);
			(user.username, roles, body_json(response).await)
		});
	}

	while let Some(result) = requests.join_next().await {
		let (username, roles, body) = result.unwrap();
		assert_eq!(body["username"], username.as_str());
		assert_eq!(body["roles"], roles, "{username}");
	}
}
