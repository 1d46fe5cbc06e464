// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for person routes.
//!
//! Tests verify:
//! - Single-person access requires the role matching the person's kind and the
//!   requested permission
//! - Collection routes require the `User` scoped roles
//! - The bypass role passes every check; only its holders can observe 404
//! - Malformed and unknown ids are indistinguishable from a missing role (403)

use axum::http::{Method, StatusCode};
use mdm_server_auth::ResourceType;
use serde_json::json;
use uuid::Uuid;

use super::support::{
	body_json, person_body, role, run_authz_cases, update_body, AuthzCase, TestApp, TestUser,
};

// ============================================================================
// GET /api/persons/{id}
// ============================================================================

#[tokio::test]
async fn reader_can_read_person_of_matching_kind() {
	let app = TestApp::new().await;
	let path = format!("/api/persons/{}", app.fixtures.student.id);

	let response = app.get(&path, Some(&app.fixtures.student_reader)).await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	assert_eq!(body["id"], app.fixtures.student.id.to_string());
	assert_eq!(body["kind"], "Student");
}

#[tokio::test]
async fn reader_cannot_read_person_of_other_kind() {
	let app = TestApp::new().await;
	let path = format!("/api/persons/{}", app.fixtures.lecturer.id);

	let response = app.get(&path, Some(&app.fixtures.student_reader)).await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let body = body_json(response).await;
	assert_eq!(body["status"], 403);
	assert_eq!(body["error"], "forbidden");
	assert_eq!(body["message"], "Access denied");
	assert!(!body.to_string().contains("Lecturer"));
}

#[tokio::test]
async fn group_granted_reader_is_allowed_and_denied_by_kind() {
	let app = TestApp::new().await;
	let reader = TestUser::from_claims(
		"group-reader",
		json!({
			"preferred_username": "group-reader",
			"groups": ["Area-3.Team-11.Read.Student"],
			"exp": 4_102_444_800_i64,
		}),
	);

	let response = app
		.get(&format!("/api/persons/{}", app.fixtures.student.id), Some(&reader))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.get(&format!("/api/persons/{}", app.fixtures.lecturer.id), Some(&reader))
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	assert_eq!(body_json(response).await["status"], 403);
}

#[tokio::test]
async fn each_kind_requires_its_own_read_role() {
	let app = TestApp::new().await;

	for kind in ResourceType::ALL {
		let person = app.fixtures.person(kind);
		let path = format!("/api/persons/{}", person.id);

		for other in ResourceType::ALL {
			let reader = TestUser::with_roles("other-reader", &[role("Read", other.as_str())]);
			let expected = if other == kind {
				StatusCode::OK
			} else {
				StatusCode::FORBIDDEN
			};
			let response = app.get(&path, Some(&reader)).await;
			assert_eq!(response.status(), expected, "{other} reader on {kind}");
		}
	}
}

#[tokio::test]
async fn write_role_does_not_grant_read() {
	let app = TestApp::new().await;
	let writer_only = TestUser::with_roles("writer-only", &[role("Write", "Student")]);
	let cases = [AuthzCase {
		name: "write_role_does_not_grant_read",
		method: Method::GET,
		path: format!("/api/persons/{}", app.fixtures.student.id),
		user: Some(writer_only),
		body: None,
		expected_status: StatusCode::FORBIDDEN,
	}];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn malformed_id_is_forbidden_without_bypass() {
	let app = TestApp::new().await;
	let cases = [
		AuthzCase {
			name: "malformed_id_read",
			method: Method::GET,
			path: "/api/persons/not-a-uuid".to_string(),
			user: Some(app.fixtures.student_reader.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "malformed_id_delete",
			method: Method::DELETE,
			path: "/api/persons/123".to_string(),
			user: Some(app.fixtures.lecturer_admin.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn unknown_id_is_forbidden_without_bypass() {
	let app = TestApp::new().await;
	let cases = [AuthzCase {
		name: "unknown_id_read",
		method: Method::GET,
		path: format!("/api/persons/{}", Uuid::new_v4()),
		user: Some(app.fixtures.student_reader.clone()),
		body: None,
		expected_status: StatusCode::FORBIDDEN,
	}];
	run_authz_cases(&app, &cases).await;
}

// ============================================================================
// PUT / DELETE /api/persons/{id}
// ============================================================================

#[tokio::test]
async fn writer_can_update_matching_kind_only() {
	let app = TestApp::new().await;
	let cases = [
		AuthzCase {
			name: "student_writer_updates_student",
			method: Method::PUT,
			path: format!("/api/persons/{}", app.fixtures.student.id),
			user: Some(app.fixtures.student_writer.clone()),
			body: Some(update_body("Samuel")),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "student_writer_cannot_update_employee",
			method: Method::PUT,
			path: format!("/api/persons/{}", app.fixtures.employee.id),
			user: Some(app.fixtures.student_writer.clone()),
			body: Some(update_body("Evelyn")),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "student_reader_cannot_update_student",
			method: Method::PUT,
			path: format!("/api/persons/{}", app.fixtures.student.id),
			user: Some(app.fixtures.student_reader.clone()),
			body: Some(update_body("Samantha")),
			expected_status: StatusCode::FORBIDDEN,
		},
	];
	run_authz_cases(&app, &cases).await;

	let stored = app
		.state
		.persons
		.get_person(app.fixtures.student.id)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(stored.given_name, "Samuel");
	assert_eq!(stored.family_name, "Updated");
}

const MALFORMED_UPDATES: [(&str, Option<&str>, &str); 3] = [
	("missing_field", Some("application/json"), r#"{"given_name":"x"}"#),
	("not_json", Some("application/json"), "not json"),
	("no_content_type", None, r#"{"given_name":"x","family_name":"y"}"#),
];

#[tokio::test]
async fn malformed_update_body_is_forbidden_without_role() {
	let app = TestApp::new().await;
	let path = format!("/api/persons/{}", app.fixtures.lecturer.id);

	for (name, content_type, body) in MALFORMED_UPDATES {
		let response = app
			.send_raw(Method::PUT, &path, Some(&app.fixtures.no_roles), content_type, body)
			.await;
		assert_eq!(response.status(), StatusCode::FORBIDDEN, "{name}");

		let body = body_json(response).await;
		assert_eq!(body["error"], "forbidden", "{name}");
		assert_eq!(body["status"], 403, "{name}");
	}
}

#[tokio::test]
async fn malformed_update_body_is_bad_request_once_allowed() {
	let app = TestApp::new().await;
	let path = format!("/api/persons/{}", app.fixtures.lecturer.id);

	for (name, content_type, body) in MALFORMED_UPDATES {
		let response = app
			.send_raw(Method::PUT, &path, Some(&app.fixtures.lecturer_admin), content_type, body)
			.await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{name}");

		let body = body_json(response).await;
		assert_eq!(body["error"], "bad_request", "{name}");
		assert_eq!(body["status"], 400, "{name}");
	}
}

#[tokio::test]
async fn delete_requires_delete_role() {
	let app = TestApp::new().await;
	let cases = [
		AuthzCase {
			name: "write_role_cannot_delete",
			method: Method::DELETE,
			path: format!("/api/persons/{}", app.fixtures.student.id),
			user: Some(app.fixtures.student_writer.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "lecturer_admin_cannot_delete_student",
			method: Method::DELETE,
			path: format!("/api/persons/{}", app.fixtures.student.id),
			user: Some(app.fixtures.lecturer_admin.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "lecturer_admin_deletes_lecturer",
			method: Method::DELETE,
			path: format!("/api/persons/{}", app.fixtures.lecturer.id),
			user: Some(app.fixtures.lecturer_admin.clone()),
			body: None,
			expected_status: StatusCode::NO_CONTENT,
		},
	];
	run_authz_cases(&app, &cases).await;

	assert!(app
		.state
		.persons
		.get_person(app.fixtures.lecturer.id)
		.await
		.unwrap()
		.is_none());
	assert!(app
		.state
		.persons
		.get_person(app.fixtures.student.id)
		.await
		.unwrap()
		.is_some());
}

#[tokio::test]
async fn deleted_person_is_forbidden_for_former_kind_holder() {
	let app = TestApp::new().await;
	let path = format!("/api/persons/{}", app.fixtures.lecturer.id);

	let response = app.delete(&path, Some(&app.fixtures.lecturer_admin)).await;
	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	let response = app.get(&path, Some(&app.fixtures.lecturer_admin)).await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Bypass role
// ============================================================================

#[tokio::test]
async fn bypass_role_is_allowed_everywhere() {
	let app = TestApp::new().await;
	let admin = app.fixtures.admin.clone();
	let cases = [
		AuthzCase {
			name: "admin_lists_persons",
			method: Method::GET,
			path: "/api/persons".to_string(),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_creates_person",
			method: Method::POST,
			path: "/api/persons".to_string(),
			user: Some(admin.clone()),
			body: Some(person_body("Employee", "Ada")),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "admin_reads_student",
			method: Method::GET,
			path: format!("/api/persons/{}", app.fixtures.student.id),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_reads_employee",
			method: Method::GET,
			path: format!("/api/persons/{}", app.fixtures.employee.id),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_updates_lecturer",
			method: Method::PUT,
			path: format!("/api/persons/{}", app.fixtures.lecturer.id),
			user: Some(admin.clone()),
			body: Some(update_body("Louis")),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_deletes_employee",
			method: Method::DELETE,
			path: format!("/api/persons/{}", app.fixtures.employee.id),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::NO_CONTENT,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn bypass_role_observes_missing_and_malformed_ids() {
	let app = TestApp::new().await;
	let admin = app.fixtures.admin.clone();
	let missing = Uuid::new_v4();
	let cases = [
		AuthzCase {
			name: "admin_reads_missing",
			method: Method::GET,
			path: format!("/api/persons/{missing}"),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "admin_updates_missing",
			method: Method::PUT,
			path: format!("/api/persons/{missing}"),
			user: Some(admin.clone()),
			body: Some(update_body("Ghost")),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "admin_deletes_missing",
			method: Method::DELETE,
			path: format!("/api/persons/{missing}"),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "admin_reads_malformed",
			method: Method::GET,
			path: "/api/persons/not-a-uuid".to_string(),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
	];
	run_authz_cases(&app, &cases).await;
}

// ============================================================================
// Collection routes
// ============================================================================

#[tokio::test]
async fn empty_role_set_cannot_list_persons() {
	let app = TestApp::new().await;
	let response = app.get("/api/persons", Some(&app.fixtures.no_roles)).await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let body = body_json(response).await;
	assert_eq!(body["status"], 403);
}

#[tokio::test]
async fn token_without_role_claims_cannot_list_persons() {
	let app = TestApp::new().await;
	let bare = TestUser::from_claims(
		"bare",
		json!({ "sub": "bare-subject", "exp": 4_102_444_800_i64 }),
	);
	let cases = [AuthzCase {
		name: "token_without_role_claims_list",
		method: Method::GET,
		path: "/api/persons".to_string(),
		user: Some(bare),
		body: None,
		expected_status: StatusCode::FORBIDDEN,
	}];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn collection_routes_use_user_scope() {
	let app = TestApp::new().await;
	let cases = [
		AuthzCase {
			name: "user_reader_lists",
			method: Method::GET,
			path: "/api/persons".to_string(),
			user: Some(app.fixtures.user_reader.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "user_reader_cannot_create",
			method: Method::POST,
			path: "/api/persons".to_string(),
			user: Some(app.fixtures.user_reader.clone()),
			body: Some(person_body("Student", "Bea")),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "user_writer_creates",
			method: Method::POST,
			path: "/api/persons".to_string(),
			user: Some(app.fixtures.user_writer.clone()),
			body: Some(person_body("Student", "Bea")),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "user_writer_cannot_list",
			method: Method::GET,
			path: "/api/persons".to_string(),
			user: Some(app.fixtures.user_writer.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "kind_reader_cannot_list",
			method: Method::GET,
			path: "/api/persons".to_string(),
			user: Some(app.fixtures.student_reader.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn user_scope_does_not_grant_single_person_access() {
	let app = TestApp::new().await;
	let cases = [AuthzCase {
		name: "user_reader_cannot_read_student",
		method: Method::GET,
		path: format!("/api/persons/{}", app.fixtures.student.id),
		user: Some(app.fixtures.user_reader.clone()),
		body: None,
		expected_status: StatusCode::FORBIDDEN,
	}];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn list_reports_total_and_pagination() {
	let app = TestApp::new().await;
	let response = app
		.get("/api/persons?limit=2&offset=0", Some(&app.fixtures.user_reader))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	assert_eq!(body["total"], 3);
	assert_eq!(body["limit"], 2);
	assert_eq!(body["offset"], 0);
	assert_eq!(body["persons"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_validates_input() {
	let app = TestApp::new().await;
	let writer = app.fixtures.user_writer.clone();

	let response = app
		.post("/api/persons", Some(&writer), person_body("Lecturer", "   "))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let mut bad_email = person_body("Lecturer", "Lin");
	bad_email["email"] = "not-an-address".into();
	let response = app.post("/api/persons", Some(&writer), bad_email).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let response = app
		.post("/api/persons", Some(&writer), person_body("Lecturer", "Lin"))
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let body = body_json(response).await;
	assert_eq!(body["kind"], "Lecturer");
	assert_eq!(body["given_name"], "Lin");
}
