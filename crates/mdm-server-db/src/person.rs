// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Person repository.
//!
//! Persons are the typed resources guarded by the RBAC engine. The `kind` column
//! holds the [`ResourceType`] and is fixed at creation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mdm_server_auth::{Classification, LookupError, ResourceType, ResourceTypeLookup};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
	pub id: Uuid,
	pub kind: ResourceType,
	pub given_name: String,
	pub family_name: String,
	pub email: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
	pub kind: ResourceType,
	pub given_name: String,
	pub family_name: String,
	#[serde(default)]
	pub email: Option<String>,
}

/// Mutable fields of a person. The kind cannot be changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonUpdate {
	pub given_name: String,
	pub family_name: String,
	#[serde(default)]
	pub email: Option<String>,
}

#[async_trait]
pub trait PersonStore: Send + Sync {
	async fn list_persons(&self, limit: i64, offset: i64) -> Result<Vec<Person>, DbError>;
	async fn count_persons(&self) -> Result<i64, DbError>;
	async fn create_person(&self, new: &NewPerson) -> Result<Person, DbError>;
	async fn get_person(&self, id: Uuid) -> Result<Option<Person>, DbError>;
	async fn update_person(&self, id: Uuid, update: &PersonUpdate) -> Result<Option<Person>, DbError>;
	async fn delete_person(&self, id: Uuid) -> Result<bool, DbError>;
}

#[async_trait]
impl PersonStore for PersonRepository {
	async fn list_persons(&self, limit: i64, offset: i64) -> Result<Vec<Person>, DbError> {
		self.list_persons(limit, offset).await
	}

	async fn count_persons(&self) -> Result<i64, DbError> {
		self.count_persons().await
	}

	async fn create_person(&self, new: &NewPerson) -> Result<Person, DbError> {
		self.create_person(new).await
	}

	async fn get_person(&self, id: Uuid) -> Result<Option<Person>, DbError> {
		self.get_person(id).await
	}

	async fn update_person(&self, id: Uuid, update: &PersonUpdate) -> Result<Option<Person>, DbError> {
		self.update_person(id, update).await
	}

	async fn delete_person(&self, id: Uuid) -> Result<bool, DbError> {
		self.delete_person(id).await
	}
}

#[async_trait]
impl ResourceTypeLookup for PersonRepository {
	async fn classify(&self, id: Uuid) -> Result<Classification, LookupError> {
		let kind = self
			.get_person_kind(id)
			.await
			.map_err(|e| LookupError::Backend(e.to_string()))?;

		match kind {
			None => Ok(Classification::NotFound),
			Some(kind) => kind
				.parse::<ResourceType>()
				.map(Classification::Found)
				.map_err(|_| LookupError::UnknownType(kind)),
		}
	}
}

/// Repository for person database operations.
#[derive(Clone)]
pub struct PersonRepository {
	pool: SqlitePool,
}

impl PersonRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// List persons ordered by family name, then given name.
	#[tracing::instrument(skip(self))]
	pub async fn list_persons(&self, limit: i64, offset: i64) -> Result<Vec<Person>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, kind, given_name, family_name, email, created_at, updated_at
			FROM persons
			ORDER BY family_name, given_name, id
			LIMIT ? OFFSET ?
			"#,
		)
		.bind(limit)
		.bind(offset)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_person_row).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_persons(&self) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) AS total FROM persons")
			.fetch_one(&self.pool)
			.await?;
		Ok(row.get("total"))
	}

	#[tracing::instrument(skip(self, new), fields(kind = %new.kind))]
	pub async fn create_person(&self, new: &NewPerson) -> Result<Person, DbError> {
		let now = Utc::now();
		let person = Person {
			id: Uuid::new_v4(),
			kind: new.kind,
			given_name: new.given_name.clone(),
			family_name: new.family_name.clone(),
			email: new.email.clone(),
			created_at: now,
			updated_at: now,
		};

		sqlx::query(
			r#"
			INSERT INTO persons (id, kind, given_name, family_name, email, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(person.id.to_string())
		.bind(person.kind.as_str())
		.bind(&person.given_name)
		.bind(&person.family_name)
		.bind(&person.email)
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(person_id = %person.id, "person created");
		Ok(person)
	}

	#[tracing::instrument(skip(self), fields(person_id = %id))]
	pub async fn get_person(&self, id: Uuid) -> Result<Option<Person>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, kind, given_name, family_name, email, created_at, updated_at
			FROM persons
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_person_row).transpose()
	}

	/// Returns `None` if no person exists with this id.
	#[tracing::instrument(skip(self, update), fields(person_id = %id))]
	pub async fn update_person(&self, id: Uuid, update: &PersonUpdate) -> Result<Option<Person>, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE persons
			SET given_name = ?, family_name = ?, email = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&update.given_name)
		.bind(&update.family_name)
		.bind(&update.email)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_person(id).await
	}

	/// Returns `false` if no person exists with this id.
	#[tracing::instrument(skip(self), fields(person_id = %id))]
	pub async fn delete_person(&self, id: Uuid) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM persons WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(person_id = %id, "person deleted");
		}
		Ok(deleted)
	}

	/// Raw `kind` column for `id`.
	#[tracing::instrument(skip(self), fields(person_id = %id))]
	pub async fn get_person_kind(&self, id: Uuid) -> Result<Option<String>, DbError> {
		let row = sqlx::query("SELECT kind FROM persons WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		Ok(row.map(|row| row.get("kind")))
	}
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

fn parse_person_row(row: &sqlx::sqlite::SqliteRow) -> Result<Person, DbError> {
	let id_str: String = row.get("id");
	let kind_str: String = row.get("kind");
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	let id = Uuid::parse_str(&id_str)
		.map_err(|e| DbError::Internal(format!("Invalid person id UUID: {e}")))?;
	let kind = kind_str
		.parse::<ResourceType>()
		.map_err(|e| DbError::Internal(e.to_string()))?;

	Ok(Person {
		id,
		kind,
		given_name: row.get("given_name"),
		family_name: row.get("family_name"),
		email: row.get("email"),
		created_at: parse_timestamp(&created_at_str, "created_at")?,
		updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
	})
}
