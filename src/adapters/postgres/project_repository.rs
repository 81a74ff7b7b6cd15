//! PostgreSQL implementation of ProjectRepository.
//!
//! One row per project. Variations live in a JSONB array on the row, so an
//! aggregate write is a single `UPDATE` guarded by the version column.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, Money, OwnedByUser, ProjectId, Timestamp, UserId,
};
use crate::domain::project::{ClientContact, Project, SignatureToken, Variation};
use crate::ports::ProjectRepository;

const SELECT_COLUMNS: &str = r#"
    SELECT id, owner_id, name, client_name, client_email,
           contract_price_cents, variations, last_variation_number,
           version, created_at, updated_at
    FROM projects
"#;

/// PostgreSQL implementation of ProjectRepository.
#[derive(Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new PostgresProjectRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn insert(&self, project: &Project) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO projects (
                id, owner_id, name, client_name, client_email,
                contract_price_cents, current_contract_price_cents, variations,
                last_variation_number, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(project.id().as_uuid())
        .bind(project.owner_id().as_str())
        .bind(project.name())
        .bind(&project.client().name)
        .bind(&project.client().email)
        .bind(project.contract_price().cents())
        .bind(project.current_contract_price().cents())
        .bind(Json(project.variations()))
        .bind(project.last_variation_number() as i32)
        .bind(version_to_db(project.version())?)
        .bind(project.created_at().as_datetime())
        .bind(project.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert project", e))?;

        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<u64, DomainError> {
        let expected = version_to_db(project.version())?;
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                name = $3,
                client_name = $4,
                client_email = $5,
                current_contract_price_cents = $6,
                variations = $7,
                last_variation_number = $8,
                version = version + 1,
                updated_at = $9
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(project.id().as_uuid())
        .bind(expected)
        .bind(project.name())
        .bind(&project.client().name)
        .bind(&project.client().email)
        .bind(project.current_contract_price().cents())
        .bind(Json(project.variations()))
        .bind(project.last_variation_number() as i32)
        .bind(project.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update project", e))?;

        if result.rows_affected() == 1 {
            return Ok(project.version() + 1);
        }

        // Zero rows: either the row is gone or another writer won.
        let exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE id = $1")
            .bind(project.id().as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check project existence", e))?;

        if exists.0 == 0 {
            Err(DomainError::new(
                ErrorCode::ProjectNotFound,
                format!("Project not found: {}", project.id()),
            ))
        } else {
            Err(DomainError::conflict(format!(
                "project {} changed since version {}",
                project.id(),
                project.version()
            )))
        }
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch project", e))?;

        row.map(row_to_project).transpose()
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Project>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE owner_id = $1 ORDER BY updated_at DESC",
            SELECT_COLUMNS
        ))
        .bind(owner_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch projects by owner", e))?;

        rows.into_iter().map(row_to_project).collect()
    }

    async fn find_by_signature_token(
        &self,
        token: &SignatureToken,
    ) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query(&format!(
            "{} WHERE variations @> jsonb_build_array(jsonb_build_object('signature_token', $1::text)) LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(token.expose())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch project by signature token", e))?;

        // The containment match is an equality test in SQL; the aggregate
        // re-checks in constant time.
        match row.map(row_to_project).transpose()? {
            Some(project) if project.find_by_signature_token(token).is_some() => Ok(Some(project)),
            _ => Ok(None),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, e),
    )
}

fn column_error(column: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to get {}: {}", column, e),
    )
}

fn version_to_db(version: u64) -> Result<i64, DomainError> {
    i64::try_from(version).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Version {} exceeds storage range", version),
        )
    })
}

fn row_to_project(row: sqlx::postgres::PgRow) -> Result<Project, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| column_error("id", e))?;
    let owner_id: String = row.try_get("owner_id").map_err(|e| column_error("owner_id", e))?;
    let name: String = row.try_get("name").map_err(|e| column_error("name", e))?;
    let client_name: String = row
        .try_get("client_name")
        .map_err(|e| column_error("client_name", e))?;
    let client_email: String = row
        .try_get("client_email")
        .map_err(|e| column_error("client_email", e))?;
    let contract_price: i64 = row
        .try_get("contract_price_cents")
        .map_err(|e| column_error("contract_price_cents", e))?;
    let Json(variations): Json<Vec<Variation>> = row
        .try_get("variations")
        .map_err(|e| column_error("variations", e))?;
    let last_variation_number: i32 = row
        .try_get("last_variation_number")
        .map_err(|e| column_error("last_variation_number", e))?;
    let version: i64 = row.try_get("version").map_err(|e| column_error("version", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| column_error("created_at", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| column_error("updated_at", e))?;

    Ok(Project::reconstitute(
        ProjectId::from_uuid(id),
        UserId::new(owner_id).map_err(|e| column_error("owner_id", e))?,
        name,
        ClientContact {
            name: client_name,
            email: client_email,
        },
        Money::try_from_cents(contract_price).map_err(|e| column_error("contract_price_cents", e))?,
        variations,
        u32::try_from(last_variation_number).unwrap_or(0),
        u64::try_from(version).map_err(|e| column_error("version", e))?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
