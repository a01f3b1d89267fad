use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};

use digitalsky_core::error::AppError;
use digitalsky_core::models::{ApplicationStatus, ImportDroneApplication};
use digitalsky_core::traits::ApplicationStore;

/// Repository for import application persistence in PostgreSQL.
///
/// The full document lives in a JSONB column; the id, owner, and status are
/// duplicated into plain columns for filtering.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: Pool<Postgres>,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new application. Fails if the id or owner is missing.
    pub async fn insert(
        &self,
        application: &ImportDroneApplication,
    ) -> Result<ImportDroneApplication, AppError> {
        let (id, applicant_id) = keys(application)?;
        let data = serde_json::to_value(application)?;

        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO import_drone_applications (id, applicant_id, status, data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, applicant_id, status, data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(applicant_id)
        .bind(application.status.map(|s| s.as_str()))
        .bind(&data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        row.try_into()
    }

    /// Replace an existing application, returning `ApplicationNotFound` if absent.
    pub async fn update(
        &self,
        application: &ImportDroneApplication,
    ) -> Result<ImportDroneApplication, AppError> {
        let (id, _) = keys(application)?;
        let data = serde_json::to_value(application)?;

        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE import_drone_applications
            SET status = $2, data = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, applicant_id, status, data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(application.status.map(|s| s.as_str()))
        .bind(&data)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::ApplicationNotFound(id.to_string())),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ImportDroneApplication>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, applicant_id, status, data, created_at, updated_at
            FROM import_drone_applications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    /// Applications owned by an applicant, newest first.
    pub async fn find_by_applicant(
        &self,
        applicant_id: i64,
    ) -> Result<Vec<ImportDroneApplication>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, applicant_id, status, data, created_at, updated_at
            FROM import_drone_applications
            WHERE applicant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Every application, newest first.
    pub async fn find_all(&self) -> Result<Vec<ImportDroneApplication>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, applicant_id, status, data, created_at, updated_at
            FROM import_drone_applications
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

fn keys(application: &ImportDroneApplication) -> Result<(&str, i64), AppError> {
    let id = application
        .id
        .as_deref()
        .ok_or_else(|| AppError::DatabaseError("application id is not assigned".into()))?;
    let applicant_id = application
        .applicant_id
        .ok_or_else(|| AppError::DatabaseError(format!("application {id} has no applicant")))?;
    Ok((id, applicant_id))
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    applicant_id: i64,
    status: Option<String>,
    data: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for ImportDroneApplication {
    type Error = AppError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .as_deref()
            .map(str::parse::<ApplicationStatus>)
            .transpose()
            .map_err(|e| AppError::DatabaseError(format!("application {}: {e}", row.id)))?;

        let mut application: ImportDroneApplication = serde_json::from_value(row.data)?;
        // Columns are authoritative over the document copy.
        application.id = Some(row.id);
        application.applicant_id = Some(row.applicant_id);
        application.status = status;
        application.created_date.get_or_insert(row.created_at);
        application.last_modified_date = Some(row.updated_at);
        Ok(application)
    }
}

// -- Trait implementation --

impl ApplicationStore for ApplicationRepository {
    async fn insert(
        &self,
        application: &ImportDroneApplication,
    ) -> Result<ImportDroneApplication, AppError> {
        ApplicationRepository::insert(self, application).await
    }

    async fn update(
        &self,
        application: &ImportDroneApplication,
    ) -> Result<ImportDroneApplication, AppError> {
        ApplicationRepository::update(self, application).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ImportDroneApplication>, AppError> {
        ApplicationRepository::find_by_id(self, id).await
    }

    async fn find_by_applicant(
        &self,
        applicant_id: i64,
    ) -> Result<Vec<ImportDroneApplication>, AppError> {
        ApplicationRepository::find_by_applicant(self, applicant_id).await
    }

    async fn find_all(&self) -> Result<Vec<ImportDroneApplication>, AppError> {
        ApplicationRepository::find_all(self).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        ApplicationRepository::health_check(self).await
    }
}
