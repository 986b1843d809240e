//! Submission repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::submissions;
use formrelay_core::submission::{
    NewSubmission, Submission, SubmissionData, SubmissionError,
    SubmissionRepository as SubmissionRepoTrait,
};

/// Submission repository implementation.
#[derive(Debug, Clone)]
pub struct SubmissionRepository {
    db: DatabaseConnection,
}

impl SubmissionRepository {
    /// Create a new submission repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl SubmissionRepoTrait for SubmissionRepository {
    async fn create(&self, input: NewSubmission) -> Result<Submission, SubmissionError> {
        let active_model = submissions::ActiveModel {
            id: Set(Uuid::new_v4()),
            form_id: Set(input.form_id),
            data: Set(Value::Object(input.data)),
            files: Set(input.files.map(Value::Object)),
            ip_address: Set(input.ip_address),
            user_agent: Set(input.user_agent),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| SubmissionError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, SubmissionError> {
        let model = submissions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SubmissionError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_by_form(&self, form_id: Uuid) -> Result<Vec<Submission>, SubmissionError> {
        let models = submissions::Entity::find()
            .filter(submissions::Column::FormId.eq(form_id))
            .order_by_desc(submissions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| SubmissionError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SubmissionError> {
        let result = submissions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SubmissionError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Stored JSON back to a field map. Non-object values never come from the
/// ingest path and read back as empty.
fn as_map(value: Value) -> SubmissionData {
    match value {
        Value::Object(map) => map,
        _ => SubmissionData::new(),
    }
}

/// Convert database model to domain model.
fn to_domain(model: submissions::Model) -> Submission {
    Submission {
        id: model.id,
        form_id: model.form_id,
        data: as_map(model.data),
        files: model.files.map(as_map),
        ip_address: model.ip_address,
        user_agent: model.user_agent,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
