//! Form repository for database operations.
//!
//! Implements the form registry's persistence using SeaORM.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{forms, submissions};
use formrelay_core::form::{
    Form, FormError, FormRepository as FormRepoTrait, FormSummary, NewForm,
};

/// Form repository implementation.
#[derive(Debug, Clone)]
pub struct FormRepository {
    db: DatabaseConnection,
}

impl FormRepository {
    /// Create a new form repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn submission_counts(&self, form_ids: Vec<Uuid>) -> Result<HashMap<Uuid, u64>, DbErr> {
        #[derive(FromQueryResult)]
        struct FormCount {
            form_id: Uuid,
            count: i64,
        }

        if form_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = submissions::Entity::find()
            .select_only()
            .column(submissions::Column::FormId)
            .column_as(Expr::col(submissions::Column::Id).count(), "count")
            .filter(submissions::Column::FormId.is_in(form_ids))
            .group_by(submissions::Column::FormId)
            .into_model::<FormCount>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.form_id, u64::try_from(row.count).unwrap_or(0)))
            .collect())
    }
}

impl FormRepoTrait for FormRepository {
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<FormSummary>, FormError> {
        let models = forms::Entity::find()
            .filter(forms::Column::UserId.eq(user_id))
            .order_by_desc(forms::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| FormError::repository(e.to_string()))?;

        let counts = self
            .submission_counts(models.iter().map(|m| m.id).collect())
            .await
            .map_err(|e| FormError::repository(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|model| FormSummary {
                submission_count: counts.get(&model.id).copied().unwrap_or(0),
                form: to_domain(model),
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Form>, FormError> {
        let model = forms::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FormError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Form>, FormError> {
        let model = forms::Entity::find()
            .filter(forms::Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(|e| FormError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn create(&self, input: NewForm) -> Result<Form, FormError> {
        let active_model = forms::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            key: Set(input.key),
            email: Set(input.email),
            description: Set(input.description),
            redirect_url: Set(input.redirect_url),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| FormError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, FormError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| FormError::repository(e.to_string()))?;

        let removed = submissions::Entity::delete_many()
            .filter(submissions::Column::FormId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| FormError::repository(e.to_string()))?;

        let result = forms::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| FormError::repository(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| FormError::repository(e.to_string()))?;

        tracing::debug!(
            form_id = %id,
            submissions = removed.rows_affected,
            "Form rows deleted"
        );
        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain model.
fn to_domain(model: forms::Model) -> Form {
    Form {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        key: model.key,
        email: model.email,
        description: model.description,
        redirect_url: model.redirect_url,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
