//! User repository for database operations.

use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};

use crate::entities::users;

/// User repository for provisioning identities from the identity provider.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.to_string()).one(&self.db).await
    }

    /// Returns the user with `id`, creating it on first sight.
    ///
    /// An existing row is returned unchanged. Concurrent calls for the same
    /// id converge on a single row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert or lookup fails.
    pub async fn provision(&self, id: &str, email: &str, name: &str) -> Result<users::Model, DbErr> {
        if let Some(existing) = self.find_by_id(id).await? {
            return Ok(existing);
        }

        let user = users::ActiveModel {
            id: Set(id.to_string()),
            email: Set(email.to_string()),
            name: Set(name.trim().to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let inserted = users::Entity::insert(user)
            .on_conflict(OnConflict::column(users::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;

        if inserted > 0 {
            tracing::info!(user_id = %id, "User provisioned");
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("user {id}")))
    }
}
