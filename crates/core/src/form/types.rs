//! Form domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered submission target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    /// Form ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Public capability key.
    pub key: String,
    /// Address notified of new submissions.
    pub email: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Where submitters are redirected after a successful submission.
    pub redirect_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Form {
    /// Whether `user_id` owns this form.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// A form annotated with its submission count.
#[derive(Debug, Clone, Serialize)]
pub struct FormSummary {
    /// The form.
    #[serde(flatten)]
    pub form: Form,
    /// Number of stored submissions.
    pub submission_count: u64,
}

/// Create-form request as received from the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFormInput {
    /// Display name (required).
    #[serde(default)]
    pub name: Option<String>,
    /// Notification address (required).
    #[serde(default)]
    pub email: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Redirect URL.
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// A validated form ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewForm {
    /// Owning user.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Generated key.
    pub key: String,
    /// Notification address.
    pub email: String,
    /// Description.
    pub description: Option<String>,
    /// Redirect URL.
    pub redirect_url: Option<String>,
}
