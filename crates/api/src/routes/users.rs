//! User provisioning routes.

use axum::{Json, Router, extract::State, routing::post};

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use formrelay_db::{UserRepository, entities::users};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users", post(provision_user))
}

/// Makes sure the caller has a local user row.
pub(crate) async fn ensure_user(state: &AppState, auth: &AuthUser) -> ApiResult<users::Model> {
    let repo = UserRepository::new((*state.db).clone());
    Ok(repo
        .provision(auth.user_id(), auth.email(), &auth.claims().display_name())
        .await?)
}

/// POST `/users`
/// Provision the caller from their token claims. Idempotent.
async fn provision_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<users::Model>> {
    Ok(Json(ensure_user(&state, &auth).await?))
}
