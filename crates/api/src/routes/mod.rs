//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod forms;
pub mod health;
pub mod ingest;
pub mod submissions;
pub mod users;

/// Creates the router with public and protected routes.
///
/// The protected routes need state for the auth middleware; the ingest route
/// needs it for its body limit.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(users::routes())
        .merge(forms::routes())
        .merge(submissions::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // The form key is the only credential for submissions
    Router::new()
        .merge(health::routes())
        .merge(ingest::routes(state.max_submission_body()))
        .merge(protected_routes)
}
