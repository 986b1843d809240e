//! Form registry routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde_json::{Value, json};
use uuid::Uuid;

use super::users::ensure_user;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use formrelay_core::form::{CreateFormInput, Form, FormService, FormSummary};
use formrelay_db::FormRepository;

/// Creates the form routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/forms", get(list_forms).post(create_form))
        .route("/forms/{id}", delete(delete_form))
}

fn form_service(state: &AppState) -> FormService<FormRepository> {
    FormService::new(Arc::new(FormRepository::new((*state.db).clone())))
}

/// GET `/forms`
/// The caller's forms, newest first, with submission counts.
async fn list_forms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<FormSummary>>> {
    let forms = form_service(&state).list(auth.user_id()).await?;
    Ok(Json(forms))
}

/// POST `/forms`
/// Register a form with a fresh key.
async fn create_form(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateFormInput>,
) -> ApiResult<(StatusCode, Json<Form>)> {
    ensure_user(&state, &auth).await?;
    let form = form_service(&state)
        .create(auth.user_id(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(form)))
}

/// DELETE `/forms/{id}`
/// Delete a form and all of its submissions.
async fn delete_form(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(form_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    form_service(&state).delete(auth.user_id(), form_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header::{AUTHORIZATION, CONTENT_TYPE}},
        middleware::from_fn_with_state,
    };
    use tower::ServiceExt;

    use crate::middleware::auth::auth_middleware;
    use crate::test_support::{body_json, test_state, token_for};

    fn app(state: &AppState) -> Router {
        Router::new()
            .merge(routes())
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state.clone())
    }

    fn create_request(token: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/forms")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_form_returns_key() {
        let state = test_state().await;
        let token = token_for(&state, "user_1");

        let response = app(&state)
            .oneshot(create_request(
                &token,
                &json!({"name": "Contact", "email": "a@b.com", "description": ""}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Contact");
        assert_eq!(body["user_id"], "user_1");
        assert!(body["description"].is_null());
        let key = body["key"].as_str().unwrap();
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn test_create_form_requires_name_and_email() {
        let state = test_state().await;
        let token = token_for(&state, "user_1");

        let response = app(&state)
            .oneshot(create_request(&token, &json!({"name": "Contact"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Name and email are required");
    }

    #[tokio::test]
    async fn test_create_form_rejects_header_breaking_redirect() {
        let state = test_state().await;
        let token = token_for(&state, "user_1");

        let response = app(&state)
            .oneshot(create_request(
                &token,
                &json!({
                    "name": "Contact",
                    "email": "a@b.com",
                    "redirect_url": "https://example.com/a\nb"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");

        let response = app(&state).oneshot(authed("GET", "/forms", &token)).await.unwrap();
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_list_forms_is_scoped_to_caller() {
        let state = test_state().await;
        let mine = token_for(&state, "user_1");
        let theirs = token_for(&state, "user_2");

        for (token, name) in [(&mine, "Mine"), (&theirs, "Theirs")] {
            let response = app(&state)
                .oneshot(create_request(token, &json!({"name": name, "email": "a@b.com"})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app(&state).oneshot(authed("GET", "/forms", &mine)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let forms = body.as_array().unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0]["name"], "Mine");
        assert_eq!(forms[0]["submission_count"], 0);
    }

    #[tokio::test]
    async fn test_list_forms_requires_auth() {
        let state = test_state().await;
        let response = app(&state)
            .oneshot(Request::builder().uri("/forms").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_form_checks_owner() {
        let state = test_state().await;
        let owner = token_for(&state, "user_1");
        let intruder = token_for(&state, "user_2");

        let created = app(&state)
            .oneshot(create_request(&owner, &json!({"name": "Contact", "email": "a@b.com"})))
            .await
            .unwrap();
        let id = body_json(created).await["id"].as_str().unwrap().to_string();
        let uri = format!("/forms/{id}");

        let response = app(&state).oneshot(authed("DELETE", &uri, &intruder)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app(&state).oneshot(authed("DELETE", &uri, &owner)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"success": true}));

        let response = app(&state).oneshot(authed("DELETE", &uri, &owner)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
