//! Submission viewer routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    routing::{delete, get},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use formrelay_core::submission::{FormSubmissions, SubmissionService};
use formrelay_db::{FormRepository, SubmissionRepository};

/// Creates the submission routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/forms/{id}/submissions", get(list_submissions))
        .route("/forms/{id}/submissions/export", get(export_submissions))
        .route("/submissions/{id}", delete(delete_submission))
}

fn submission_service(state: &AppState) -> SubmissionService<FormRepository, SubmissionRepository> {
    SubmissionService::new(
        Arc::new(FormRepository::new((*state.db).clone())),
        Arc::new(SubmissionRepository::new((*state.db).clone())),
    )
}

/// Attachment filename for a CSV export, restricted to header-safe characters.
fn export_filename(form_name: &str) -> String {
    let stem: String = form_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-submissions.csv", stem.trim())
}

/// GET `/forms/{id}/submissions`
/// A form's submissions, newest first.
async fn list_submissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(form_id): Path<Uuid>,
) -> ApiResult<Json<FormSubmissions>> {
    let listing = submission_service(&state)
        .list_by_form(auth.user_id(), form_id)
        .await?;
    Ok(Json(listing))
}

/// GET `/forms/{id}/submissions/export`
/// The same submissions as CSV.
async fn export_submissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(form_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let (form_name, csv) = submission_service(&state)
        .export_csv(auth.user_id(), form_id)
        .await?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export_filename(&form_name)),
            ),
        ],
        csv,
    ))
}

/// DELETE `/submissions/{id}`
/// Delete one submission. The form is left untouched.
async fn delete_submission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(submission_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    submission_service(&state)
        .delete(auth.user_id(), submission_id)
        .await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
        middleware::from_fn_with_state,
    };
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    use crate::middleware::auth::auth_middleware;
    use crate::test_support::{body_json, test_state, token_for};
    use formrelay_core::form::{Form, FormRepository as _, NewForm, generate_form_key};
    use formrelay_core::submission::{NewSubmission, Submission, SubmissionRepository as _};
    use formrelay_db::UserRepository;

    fn app(state: &AppState) -> Router {
        Router::new()
            .merge(routes())
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state.clone())
    }

    fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn seed(state: &AppState, owner: &str) -> (Form, Submission) {
        UserRepository::new((*state.db).clone())
            .provision(owner, "owner@example.com", "Owner")
            .await
            .unwrap();
        let form = FormRepository::new((*state.db).clone())
            .create(NewForm {
                user_id: owner.to_string(),
                name: "Contact, Main".to_string(),
                key: generate_form_key(),
                email: "owner@example.com".to_string(),
                description: None,
                redirect_url: None,
            })
            .await
            .unwrap();
        let submission = SubmissionRepository::new((*state.db).clone())
            .create(NewSubmission {
                form_id: form.id,
                data: json!({"name": "Bob"}).as_object().cloned().unwrap(),
                files: None,
                ip_address: "203.0.113.7".to_string(),
                user_agent: "curl/8.0".to_string(),
            })
            .await
            .unwrap();
        (form, submission)
    }

    #[rstest]
    #[case("Contact", "Contact-submissions.csv")]
    #[case("Contact, Main", "Contact_ Main-submissions.csv")]
    #[case("say \"hi\"", "say _hi_-submissions.csv")]
    fn test_export_filename(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(export_filename(name), expected);
    }

    #[tokio::test]
    async fn test_list_submissions() {
        let state = test_state().await;
        let (form, submission) = seed(&state, "user_1").await;
        let token = token_for(&state, "user_1");

        let response = app(&state)
            .oneshot(authed("GET", &format!("/forms/{}/submissions", form.id), &token))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["formName"], "Contact, Main");
        assert_eq!(body["submissions"][0]["id"], submission.id.to_string());
        assert_eq!(body["submissions"][0]["data"]["name"], "Bob");
    }

    #[tokio::test]
    async fn test_list_submissions_owner_only() {
        let state = test_state().await;
        let (form, _) = seed(&state, "user_1").await;
        let uri = format!("/forms/{}/submissions", form.id);

        let response = app(&state)
            .oneshot(authed("GET", &uri, &token_for(&state, "user_2")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app(&state)
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app(&state)
            .oneshot(authed(
                "GET",
                &format!("/forms/{}/submissions", Uuid::new_v4()),
                &token_for(&state, "user_1"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_submissions_as_csv() {
        let state = test_state().await;
        let (form, _) = seed(&state, "user_1").await;
        let token = token_for(&state, "user_1");

        let response = app(&state)
            .oneshot(authed(
                "GET",
                &format!("/forms/{}/submissions/export", form.id),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"Contact_ Main-submissions.csv\""
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let csv = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Submitted At,IP Address,name"));
        assert!(lines.next().unwrap().ends_with(r#","203.0.113.7","Bob""#));
    }

    #[tokio::test]
    async fn test_delete_submission_checks_owner() {
        let state = test_state().await;
        let (form, submission) = seed(&state, "user_1").await;
        let uri = format!("/submissions/{}", submission.id);

        let response = app(&state)
            .oneshot(authed("DELETE", &uri, &token_for(&state, "user_2")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let owner = token_for(&state, "user_1");
        let response = app(&state).oneshot(authed("DELETE", &uri, &owner)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(&state).oneshot(authed("DELETE", &uri, &owner)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app(&state)
            .oneshot(authed("GET", &format!("/forms/{}/submissions", form.id), &owner))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["submissions"], json!([]));
    }
}
