//! Task routes. The whole router sits behind the authentication guard;
//! per-handler extractors enforce the manager-only operations.

use axum::routing::{get, put};
use axum::Router;

use crate::state::AppState;

use super::handlers;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/:id",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            crate::auth::middleware::authenticate,
        ))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::state::AppState;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn register(app: &axum::Router, username: &str, role: &str) -> (String, String) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "username": username,
                            "email": format!("{username}@example.com"),
                            "password": "secret123",
                            "role": role
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        (
            body["accessToken"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn role_scoped_task_visibility_and_permissions() {
        let (state, _) = AppState::for_tests();
        let app = crate::app(state);

        let (manager_token, manager_id) = register(&app, "boss", "manager").await;
        let (user_token, user_id) = register(&app, "worker", "user").await;

        // Plain users cannot create tasks.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/tasks",
                &user_token,
                Some(json!({ "title": "Sneaky", "assignedTo": user_id })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Manager creates one task per person.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/tasks",
                &manager_token,
                Some(json!({ "title": "Write report", "assignedTo": user_id })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let task = body_json(response).await;
        let task_id = task["id"].as_str().unwrap().to_string();
        assert_eq!(task["status"], "to-do");
        assert_eq!(task["assignedTo"]["username"], "worker");

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/tasks",
                &manager_token,
                Some(json!({ "title": "Review budget", "assignedTo": manager_id })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // The manager sees both tasks, the user only their own.
        let response = app
            .clone()
            .oneshot(request("GET", "/api/tasks", &manager_token, None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["total"], 2);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/tasks", &user_token, None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["tasks"][0]["title"], "Write report");

        // Status filter applies on top of visibility.
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                "/api/tasks?status=completed",
                &user_token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["total"], 0);

        // The assignee may update status but not reassign.
        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/tasks/{task_id}"),
                &user_token,
                Some(json!({ "title": "Write report", "status": "in-progress" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "in-progress");

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/tasks/{task_id}"),
                &user_token,
                Some(json!({
                    "title": "Write report",
                    "status": "in-progress",
                    "assignedTo": manager_id
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await["message"],
            "Only managers can reassign tasks"
        );

        // Deletion is manager-only; the row is gone afterwards.
        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/tasks/{task_id}"),
                &user_token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/tasks/{task_id}"),
                &manager_token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Task deleted");

        let response = app
            .oneshot(request(
                "DELETE",
                &format!("/api/tasks/{task_id}"),
                &manager_token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
