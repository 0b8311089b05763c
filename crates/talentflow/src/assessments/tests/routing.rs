use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::assessments::memory::InMemoryAssessmentStore;
use crate::assessments::repository::AssessmentStore;
use crate::assessments::router::{assessment_router, submit_handler, SubmitAssessmentRequest};
use crate::assessments::responses::ResponseMap;
use crate::assessments::service::AssessmentService;

fn seeded_router() -> (axum::Router, Arc<InMemoryAssessmentStore>) {
    let store = Arc::new(InMemoryAssessmentStore::default());
    store
        .save_assessment(JOB, vec![screening_section()])
        .expect("seeded");
    let service = Arc::new(AssessmentService::new(store.clone()));
    (assessment_router(service), store)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("json encodes")))
        .expect("request builds")
}

#[tokio::test]
async fn fetch_returns_camel_case_assessment() {
    let (router, _) = seeded_router();

    let response = router
        .oneshot(
            Request::get("/api/assessments/7")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["jobId"], json!(7));
    assert!(payload.get("updatedAt").is_some());
    let question = &payload["sections"][0]["questions"][1];
    assert_eq!(question["type"], json!("long-text"));
    assert_eq!(question["conditional"], json!({ "questionId": "q1", "value": "Yes" }));
}

#[tokio::test]
async fn fetch_unknown_job_returns_not_found() {
    let (router, _) = seeded_router();

    let response = router
        .oneshot(
            Request::get("/api/assessments/404")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Assessment not found"));
}

#[tokio::test]
async fn put_saves_sections_for_job() {
    let (router, store) = seeded_router();
    let body = json!({
        "sections": [{
            "id": "s-new",
            "title": "Logistics",
            "questions": [{
                "id": "relocate",
                "type": "single-choice",
                "label": "Willing to relocate?",
                "required": true,
                "options": ["Yes", "No"],
                "maxLength": 3
            }]
        }]
    });

    let response = router
        .oneshot(json_request("PUT", "/api/assessments/8", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let stored = store
        .get_assessment(crate::assessments::domain::JobId(8))
        .expect("store reachable")
        .expect("saved");
    assert_eq!(stored.sections[0].questions[0].id.as_str(), "relocate");
    assert_eq!(stored.sections[0].questions[0].max_length, Some(3));
}

#[tokio::test]
async fn submit_reports_field_errors() {
    let (router, store) = seeded_router();
    let body = json!({ "candidateId": 42, "responses": { "q1": "Yes" } });

    let response = router
        .oneshot(json_request("POST", "/api/assessments/7/submit", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errors"], json!({ "q2": "This field is required" }));
    assert_eq!(store.response_count(), 0);
}

#[tokio::test]
async fn submit_then_fetch_response() {
    let (router, _) = seeded_router();
    let body = json!({ "candidateId": 42, "responses": { "q1": "No" } });

    let submitted = router
        .clone()
        .oneshot(json_request("POST", "/api/assessments/7/submit", body))
        .await
        .expect("route executes");
    assert_eq!(submitted.status(), StatusCode::OK);
    let receipt = read_json_body(submitted).await;
    assert_eq!(receipt["success"], json!(true));

    let fetched = router
        .oneshot(
            Request::get("/api/assessments/7/responses/42")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(fetched.status(), StatusCode::OK);
    let payload = read_json_body(fetched).await;
    assert_eq!(payload["candidateId"], json!(42));
    assert_eq!(payload["responses"], json!({ "q1": "No" }));
    assert_eq!(payload["submittedAt"], receipt["submittedAt"]);
}

#[tokio::test]
async fn missing_response_returns_not_found() {
    let (router, _) = seeded_router();

    let response = router
        .oneshot(
            Request::get("/api/assessments/7/responses/1")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_store_failure() {
    let service = Arc::new(AssessmentService::new(Arc::new(UnavailableStore {
        assessment: Some(screening_assessment()),
        ..UnavailableStore::default()
    })));
    let request = SubmitAssessmentRequest {
        candidate_id: CANDIDATE,
        responses: ResponseMap::new().with(&qid("q1"), "No"),
    };

    let response =
        submit_handler::<UnavailableStore>(State(service), Path(7), Ok(axum::Json(request))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Failed to submit assessment"));
}

#[tokio::test]
async fn delete_route_removes_assessment() {
    let (router, store) = seeded_router();

    let response = router
        .clone()
        .oneshot(
            Request::delete("/api/assessments/7")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.get_assessment(JOB).expect("store reachable").is_none());

    let again = router
        .oneshot(
            Request::delete("/api/assessments/7")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let (router, _) = seeded_router();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/assessments/7")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"sections\": ["))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().is_some_and(|message| !message.is_empty()));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/assessments/7/submit",
            json!({ "responses": {} }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("candidateId")));
}
