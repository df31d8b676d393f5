//! End-to-end request flows through the public router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use gym_schedule::api::{create_router, AppState};
use gym_schedule::schedule::MemoryScheduleStore;

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let store = MemoryScheduleStore::new();
        Self {
            router: create_router(AppState::new(Arc::new(store))),
        }
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn count(&self) -> usize {
        match self.call("GET", "/schedules", None).await {
            (StatusCode::OK, Value::Array(items)) => items.len(),
            (StatusCode::NOT_FOUND, _) => 0,
            (status, body) => panic!("unexpected list response {status}: {body}"),
        }
    }
}

fn yoga() -> Value {
    json!({ "title": "Yoga", "day": "Monday", "date": "2024-06-03", "time": "08:00" })
}

#[tokio::test]
async fn yoga_class_lifecycle() {
    let app = TestApp::new();

    let (status, body) = app.call("POST", "/schedule", Some(yoga())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["insertedId"].as_str().unwrap().to_string();

    let (status, list) = app.call("GET", "/schedules", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        list,
        json!([{
            "_id": id,
            "title": "Yoga",
            "day": "Monday",
            "date": "2024-06-03",
            "time": "08:00",
            "completed": false
        }])
    );

    let (status, _) = app
        .call("PATCH", &format!("/schedule/{id}/complete"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.call("GET", "/schedules", None).await;
    assert_eq!(list[0]["_id"], json!(id));
    assert_eq!(list[0]["completed"], json!(true));

    let (status, body) = app.call("DELETE", &format!("/schedule/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Schedule deleted successfully"));

    let (status, body) = app.call("GET", "/schedules", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "No schedules found" }));
}

#[tokio::test]
async fn each_add_grows_the_list_by_one() {
    let app = TestApp::new();

    for (i, title) in ["Yoga", "Spin", "Boxing"].into_iter().enumerate() {
        let before = app.count().await;
        assert_eq!(before, i);

        let mut body = yoga();
        body["title"] = json!(title);
        let (status, _) = app.call("POST", "/schedule", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);

        assert_eq!(app.count().await, before + 1);
    }

    let (_, list) = app.call("GET", "/schedules", None).await;
    let list = list.as_array().unwrap();
    assert!(list.iter().all(|s| s["completed"] == json!(false)));
    assert_eq!(list[2]["title"], json!("Boxing"));
}

#[tokio::test]
async fn rejected_adds_leave_the_store_unchanged() {
    let app = TestApp::new();
    app.call("POST", "/schedule", Some(yoga())).await;

    for field in ["title", "day", "date", "time"] {
        let mut absent = yoga();
        absent.as_object_mut().unwrap().remove(field);
        let (status, body) = app.call("POST", "/schedule", Some(absent)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("All fields are required!"));

        let mut empty = yoga();
        empty[field] = json!("");
        let (status, _) = app.call("POST", "/schedule", Some(empty)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    assert_eq!(app.count().await, 1);
}

#[tokio::test]
async fn update_after_complete_keeps_completion() {
    let app = TestApp::new();
    let (_, body) = app.call("POST", "/schedule", Some(yoga())).await;
    let id = body["data"]["insertedId"].as_str().unwrap().to_string();

    app.call("PATCH", &format!("/schedule/{id}/complete"), None).await;
    let update = json!({ "title": "Hot Yoga", "day": "Friday", "date": "2024-06-07", "time": "18:00" });
    let (status, body) = app
        .call("PUT", &format!("/schedule/{id}"), Some(update.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], update);

    let (_, list) = app.call("GET", "/schedules", None).await;
    assert_eq!(list[0]["title"], json!("Hot Yoga"));
    assert_eq!(list[0]["day"], json!("Friday"));
    assert_eq!(list[0]["completed"], json!(true));
}

#[tokio::test]
async fn cors_headers_are_present() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
