mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{bearer, cleanup_user, connect_pool, init_app, register_user};

#[actix_rt::test]
async fn test_create_task_with_defaults_and_fetch() {
    let pool = connect_pool().await;
    let email = "task_defaults@example.com";
    cleanup_user(&pool, email).await;

    let app = init_app(&pool).await;
    let (token, user_id) = register_user(&app, "Ann", email, "secret1").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "title": "Buy milk" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["task"]["title"], json!("Buy milk"));
    assert_eq!(body["task"]["status"], json!("Pending"));
    assert_eq!(body["task"]["description"], json!(null));
    assert_eq!(body["task"]["due_date"], json!(null));
    assert_eq!(body["task"]["category_id"], json!(null));
    assert_eq!(body["task"]["user_id"], json!(user_id));
    let task_id = body["task"]["task_id"].as_i64().unwrap();

    // Single fetch carries the joined category name (null while unassigned)
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", task_id))
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["task"]["title"], json!("Buy milk"));
    assert_eq!(body["task"]["category_name"], json!(null));

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_task_list_is_scoped_and_newest_first() {
    let pool = connect_pool().await;
    let email = "task_list@example.com";
    cleanup_user(&pool, email).await;

    let app = init_app(&pool).await;
    let (token, _) = register_user(&app, "Ann", email, "secret1").await;

    // A task inside a category and two without
    let req = test::TestRequest::post()
        .uri("/api/categories")
        .append_header(bearer(&token))
        .set_json(json!({ "name": "Errands" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let category_id = body["category"]["category_id"].as_i64().unwrap();

    for (title, cat) in [
        ("first", None),
        ("second", Some(category_id)),
        ("third", None),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .append_header(bearer(&token))
            .set_json(json!({ "title": title, "category_id": cat }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], json!(3));

    let tasks = body["tasks"].as_array().unwrap();
    // Newest first: creation timestamps are non-increasing down the list
    let created: Vec<DateTime<Utc>> = tasks
        .iter()
        .map(|t| t["created_at"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(created.windows(2).all(|w| w[0] >= w[1]));

    // The joined category name rides along for the assigned task
    let second = tasks.iter().find(|t| t["title"] == json!("second")).unwrap();
    assert_eq!(second["category_name"], json!("Errands"));

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_task_ownership_isolation() {
    let pool = connect_pool().await;
    let email_owner = "task_owner@example.com";
    let email_other = "task_other@example.com";
    cleanup_user(&pool, email_owner).await;
    cleanup_user(&pool, email_other).await;

    let app = init_app(&pool).await;
    let (owner_token, _) = register_user(&app, "Ann", email_owner, "secret1").await;
    let (other_token, _) = register_user(&app, "Bob", email_other, "secret1").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&owner_token))
        .set_json(json!({ "title": "Buy milk" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["task"]["status"], json!("Pending"));
    let task_id = body["task"]["task_id"].as_i64().unwrap();

    // The owner sees the task
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", task_id))
        .append_header(bearer(&owner_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // Another user probing the same id gets 404 for every operation
    let uri = format!("/api/tasks/{}", task_id);
    let get = test::TestRequest::get()
        .uri(&uri)
        .append_header(bearer(&other_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, get).await.status(),
        StatusCode::NOT_FOUND
    );

    let put = test::TestRequest::put()
        .uri(&uri)
        .append_header(bearer(&other_token))
        .set_json(json!({ "status": "Completed" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, put).await.status(),
        StatusCode::NOT_FOUND
    );

    let delete = test::TestRequest::delete()
        .uri(&uri)
        .append_header(bearer(&other_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, delete).await.status(),
        StatusCode::NOT_FOUND
    );

    // And the task is untouched
    let req = test::TestRequest::get()
        .uri(&uri)
        .append_header(bearer(&owner_token))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["task"]["status"], json!("Pending"));

    cleanup_user(&pool, email_owner).await;
    cleanup_user(&pool, email_other).await;
}

#[actix_rt::test]
async fn test_partial_update_preserves_omitted_fields() {
    let pool = connect_pool().await;
    let email = "task_partial@example.com";
    cleanup_user(&pool, email).await;

    let app = init_app(&pool).await;
    let (token, _) = register_user(&app, "Ann", email, "secret1").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "title": "A", "description": "B", "due_date": "2026-09-15" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let task_id = body["task"]["task_id"].as_i64().unwrap();
    let original_updated_at: DateTime<Utc> =
        body["task"]["updated_at"].as_str().unwrap().parse().unwrap();

    // Update only the status
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task_id))
        .append_header(bearer(&token))
        .set_json(json!({ "status": "Completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["task"]["title"], json!("A"));
    assert_eq!(body["task"]["description"], json!("B"));
    assert_eq!(body["task"]["due_date"], json!("2026-09-15"));
    assert_eq!(body["task"]["status"], json!("Completed"));
    let new_updated_at: DateTime<Utc> =
        body["task"]["updated_at"].as_str().unwrap().parse().unwrap();
    assert!(new_updated_at > original_updated_at);

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_invalid_status_never_reaches_the_store() {
    let pool = connect_pool().await;
    let email = "task_bad_status@example.com";
    cleanup_user(&pool, email).await;

    let app = init_app(&pool).await;
    let (token, _) = register_user(&app, "Ann", email, "secret1").await;

    // "Done" is not a valid status label
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "title": "Buy milk", "status": "Done" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));

    // Nothing was inserted
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], json!(0));

    // Same on update: an existing task is left untouched
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "title": "Buy milk" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let task_id = body["task"]["task_id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task_id))
        .append_header(bearer(&token))
        .set_json(json!({ "status": "Done" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", task_id))
        .append_header(bearer(&token))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["task"]["status"], json!("Pending"));

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_task_invalid_inputs_and_missing_ids() {
    let pool = connect_pool().await;
    let email = "task_invalid@example.com";
    cleanup_user(&pool, email).await;

    let app = init_app(&pool).await;
    let (token, _) = register_user(&app, "Ann", email, "secret1").await;

    // Missing title is a deserialization failure, still a 400 JSON envelope
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "description": "no title" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));

    // Blank title fails validation with a per-field errors array
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "title": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"].is_array());

    // Operations on an id that never existed
    let req = test::TestRequest::put()
        .uri("/api/tasks/999999999")
        .append_header(bearer(&token))
        .set_json(json!({ "status": "Completed" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // Delete is idempotent only in effect: second call is a 404
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "title": "short lived" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let task_id = body["task"]["task_id"].as_i64().unwrap();

    let uri = format!("/api/tasks/{}", task_id);
    let req = test::TestRequest::delete()
        .uri(&uri)
        .append_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let req = test::TestRequest::delete()
        .uri(&uri)
        .append_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    cleanup_user(&pool, email).await;
}
