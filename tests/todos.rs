//! To-do CRUD and transitive-ownership integration suite.
//!
//! Requires a running Postgres with the schema applied and `DATABASE_URL`
//! set; run with `cargo test -- --ignored`.

mod common;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use common::*;
use serde_json::json;
use uuid::Uuid;

async fn create_list(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    user: &TestUser,
    name: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/list")
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .set_json(json!({"name": name}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_todo(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    user: &TestUser,
    list_id: &str,
    name: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri(&format!("/api/todo/{}", list_id))
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .set_json(json!({"name": name}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

// Scenario: create a to-do, see it inside its list, fetch it, delete it,
// and see it gone from the list view.
#[ignore = "requires a running Postgres"]
#[actix_rt::test]
async fn todo_lives_and_dies_inside_its_list() {
    let pool = test_pool().await;
    let app = spawn_app(pool.clone()).await;
    let email = format!("todo-{}@x.com", unique());
    let user =
        register_and_activate(&app, &pool, &format!("todo-{}", unique()), &email, "pw123456").await;

    let list_id = create_list(&app, &user, &format!("chores-{}", unique())).await;
    let todo_id = create_todo(&app, &user, &list_id, "mow the lawn").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/todo/list/{}", list_id))
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], todo_id.as_str());
    assert_eq!(items[0]["done"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/todo/{}", todo_id))
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert_eq!(body["data"]["name"], "mow the lawn");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/todo/{}", todo_id))
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    // The deleted record is echoed back.
    assert_eq!(body["data"]["id"], todo_id.as_str());

    let req = test::TestRequest::get()
        .uri(&format!("/api/todo/list/{}", list_id))
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert!(body["data"]["items"].as_array().unwrap().is_empty());

    cleanup_user(&pool, &email).await;
}

// Ownership of a to-do is inherited from its containing list.
#[ignore = "requires a running Postgres"]
#[actix_rt::test]
async fn todos_inherit_list_ownership() {
    let pool = test_pool().await;
    let app = spawn_app(pool.clone()).await;
    let email_a = format!("inh-a-{}@x.com", unique());
    let email_b = format!("inh-b-{}@x.com", unique());
    let user_a =
        register_and_activate(&app, &pool, &format!("inh-a-{}", unique()), &email_a, "pw123456")
            .await;
    let user_b =
        register_and_activate(&app, &pool, &format!("inh-b-{}", unique()), &email_b, "pw123456")
            .await;

    let list_id = create_list(&app, &user_a, &format!("inh-{}", unique())).await;
    let todo_id = create_todo(&app, &user_a, &list_id, "secret task").await;

    // Creating inside someone else's list is refused.
    let req = test::TestRequest::post()
        .uri(&format!("/api/todo/{}", list_id))
        .insert_header(("Authorization", format!("Bearer {}", user_b.token)))
        .set_json(json!({"name": "intruder"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    for (method, uri) in [
        ("GET", format!("/api/todo/{}", todo_id)),
        ("PUT", format!("/api/todo/{}", todo_id)),
        ("DELETE", format!("/api/todo/{}", todo_id)),
    ] {
        let req = match method {
            "GET" => test::TestRequest::get(),
            "PUT" => test::TestRequest::put().set_json(json!({"done": true})),
            _ => test::TestRequest::delete(),
        }
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {}", user_b.token)))
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401, "{} {} should be refused", method, uri);
    }

    // The list view itself is also closed to non-owners.
    let req = test::TestRequest::get()
        .uri(&format!("/api/todo/list/{}", list_id))
        .insert_header(("Authorization", format!("Bearer {}", user_b.token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    cleanup_user(&pool, &email_a).await;
    cleanup_user(&pool, &email_b).await;
}

#[ignore = "requires a running Postgres"]
#[actix_rt::test]
async fn missing_and_malformed_todo_ids_read_as_not_found() {
    let pool = test_pool().await;
    let app = spawn_app(pool.clone()).await;
    let email = format!("ghost-{}@x.com", unique());
    let user =
        register_and_activate(&app, &pool, &format!("ghost-{}", unique()), &email, "pw123456")
            .await;

    // A well-formed id that matches nothing.
    let req = test::TestRequest::get()
        .uri(&format!("/api/todo/{}", Uuid::new_v4()))
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert_eq!(body["error"]["message"], "ToDo not found");

    // A malformed id reads as absence too, unlike the list endpoints.
    let req = test::TestRequest::get()
        .uri("/api/todo/not-a-uuid")
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert_eq!(
        body["error"]["message"],
        "To-do not found, perhaps it doesn't exist or the id might be invalid"
    );

    cleanup_user(&pool, &email).await;
}

#[ignore = "requires a running Postgres"]
#[actix_rt::test]
async fn todo_update_patches_only_provided_fields() {
    let pool = test_pool().await;
    let app = spawn_app(pool.clone()).await;
    let email = format!("patch-{}@x.com", unique());
    let user =
        register_and_activate(&app, &pool, &format!("patch-{}", unique()), &email, "pw123456")
            .await;

    let list_id = create_list(&app, &user, &format!("patch-{}", unique())).await;
    let todo_id = create_todo(&app, &user, &list_id, "water plants").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/todo/{}", todo_id))
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .set_json(json!({"done": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert_eq!(body["data"]["done"], true);
    assert_eq!(body["data"]["name"], "water plants");

    // Fields outside the mutable set are rejected, not ignored.
    let req = test::TestRequest::put()
        .uri(&format!("/api/todo/{}", todo_id))
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .set_json(json!({"done": false, "list_id": Uuid::new_v4()}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    cleanup_user(&pool, &email).await;
}

#[ignore = "requires a running Postgres"]
#[actix_rt::test]
async fn deleting_a_list_releases_its_todos() {
    let pool = test_pool().await;
    let app = spawn_app(pool.clone()).await;
    let email = format!("cascade-{}@x.com", unique());
    let user =
        register_and_activate(&app, &pool, &format!("cascade-{}", unique()), &email, "pw123456")
            .await;

    let list_id = create_list(&app, &user, &format!("cascade-{}", unique())).await;
    let todo_id = create_todo(&app, &user, &list_id, "doomed").await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/list/{}", list_id))
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE id::text = $1")
        .bind(&todo_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "deleting a list should take its items with it");

    cleanup_user(&pool, &email).await;
}

// GET /api/todo is restricted to administrators; the role is read from the
// database on each call, so a promotion takes effect without a new session.
#[ignore = "requires a running Postgres"]
#[actix_rt::test]
async fn global_todo_listing_requires_admin() {
    let pool = test_pool().await;
    let app = spawn_app(pool.clone()).await;
    let email = format!("admin-{}@x.com", unique());
    let user =
        register_and_activate(&app, &pool, &format!("admin-{}", unique()), &email, "pw123456")
            .await;

    let list_id = create_list(&app, &user, &format!("admin-{}", unique())).await;
    create_todo(&app, &user, &list_id, "audit me").await;

    let req = test::TestRequest::get()
        .uri("/api/todo")
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    sqlx::query("UPDATE users SET role = 'admin' WHERE email = $1")
        .bind(&email)
        .execute(&pool)
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/todo")
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["name"] == "audit me"));

    cleanup_user(&pool, &email).await;
}
