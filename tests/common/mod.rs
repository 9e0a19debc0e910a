//! Shared setup for the integration suites.
//!
//! These suites run against a real Postgres with `migrations/0001_init.sql`
//! applied and `DATABASE_URL` set; the tests themselves are `#[ignore]`d so a
//! plain `cargo test` needs no database.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, web, App, Error};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use listkeeper::auth::{AuthMiddleware, TokenService};
use listkeeper::config::Config;
use listkeeper::mailer::EmailSender;
use listkeeper::routes::{self, health};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub async fn test_pool() -> PgPool {
    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB")
}

fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        server_host: "127.0.0.1".to_string(),
        server_port: 8080,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        public_url: "http://127.0.0.1:8080".to_string(),
        // The key is deliberately bogus: delivery is fire-and-forget and its
        // failure must never surface to callers.
        resend_api_key: "re_test_key".to_string(),
        mail_from: "Listkeeper <no-reply@example.com>".to_string(),
    }
}

/// Builds the same app `main` serves, against the given pool.
pub async fn spawn_app(
    pool: PgPool,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let config = test_config(
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests"),
    );
    let tokens = TokenService::new(TEST_JWT_SECRET);
    let mailer = EmailSender::new("re_test_key", "Listkeeper <no-reply@example.com>");

    test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(config))
            .app_data(web::Data::new(tokens))
            .app_data(web::Data::new(mailer))
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

/// Registers a user and returns the session token issued at registration.
/// The account stays pending until [`activate`] is called.
pub async fn register_user(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    username: &str,
    email: &str,
    password: &str,
) -> TestUser {
    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password,
            "confirmPassword": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)
        .expect("registration response should be JSON");
    assert_eq!(status, 201, "Registration failed. Body: {}", body);

    TestUser {
        id: body["data"]["user"]["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("registration response should carry the user id"),
        email: email.to_string(),
        token: body["data"]["token"]
            .as_str()
            .expect("registration response should carry a session token")
            .to_string(),
    }
}

/// Completes activation by reading the emailed token straight from the
/// database (no inbox in the loop).
pub async fn activate(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    pool: &PgPool,
    email: &str,
) {
    let token: String =
        sqlx::query_scalar("SELECT activation_token FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(pool)
            .await
            .expect("pending user should hold an activation token");

    let req = test::TestRequest::get()
        .uri(&format!("/api/user/activate-account/{}", token))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "Activation failed");
}

/// Registers and activates a user in one step.
pub async fn register_and_activate(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    pool: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> TestUser {
    let user = register_user(app, username, email, password).await;
    activate(app, pool, email).await;
    user
}

/// Removes a test account; lists and to-dos follow via FK cascade.
pub async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

/// Unique suffix so test entities never collide with leftovers.
pub fn unique() -> String {
    // Short enough that "some-prefix-{unique}" stays within the username
    // length limit.
    let mut s = Uuid::new_v4().simple().to_string();
    s.truncate(12);
    s
}
