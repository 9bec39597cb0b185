// tests/auth_api_tests.rs
#[macro_use]
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test::{self, TestRequest};
use serde_json::json;
use shopfront_server::build_app;

#[actix_web::test]
async fn signup_returns_summary_and_an_empty_cart_exists() {
  let state = common::test_state().await;
  let app = test::init_service(build_app(state.clone())).await;

  let (status, body, _) = send!(
    &app,
    TestRequest::post().uri("/auth/signup").set_json(json!({
      "email": "  Ada@Example.com ", "username": "ada", "password": "correct horse"
    }))
  );
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["email"], "ada@example.com");
  assert_eq!(body["username"], "ada");
  assert!(body["id"].as_i64().is_some());
  assert!(body.get("password_hash").is_none());

  let carts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM carts").fetch_one(&state.db_pool).await.unwrap();
  assert_eq!(carts, 1);
}

#[actix_web::test]
async fn duplicate_email_or_username_is_rejected() {
  let app = test::init_service(build_app(common::test_state().await)).await;
  signup_and_login!(&app, "ada@example.com", "ada", "pw-1");

  for (email, username) in [("ada@example.com", "someone"), ("other@example.com", "ada")] {
    let (status, body, _) = send!(
      &app,
      TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "email": email, "username": username, "password": "pw-2" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email or username already registered");
    assert_eq!(body["code"], "validation_error");
  }
}

#[actix_web::test]
async fn signup_validates_fields() {
  let app = test::init_service(build_app(common::test_state().await)).await;

  let (status, body, _) = send!(
    &app,
    TestRequest::post()
      .uri("/auth/signup")
      .set_json(json!({ "email": "not-an-email", "username": "x", "password": "pw" }))
  );
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["detail"], "A valid email address is required");

  let (status, _, _) = send!(
    &app,
    TestRequest::post()
      .uri("/auth/signup")
      .set_json(json!({ "email": "x@example.com", "username": "   ", "password": "pw" }))
  );
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // A missing field never reaches the handler.
  let (status, body, _) = send!(
    &app,
    TestRequest::post().uri("/auth/signup").set_json(json!({ "email": "x@example.com" }))
  );
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert!(body["detail"].is_array());
  assert_eq!(body["detail"][0]["loc"][0], "body");
}

#[actix_web::test]
async fn login_issues_a_bearer_token() {
  let app = test::init_service(build_app(common::test_state().await)).await;
  signup_and_login!(&app, "ada@example.com", "ada", "pw");

  let (status, body, _) = send!(
    &app,
    TestRequest::post()
      .uri("/auth/login")
      .set_json(json!({ "email": "ADA@example.com", "password": "pw" }))
  );
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["token_type"], "bearer");
  assert_eq!(body["expires_in"], 30 * 60);
  assert_eq!(body["access_token"].as_str().unwrap().split('.').count(), 3);
}

#[actix_web::test]
async fn wrong_password_and_unknown_email_look_the_same() {
  let app = test::init_service(build_app(common::test_state().await)).await;
  signup_and_login!(&app, "ada@example.com", "ada", "pw");

  for (email, password) in [("ada@example.com", "nope"), ("ghost@example.com", "pw")] {
    let (status, body, headers) = send!(
      &app,
      TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": password }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_credentials");
    assert_eq!(body["detail"], "Incorrect email or password");
    assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
  }
}

#[actix_web::test]
async fn protected_routes_require_a_valid_token() {
  let app = test::init_service(build_app(common::test_state().await)).await;

  let (status, body, _) = send!(&app, TestRequest::get().uri("/cart"));
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], "unauthenticated");
  assert_eq!(body["detail"], "Not authenticated");

  let (status, body, _) = send!(&app, TestRequest::get().uri("/cart").insert_header(bearer!("not.a.token")));
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["detail"], "Could not validate credentials");

  let (status, _, _) = send!(
    &app,
    TestRequest::get().uri("/cart").insert_header(("Authorization", "Basic YWRhOnB3"))
  );
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_revokes_the_presented_token() {
  let app = test::init_service(build_app(common::test_state().await)).await;
  let token = signup_and_login!(&app, "ada@example.com", "ada", "pw");

  let (status, _, _) = send!(&app, TestRequest::get().uri("/cart").insert_header(bearer!(token)));
  assert_eq!(status, StatusCode::OK);

  let (status, body, _) = send!(&app, TestRequest::post().uri("/auth/logout").insert_header(bearer!(token)));
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Successfully logged out");

  let (status, _, _) = send!(&app, TestRequest::get().uri("/cart").insert_header(bearer!(token)));
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  // A fresh login still works.
  let (status, body, _) = send!(
    &app,
    TestRequest::post()
      .uri("/auth/login")
      .set_json(json!({ "email": "ada@example.com", "password": "pw" }))
  );
  assert_eq!(status, StatusCode::OK);
  let fresh = body["access_token"].as_str().unwrap().to_string();
  let (status, _, _) = send!(&app, TestRequest::get().uri("/cart").insert_header(bearer!(fresh)));
  assert_eq!(status, StatusCode::OK);
}
