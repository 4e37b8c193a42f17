use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use scribe_core::domain::UserId;
use scribe_core::ports::{PasswordService, TokenService};
use scribe_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use scribe_shared::dto::{AuthResponse, PostListResponse, PostResponse};

use super::{configure_routes, json_config, query_config};
use crate::state::AppState;

fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "scribe-api".to_string(),
    }))
}

/// Builds the service over fresh in-memory state; a macro because the
/// initialized service type cannot be named.
macro_rules! app {
    ($tokens:expr) => {{
        let tokens: Arc<dyn TokenService> = $tokens;
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory()))
                .app_data(web::Data::new(tokens))
                .app_data(web::Data::new(passwords))
                .app_data(json_config())
                .app_data(query_config())
                .configure(configure_routes),
        )
        .await
    }};
}

fn bearer(tokens: &Arc<dyn TokenService>) -> (header::HeaderName, String) {
    let token = tokens
        .generate_token(UserId::new(), "writer@example.com")
        .unwrap();
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

fn create_body(status: &str, tags: &[&str]) -> Value {
    json!({
        "title": "Tom & Jerry",
        "content": "Chase scenes",
        "status": status,
        "tags": tags,
    })
}

#[actix_rt::test]
async fn test_health_is_public() {
    let app = app!(token_service());

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_posts_require_bearer_token() {
    let app = app!(token_service());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(create_body("draft", &[]))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_create_then_get_post() {
    let tokens = token_service();
    let app = app!(tokens.clone());
    let auth = bearer(&tokens);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(auth.clone())
        .set_json(create_body("published", &["Go", "testing"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: PostResponse = test::read_body_json(resp).await;

    assert_eq!(created.title, "Tom &amp; Jerry");
    assert_eq!(created.status, "published");
    assert_eq!(created.tags, ["go", "testing"]);
    assert!(created.first_published_at.is_some());

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", created.id))
        .insert_header(auth)
        .to_request();
    let fetched: PostResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(fetched, created);
}

#[actix_rt::test]
async fn test_create_rejects_private_status_as_problem_details() {
    let tokens = token_service();
    let app = app!(tokens.clone());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&tokens))
        .set_json(create_body("private", &[]))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert_eq!(body["title"], "Bad Request");
}

#[actix_rt::test]
async fn test_malformed_json_is_bad_request() {
    let tokens = token_service();
    let app = app!(tokens.clone());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&tokens))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"title\":")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_get_unknown_and_malformed_ids() {
    let tokens = token_service();
    let app = app!(tokens.clone());
    let auth = bearer(&tokens);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", scribe_core::domain::PostId::new()))
        .insert_header(auth.clone())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri("/api/posts/not-a-uuid")
        .insert_header(auth)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_rt::test]
async fn test_update_and_patch_post() {
    let tokens = token_service();
    let app = app!(tokens.clone());
    let auth = bearer(&tokens);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(auth.clone())
        .set_json(create_body("draft", &["go"]))
        .to_request();
    let created: PostResponse = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/posts/{}", created.id);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(auth.clone())
        .set_json(json!({
            "title": "Rewritten",
            "content": "New body",
            "tags": ["rust"],
            "status": "published",
        }))
        .to_request();
    let updated: PostResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.title, "Rewritten");
    assert_eq!(updated.tags, ["rust"]);
    assert_eq!(updated.status, "published");

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth.clone())
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "no update fields");

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth.clone())
        .set_json(json!({ "status": "deleted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth)
        .set_json(json!({ "status": "private" }))
        .to_request();
    let patched: PostResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(patched.status, "private");
    assert_eq!(patched.first_published_at, updated.first_published_at);
}

#[actix_rt::test]
async fn test_posts_of_other_users_are_not_found() {
    let tokens = token_service();
    let app = app!(tokens.clone());
    let author = bearer(&tokens);
    let stranger = bearer(&tokens);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(author.clone())
        .set_json(create_body("draft", &["go"]))
        .to_request();
    let created: PostResponse = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/posts/{}", created.id);

    let requests = [
        test::TestRequest::get().uri(&uri),
        test::TestRequest::put().uri(&uri).set_json(json!({
            "title": "Hijacked",
            "content": "Hijacked",
            "tags": [],
        })),
        test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({ "status": "deleted" })),
    ];
    for req in requests {
        let req = req.insert_header(stranger.clone()).to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(author)
        .to_request();
    let unchanged: PostResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unchanged, created);
}

#[actix_rt::test]
async fn test_list_pages_only_own_posts() {
    let tokens = token_service();
    let app = app!(tokens.clone());
    let mine = bearer(&tokens);
    let theirs = bearer(&tokens);

    for auth in [&mine, &mine, &mine, &theirs] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(auth.clone())
            .set_json(create_body("draft", &[]))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/posts?limit=2&sort_by=updated_at&order=asc")
        .insert_header(mine.clone())
        .to_request();
    let page: PostListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.total, 3);
    assert_eq!(page.posts.len(), 2);
    assert!(page.has_more);

    for uri in [
        "/api/posts?limit=0",
        "/api/posts?limit=101",
        "/api/posts?sort_by=title",
        "/api/posts?status=archived",
        "/api/posts?offset=-1",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(mine.clone())
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST,
            "{uri}"
        );
    }
}

#[actix_rt::test]
async fn test_register_login_and_me() {
    let app = app!(token_service());
    let credentials = json!({ "email": "Ada@Example.com", "password": "correct horse" });

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&credentials)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "wrong password" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&credentials)
        .to_request();
    let login: AuthResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(login.token_type, "Bearer");
    assert_eq!(login.expires_in, 3600);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", login.access_token),
        ))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["email"], "ada@example.com");
}

#[actix_rt::test]
async fn test_register_rejects_short_password() {
    let app = app!(token_service());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "bob@example.com", "password": "short" }))
        .to_request();

    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}
