//! Integration tests for the TechNews service wrappers and session flows

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as TokenTtl;
use serde_json::json;
use technews_core::auth::{MemoryTokenStore, TokenKind, TokenStore};
use technews_core::models::{
    CommentCreate, ImageUpload, ListParams, PaymentStatusKind, PostCreateUpdate, PostsQuery,
    ProfileUpdate, PublicationStatus, RegisterRequest,
};
use technews_core::{ApiClient, ApiError, AuthSession, HttpTransport};
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, store: Arc<MemoryTokenStore>) -> ApiClient {
    let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
    ApiClient::new(Arc::new(transport), store)
}

fn signed_in_store() -> Arc<MemoryTokenStore> {
    let store = Arc::new(MemoryTokenStore::new());
    store.set(TokenKind::Access, "A1", TokenTtl::days(1)).unwrap();
    store.set(TokenKind::Refresh, "R1", TokenTtl::days(7)).unwrap();
    store
}

fn post_detail_body() -> serde_json::Value {
    json!({
        "id": 12,
        "title": "Async Rust in practice",
        "slug": "async-rust-in-practice",
        "content": "Futures all the way down.",
        "image": "http://localhost:8000/media/posts/cover.png",
        "author_info": {"id": 7, "username": "alice", "full_name": "Alice Liddell"},
        "category_info": {"id": 3, "name": "Rust", "slug": "rust"},
        "publication_status": "published",
        "comments_count": 0,
        "views_count": 1,
        "created": "2026-10-19T09:00:00Z",
        "modified": "2026-10-19T09:00:00Z"
    })
}

#[tokio::test]
async fn test_posts_list_sends_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/"))
        .and(query_param("page", "2"))
        .and(query_param("search", "rust"))
        .and(query_param("publication_status", "published"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 11,
            "next": null,
            "previous": "http://localhost:8000/api/v1/posts/?page=1",
            "results": [{
                "id": 1,
                "title": "Rust 2026",
                "slug": "rust-2026",
                "content": "Edition notes",
                "author": "alice",
                "category": "Rust",
                "publication_status": "published",
                "comments_count": 3,
                "views_count": 40,
                "created": "2026-10-01T12:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let query = PostsQuery {
        list: ListParams {
            page: Some(2),
            search: Some("rust".to_string()),
            ..Default::default()
        },
        publication_status: Some(PublicationStatus::Published),
        ..Default::default()
    };

    let page = client.posts(&query).await.unwrap();
    assert_eq!(page.count, 11);
    assert!(page.has_previous());
    assert_eq!(page.results[0].slug, "rust-2026");
}

#[tokio::test]
async fn test_create_post_with_image_uses_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/posts/"))
        .and(header("authorization", "Bearer A1"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_detail_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_store());
    let post = PostCreateUpdate {
        title: Some("Async Rust in practice".to_string()),
        content: Some("Futures all the way down.".to_string()),
        category: Some(3),
        publication_status: Some(PublicationStatus::Published),
    };
    let image = ImageUpload {
        file_name: "cover.png".to_string(),
        mime: Some("image/png".to_string()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    };

    let created = client.create_post_with_image(&post, &image).await.unwrap();
    assert_eq!(created.slug, "async-rust-in-practice");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"title\""));
    assert!(body.contains("filename=\"cover.png\""));
}

#[tokio::test]
async fn test_create_post_sends_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/posts/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "Hello", "content": "World"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_detail_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_store());
    let post = PostCreateUpdate {
        title: Some("Hello".to_string()),
        content: Some("World".to_string()),
        ..Default::default()
    };
    client.create_post(&post).await.unwrap();
}

#[tokio::test]
async fn test_delete_post_accepts_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/posts/old-news/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_store());
    client.delete_post("old-news").await.unwrap();
}

#[tokio::test]
async fn test_comment_create_and_post_comments() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/comments/"))
        .and(body_json(json!({"post": 12, "content": "Great read"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"post": 12, "content": "Great read"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/comments/post/12/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "post": {"id": 12, "title": "Async Rust in practice", "slug": "async-rust-in-practice"},
            "comments": [{
                "id": 1,
                "content": "Great read",
                "author_info": {"id": 7, "username": "alice"},
                "replies_count": 0,
                "created": "2026-10-19T10:00:00Z"
            }],
            "comments_count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_store());
    client
        .create_comment(&CommentCreate {
            post: 12,
            parent: None,
            content: "Great read".to_string(),
        })
        .await
        .unwrap();

    let thread = client.post_comments(12).await.unwrap();
    assert_eq!(thread.comments_count, 1);
    assert!(thread.comments[0].is_active);
}

#[tokio::test]
async fn test_subscription_and_payment_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/subscribe/cancel/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"msg": "Subscription cancelled"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/payments/3f1d/status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payment_id": "3f1d",
            "status": "succeeded",
            "message": "Payment completed",
            "subscription_activated": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/subscribe/status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "has_subscription": false,
            "is_active": false,
            "can_pin_posts": false,
            "subscription": null,
            "pinned_post": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_store());

    let cancelled = client.cancel_subscription().await.unwrap();
    assert_eq!(cancelled.msg.as_deref(), Some("Subscription cancelled"));

    let status = client.payment_status("3f1d").await.unwrap();
    assert_eq!(status.status, PaymentStatusKind::Succeeded);
    assert!(status.subscription_activated);

    let subscription = client.subscription_status().await.unwrap();
    assert!(!subscription.has_subscription);
    assert!(subscription.subscription.is_none());
}

#[tokio::test]
async fn test_malformed_json_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/popular/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let err = client.popular_posts().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_register_without_tokens_does_not_sign_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": {"id": 8, "username": "bob", "email": "bob@example.com"},
            "msg": "User registered successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let mut session = AuthSession::new(client_for(&server, store.clone()));

    let response = session
        .register(&RegisterRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "hunter22".to_string(),
            password_confirmation: "hunter22".to_string(),
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap();

    assert_eq!(response.msg.as_deref(), Some("User registered successfully"));
    assert!(!session.is_authenticated());
    assert!(store.get(TokenKind::Access).unwrap().is_none());
}

#[tokio::test]
async fn test_logout_posts_refresh_token_and_clears() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"msg": "Successfully logged out."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store();
    let mut session = AuthSession::new(client_for(&server, store.clone()));

    let response = session.logout().await;
    assert_eq!(response.msg.as_deref(), Some("Successfully logged out."));
    assert!(store.get(TokenKind::Access).unwrap().is_none());
    assert!(store.get(TokenKind::Refresh).unwrap().is_none());
}

#[tokio::test]
async fn test_update_profile_surfaces_server_detail() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/auth/profile/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Bio is too long."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut session = AuthSession::new(client_for(&server, signed_in_store()));
    let err = session
        .update_profile(&ProfileUpdate {
            bio: Some("x".repeat(5000)),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(session.error.as_deref(), Some("Bio is too long."));
    assert!(!session.loading);
}
