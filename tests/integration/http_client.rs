use serde_json::json;

use book_admin::{
    client::{BookApi, HttpBookApi, MutationOutcome},
    config::ApiConfig,
    error::AppError,
    models::{BookField, BookId},
};

use crate::support::{client, sample_book, StubApi};

fn id(value: &str) -> BookId {
    BookId::new(value).unwrap()
}

#[tokio::test]
async fn test_fetch_book() {
    let stub = StubApi::default().with_book("42", sample_book());
    let api = client(&stub.serve().await);

    let book = api.fetch_book(&id("42")).await.unwrap();
    assert_eq!(book.id, None);
    assert_eq!(book.title, "A");
    assert_eq!(book.price, "1000");
    assert_eq!(book.cover_image_url.as_deref(), Some("u"));
}

#[tokio::test]
async fn test_fetch_missing_book_is_transport_error() {
    let stub = StubApi::default();
    let api = client(&stub.serve().await);

    let err = api.fetch_book(&id("404")).await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client(&format!("http://{}", addr));

    let err = api.fetch_book(&id("42")).await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn test_update_translates_marker() {
    let stub = StubApi::default().with_book("42", sample_book());
    let api = client(&stub.serve().await);

    let mut book = api.fetch_book(&id("42")).await.unwrap();
    book.set_field(BookField::Price, "2000");
    let payload = book.to_payload().unwrap();

    let outcome = api.update_book(&id("42"), &payload).await.unwrap();
    assert_eq!(outcome, MutationOutcome::Applied);

    let patches = stub.patches();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].0, "42");
    assert_eq!(
        patches[0].1,
        json!({
            "title": "A",
            "author": "B",
            "publisher": "C",
            "genre": "D",
            "tag": "E",
            "price": 2000,
            "description": "x"
        })
    );
}

#[tokio::test]
async fn test_other_message_is_rejected() {
    let stub = StubApi::default().with_book("42", sample_book());
    *stub.update_reply.lock().unwrap() = "수정실패".to_string();
    *stub.delete_reply.lock().unwrap() = "수정완료".to_string();
    let api = client(&stub.serve().await);

    let payload = api.fetch_book(&id("42")).await.unwrap().to_payload().unwrap();
    assert!(matches!(
        api.update_book(&id("42"), &payload).await.unwrap(),
        MutationOutcome::Rejected { .. }
    ));
    assert!(matches!(
        api.delete_book(&id("42")).await.unwrap(),
        MutationOutcome::Rejected { .. }
    ));
}

#[tokio::test]
async fn test_delete_translates_marker() {
    let stub = StubApi::default();
    let api = client(&stub.serve().await);

    let outcome = api.delete_book(&id("7")).await.unwrap();
    assert!(outcome.is_applied());
    assert_eq!(stub.deletes(), vec!["7".to_string()]);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let stub = StubApi::default().with_book("42", sample_book());
    let api = HttpBookApi::new(&ApiConfig {
        base_url: stub.serve().await,
        timeout_secs: 5,
        token: Some("s3cret".to_string()),
    })
    .unwrap();

    api.fetch_book(&id("42")).await.unwrap();
    api.delete_book(&id("42")).await.unwrap();
    assert_eq!(
        *stub.authorizations.lock().unwrap(),
        vec!["Bearer s3cret".to_string(), "Bearer s3cret".to_string()]
    );
}
