use serde_json::json;
use std::sync::Arc;

use book_admin::{
    error::{PROCESSING_ERROR_MESSAGE, SERVER_ERROR_MESSAGE},
    models::{BookField, BookId},
    pages::{edit_book::DELETE_DONE_MESSAGE, edit_book::UPDATE_DONE_MESSAGE, EditBookPage, PageState, PageView, Route},
    terminal::TerminalNavigator,
};

use crate::support::{client, sample_book, RecordingPrompt, StubApi};

#[tokio::test]
async fn test_edit_price_and_save() {
    let stub = StubApi::default().with_book("42", sample_book());
    let prompt = Arc::new(RecordingPrompt::default());
    let navigator = Arc::new(TerminalNavigator::default());
    let page = EditBookPage::new(client(&stub.serve().await), prompt.clone(), navigator.clone());

    assert_eq!(page.view(), PageView::Loading);
    assert_eq!(page.enter("42").await, PageState::Ready);
    match page.view() {
        PageView::Form(form) => {
            assert_eq!(form.book.id, Some(BookId::new("42").unwrap()));
            assert_eq!(form.book.title, "A");
            assert_eq!(form.book.price, "1000");
            assert_eq!(form.book.cover_image_url.as_deref(), Some("u"));
        }
        other => panic!("unexpected view {:?}", other),
    }

    page.input(BookField::Price, "2000").unwrap();
    assert_eq!(page.click_update().await, PageState::Navigated);
    assert_eq!(page.view(), PageView::Closed);

    let patches = stub.patches();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].0, "42");
    assert_eq!(patches[0].1["price"], json!(2000));
    assert!(patches[0].1.get("id").is_none());
    assert!(patches[0].1.get("coverImageUrl").is_none());
    assert_eq!(
        navigator.last_route(),
        Some(Route::BookDetail(BookId::new("42").unwrap()))
    );
    assert_eq!(prompt.notices(), vec![UPDATE_DONE_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_long_description_is_not_sent() {
    let stub = StubApi::default().with_book("42", sample_book());
    let prompt = Arc::new(RecordingPrompt::default());
    let navigator = Arc::new(TerminalNavigator::default());
    let page = EditBookPage::new(client(&stub.serve().await), prompt.clone(), navigator.clone());

    page.enter("42").await;
    page.input(BookField::Description, "x".repeat(1001)).unwrap();
    assert_eq!(page.click_update().await, PageState::Ready);

    assert!(stub.patches().is_empty());
    assert_eq!(navigator.last_route(), None);
    assert!(prompt.notices()[0].contains("1000"));
}

#[tokio::test]
async fn test_unexpected_reply_keeps_edits() {
    let stub = StubApi::default().with_book("42", sample_book());
    *stub.update_reply.lock().unwrap() = "error".to_string();
    let prompt = Arc::new(RecordingPrompt::default());
    let navigator = Arc::new(TerminalNavigator::default());
    let page = EditBookPage::new(client(&stub.serve().await), prompt.clone(), navigator.clone());

    page.enter("42").await;
    page.input(BookField::Title, "B-side").unwrap();
    assert_eq!(page.click_update().await, PageState::Ready);

    assert_eq!(prompt.notices(), vec![PROCESSING_ERROR_MESSAGE.to_string()]);
    assert_eq!(navigator.last_route(), None);
    assert_eq!(page.editor().draft().unwrap().title, "B-side");
    assert!(page.update_enabled());

    // Retry once the server behaves
    *stub.update_reply.lock().unwrap() = "수정완료".to_string();
    assert_eq!(page.click_update().await, PageState::Navigated);
    assert_eq!(stub.patches().len(), 2);
    assert_eq!(stub.patches()[1].1["title"], json!("B-side"));
}

#[tokio::test]
async fn test_missing_book_fails_to_load() {
    let stub = StubApi::default();
    let prompt = Arc::new(RecordingPrompt::default());
    let page = EditBookPage::new(
        client(&stub.serve().await),
        prompt.clone(),
        TerminalNavigator::default(),
    );

    assert_eq!(page.enter("42").await, PageState::LoadFailed);
    assert_eq!(page.view(), PageView::LoadFailed);
    assert_eq!(prompt.notices(), vec![SERVER_ERROR_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let stub = StubApi::default().with_book("42", sample_book());
    let prompt = Arc::new(RecordingPrompt::answering(false));
    let navigator = Arc::new(TerminalNavigator::default());
    let page = EditBookPage::new(client(&stub.serve().await), prompt.clone(), navigator.clone());

    page.enter("42").await;
    assert_eq!(page.click_delete().await, PageState::Ready);
    assert_eq!(prompt.confirms(), 1);
    assert!(stub.deletes().is_empty());
    assert_eq!(navigator.last_route(), None);
}

#[tokio::test]
async fn test_confirmed_delete_goes_home() {
    let stub = StubApi::default().with_book("42", sample_book());
    let prompt = Arc::new(RecordingPrompt::answering(true));
    let navigator = Arc::new(TerminalNavigator::default());
    let page = EditBookPage::new(client(&stub.serve().await), prompt.clone(), navigator.clone());

    page.enter("42").await;
    assert_eq!(page.click_delete().await, PageState::Navigated);
    assert_eq!(stub.deletes(), vec!["42".to_string()]);
    assert_eq!(navigator.last_route(), Some(Route::Home));
    assert_eq!(prompt.notices(), vec![DELETE_DONE_MESSAGE.to_string()]);
}
