mod common;

use axum::http::StatusCode;
use common::{body_string, TestApp};
use gamenight::models::{ChatError, ChatMessage};

#[tokio::test]
async fn post_returns_message_with_author() {
    let app = TestApp::new().await;
    let user = app.create_user("talker@x.com", "pw").await;
    let game = app.create_game(user.id, "Session 1", "2025-03-04T18:30").await;

    let entry = ChatMessage::post(&app.db, game.id, user.id, "Hello world")
        .await
        .unwrap();
    assert_eq!(entry.message.message_content, "Hello world");
    assert_eq!(entry.message.game_id, game.id);
    assert_eq!(entry.user_email, "talker@x.com");
    assert!(!entry.message.created_at.is_empty());
}

#[tokio::test]
async fn transcript_is_oldest_first() {
    let app = TestApp::new().await;
    let one = app.create_user("one@x.com", "pw").await;
    let two = app.create_user("two@x.com", "pw").await;
    let game = app.create_game(one.id, "Session 1", "2025-03-04T18:30").await;

    ChatMessage::post(&app.db, game.id, one.id, "first").await.unwrap();
    ChatMessage::post(&app.db, game.id, two.id, "second").await.unwrap();
    ChatMessage::post(&app.db, game.id, one.id, "third").await.unwrap();

    let contents: Vec<String> = ChatMessage::list_for_game(&app.db, game.id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.message.message_content)
        .collect();
    assert_eq!(contents, ["first", "second", "third"]);
}

#[tokio::test]
async fn blank_content_is_rejected() {
    let app = TestApp::new().await;
    let user = app.create_user("talker@x.com", "pw").await;
    let game = app.create_game(user.id, "Session 1", "2025-03-04T18:30").await;

    let result = ChatMessage::post(&app.db, game.id, user.id, "  \n\t ").await;
    assert!(matches!(result, Err(ChatError::EmptyContent)));
    assert_eq!(app.count("SELECT COUNT(*) FROM chat_messages").await, 0);
}

#[tokio::test]
async fn empty_game_has_empty_transcript() {
    let app = TestApp::new().await;
    let user = app.create_user("talker@x.com", "pw").await;
    let game = app.create_game(user.id, "Quiet", "2025-03-04T18:30").await;

    let messages = ChatMessage::list_for_game(&app.db, game.id).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn post_chat_renders_section() {
    let app = TestApp::new().await;
    let (user, cookie) = app.signed_in_user("talker@x.com").await;
    let game = app.create_game(user.id, "Session 1", "2025-03-04T18:30").await;

    let resp = app
        .post_form(
            &format!("/games/{}/chat", game.id),
            "message_content=Who+brings+snacks%3F",
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("id=\"chat-section\""));
    assert!(html.contains("Who brings snacks?"));
    assert!(html.contains("talker@x.com"));
}

#[tokio::test]
async fn whitespace_chat_keeps_transcript() {
    let app = TestApp::new().await;
    let (user, cookie) = app.signed_in_user("talker@x.com").await;
    let game = app.create_game(user.id, "Session 1", "2025-03-04T18:30").await;
    ChatMessage::post(&app.db, game.id, user.id, "existing message")
        .await
        .unwrap();

    let resp = app
        .post_form(
            &format!("/games/{}/chat", game.id),
            "message_content=+++",
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Message content cannot be empty."));
    assert!(html.contains("existing message"));
    assert_eq!(app.count("SELECT COUNT(*) FROM chat_messages").await, 1);
}

#[tokio::test]
async fn chat_content_is_escaped() {
    let app = TestApp::new().await;
    let (user, cookie) = app.signed_in_user("talker@x.com").await;
    let game = app.create_game(user.id, "Session 1", "2025-03-04T18:30").await;

    let resp = app
        .post_form(
            &format!("/games/{}/chat", game.id),
            "message_content=%3Cscript%3Ealert(1)%3C%2Fscript%3E",
            Some(&cookie),
        )
        .await;
    let html = body_string(resp).await;
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("alert(1)"));
    assert!(html.contains("&#60;script&#62;"));
}

#[tokio::test]
async fn post_chat_unknown_game() {
    let app = TestApp::new().await;
    let (_user, cookie) = app.signed_in_user("talker@x.com").await;

    let resp = app
        .post_form("/games/31337/chat", "message_content=hello", Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
