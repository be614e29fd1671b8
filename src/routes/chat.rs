use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::post,
    Form, Router,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::GameId;
use crate::models::{ChatEntry, ChatError, ChatMessage, Game, User};
use crate::AppState;

#[derive(Template)]
#[template(path = "games/chat_section.html")]
struct ChatSectionTemplate {
    game_id: i64,
    messages: Vec<ChatEntry>,
    chat_error: Option<String>,

    user: Option<User>,
}

#[derive(Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    message_content: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/games/{id}/chat", post(post_message))
}

async fn post_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    GameId(game_id): GameId,
    Form(form): Form<ChatForm>,
) -> Result<impl IntoResponse, AppError> {
    if Game::find(&state.db, game_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let chat_error = match ChatMessage::post(&state.db, game_id, user.id, &form.message_content).await {
        Ok(entry) => {
            tracing::debug!(game_id, message_id = entry.message.id, "chat message posted");
            None
        }
        Err(ChatError::EmptyContent) => Some("Message content cannot be empty.".to_string()),
        Err(ChatError::Database(e)) => return Err(e.into()),
    };

    let messages = ChatMessage::list_for_game(&state.db, game_id).await?;

    let template = ChatSectionTemplate {
        game_id,
        messages,
        chat_error,

        user: Some(user),
    };
    Ok(Html(template.render()?))
}
