use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Form, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::auth::{AuthUser, MaybeUser};
use crate::error::AppError;
use crate::routes::GameId;
use crate::models::game::DATETIME_INPUT_FORMAT;
use crate::models::{ChatEntry, ChatMessage, Game, GameWithHost, NewGame, Rsvp, RsvpEntry, User};
use crate::AppState;

#[derive(Template)]
#[template(path = "games/list.html")]
struct GameListTemplate {
    games: Vec<GameWithHost>,

    user: Option<User>,
}

#[derive(Template)]
#[template(path = "games/form.html")]
struct GameFormTemplate {
    form: GameForm,
    error: Option<String>,

    user: Option<User>,
}

#[derive(Template)]
#[template(path = "games/show.html")]
struct GameShowTemplate {
    game: GameWithHost,
    game_id: i64,
    is_host: bool,
    rsvps: Vec<RsvpEntry>,
    current_rsvp: Option<RsvpEntry>,
    rsvp_error: Option<String>,
    messages: Vec<ChatEntry>,
    chat_error: Option<String>,

    user: Option<User>,
}

#[derive(Deserialize, Default)]
pub struct GameForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    game_datetime: String,
    #[serde(default)]
    location: String,
}

/// Check a submitted game form and parse its date/time.
fn validate_game_form(form: &GameForm) -> Result<NaiveDateTime, &'static str> {
    if form.title.trim().is_empty()
        || form.game_datetime.trim().is_empty()
        || form.location.trim().is_empty()
    {
        return Err("Title, Game Date/Time, and Location are required.");
    }

    NaiveDateTime::parse_from_str(form.game_datetime.trim(), DATETIME_INPUT_FORMAT)
        .map_err(|_| "Invalid date/time format. Use YYYY-MM-DDTHH:MM.")
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games))
        .route("/games/new", get(new_game_form).post(create_game))
        .route("/games/{id}", get(show_game))
}

async fn list_games(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<impl IntoResponse, AppError> {
    let games = GameWithHost::list_all(&state.db).await?;

    let template = GameListTemplate { games, user };
    Ok(Html(template.render()?))
}

async fn new_game_form(AuthUser(user): AuthUser) -> Result<impl IntoResponse, AppError> {
    let template = GameFormTemplate {
        form: GameForm::default(),
        error: None,

        user: Some(user),
    };
    Ok(Html(template.render()?))
}

async fn create_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Form(form): Form<GameForm>,
) -> Result<impl IntoResponse, AppError> {
    let game_datetime = match validate_game_form(&form) {
        Ok(dt) => dt,
        Err(error) => {
            let template = GameFormTemplate {
                form,
                error: Some(error.to_string()),
                user: Some(user),
            };
            return Ok(Html(template.render()?).into_response());
        }
    };

    let description = Some(form.description.trim().to_string()).filter(|s| !s.is_empty());

    let new_game = NewGame {
        gm_id: user.id,
        title: form.title.trim().to_string(),
        description,
        game_datetime,
        location: form.location.trim().to_string(),
    };
    let game = Game::create(&state.db, &new_game).await?;
    tracing::info!(game_id = game.id, gm_id = user.id, "game created");

    Ok(Redirect::to(&format!("/games/{}", game.id)).into_response())
}

async fn show_game(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    GameId(id): GameId,
) -> Result<impl IntoResponse, AppError> {
    let Some(game) = GameWithHost::find(&state.db, id).await? else {
        return Err(AppError::NotFound);
    };

    let rsvps = Rsvp::list_for_game(&state.db, id).await?;
    let current_rsvp = match &user {
        Some(user) => Rsvp::get_for_user(&state.db, user.id, id).await?,
        None => None,
    };
    let messages = ChatMessage::list_for_game(&state.db, id).await?;

    let template = GameShowTemplate {
        is_host: user.as_ref().is_some_and(|u| u.id == game.game.gm_id),
        game_id: id,
        game,
        rsvps,
        current_rsvp,
        rsvp_error: None,
        messages,
        chat_error: None,

        user,
    };
    Ok(Html(template.render()?))
}
