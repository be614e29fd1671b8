use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::auth::{is_authenticated, login_user, logout_user};
use crate::error::AppError;
use crate::models::{CreateUserError, User};
use crate::password::{hash_password, verify_password};
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: Option<String>,
    email: String,

    user: Option<User>,
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    error: Option<String>,
    email: String,

    user: Option<User>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm_password: String,
}

fn validate_register_form(form: &RegisterForm) -> Option<&'static str> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Some("Email and password are required.");
    }
    if form.password != form.confirm_password {
        return Some("Passwords do not match.");
    }
    None
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register_submit))
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", post(logout))
}

fn render_register(error: &str, email: &str) -> Result<axum::response::Response, AppError> {
    let template = RegisterTemplate {
        error: Some(error.to_string()),
        email: email.to_string(),

        user: None,
    };
    Ok(Html(template.render()?).into_response())
}

fn render_login(error: &str, email: &str) -> Result<axum::response::Response, AppError> {
    let template = LoginTemplate {
        error: Some(error.to_string()),
        email: email.to_string(),

        user: None,
    };
    Ok(Html(template.render()?).into_response())
}

async fn register_page() -> Result<impl IntoResponse, AppError> {
    let template = RegisterTemplate {
        error: None,
        email: String::new(),

        user: None,
    };
    Ok(Html(template.render()?))
}

async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<impl IntoResponse, AppError> {
    let email = form.email.trim();

    if let Some(error) = validate_register_form(&form) {
        return render_register(error, email);
    }

    let hash = hash_password(&form.password, state.settings.bcrypt_cost).await?;

    match User::create(&state.db, email, &hash).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "registered new user");
            Ok(Redirect::to("/login").into_response())
        }
        Err(CreateUserError::EmailTaken) => render_register("Email already registered.", email),
        Err(CreateUserError::Database(e)) => Err(e.into()),
    }
}

async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if is_authenticated(&jar, &state.sessions) {
        return Ok(Redirect::to("/games").into_response());
    }

    let template = LoginTemplate {
        error: None,
        email: String::new(),

        user: None,
    };
    Ok(Html(template.render()?).into_response())
}

async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let email = form.email.trim();

    if email.is_empty() || form.password.is_empty() {
        return render_login("Email and password are required.", email);
    }

    // Unknown email and wrong password look the same to the caller.
    let Some(user) = User::find_by_email(&state.db, email).await? else {
        tracing::info!("login failed: unknown email");
        return render_login(INVALID_CREDENTIALS, email);
    };

    if !verify_password(&form.password, &user.password_hash).await? {
        tracing::info!(user_id = user.id, "login failed: wrong password");
        return render_login(INVALID_CREDENTIALS, email);
    }

    let jar = login_user(jar, &state.sessions, &user, state.settings.secure_cookies);
    tracing::info!(user_id = user.id, "user logged in");
    Ok((jar, Redirect::to("/games")).into_response())
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = logout_user(jar, &state.sessions);
    (jar, Redirect::to("/login"))
}
