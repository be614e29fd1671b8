use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::models::User;
use crate::password::PasswordError;

#[derive(Debug)]
pub enum AppError {
    Database(sqlx::Error),
    Template(askama::Error),
    Password(PasswordError),
    NotFound,
    BadRequest(String),
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    status: u16,
    title: &'a str,
    message: &'a str,

    user: Option<User>,
}

/// Render the shared error page inside the site layout. Falls back to a
/// plain-text body if the template itself fails.
pub fn error_page(status: StatusCode, title: &str, message: &str, user: Option<User>) -> Response {
    let page = ErrorTemplate {
        status: status.as_u16(),
        title,
        message,
        user,
    };
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error while rendering error page: {e}");
            (status, message.to_string()).into_response()
        }
    }
}

fn internal_error() -> Response {
    error_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        "Something went wrong. Please try again later.",
        None,
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => error_page(
                StatusCode::NOT_FOUND,
                "Not Found",
                "The requested resource could not be found.",
                None,
            ),
            AppError::BadRequest(message) => {
                error_page(StatusCode::BAD_REQUEST, "Bad Request", &message, None)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                internal_error()
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                internal_error()
            }
            AppError::Password(e) => {
                tracing::error!("Password error: {e}");
                internal_error()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        AppError::Password(e)
    }
}
