#![allow(dead_code)]

use axum::body::Body;
use http_body_util::BodyExt;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use gamenight::config::Settings;
use gamenight::models::{Game, NewGame, User};
use gamenight::session::SessionRegistry;
use gamenight::AppState;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// bcrypt's minimum cost keeps the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub sessions: SessionRegistry,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory SQLite pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(
            pool.clone(),
            Settings {
                secure_cookies: false,
                bcrypt_cost: TEST_BCRYPT_COST,
            },
        );
        let sessions = state.sessions.clone();
        let router = gamenight::router(state);

        Self { router, db: pool, sessions }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    /// Insert a user directly with a real bcrypt hash of `password`.
    pub async fn create_user(&self, email: &str, password: &str) -> User {
        let hash = bcrypt::hash(password, TEST_BCRYPT_COST).unwrap();
        User::create(&self.db, email, &hash)
            .await
            .expect("Failed to create test user")
    }

    /// Insert a game hosted by `gm_id` scheduled at `when` (YYYY-MM-DDTHH:MM).
    pub async fn create_game(&self, gm_id: i64, title: &str, when: &str) -> Game {
        let new_game = NewGame {
            gm_id,
            title: title.to_string(),
            description: None,
            game_datetime: chrono::NaiveDateTime::parse_from_str(when, "%Y-%m-%dT%H:%M").unwrap(),
            location: "Test Location".to_string(),
        };
        Game::create(&self.db, &new_game)
            .await
            .expect("Failed to create test game")
    }

    /// Log in and return the session cookie string.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let resp = self
            .post_form("/login", &format!("email={}&password={}", encode(email), encode(password)), None)
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        resp.headers()
            .get("set-cookie")
            .expect("Login should set a session cookie")
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    /// Create a user and log in as them in one step.
    pub async fn signed_in_user(&self, email: &str) -> (User, String) {
        let user = self.create_user(email, "password").await;
        let cookie = self.login(email, "password").await;
        (user, cookie)
    }

    /// Send a GET request with an optional session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let req = builder.body(Body::empty()).unwrap();
        self.request(req).await
    }

    /// Send a POST form request with an optional session cookie.
    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        self.post_form_with_headers(uri, body, cookie, &[]).await
    }

    /// Send a POST form request the way htmx does, with `HX-Request: true`.
    pub async fn post_htmx(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        self.post_form_with_headers(uri, body, cookie, &[("HX-Request", "true")])
            .await
    }

    pub async fn post_form_with_headers(
        &self,
        uri: &str,
        body: &str,
        cookie: Option<&str>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        self.request(req).await
    }

    pub async fn count(&self, sql: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(sql).fetch_one(&self.db).await.unwrap();
        n
    }
}

/// Minimal form encoding for the characters test data uses.
pub fn encode(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('@', "%40")
        .replace('&', "%26")
        .replace('+', "%2B")
        .replace(' ', "+")
}

/// Read the full response body as a String.
pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert that a response is a redirect to the given location.
pub fn assert_redirect(resp: &Response, expected_location: &str) {
    assert!(
        resp.status().is_redirection(),
        "Expected redirect, got {}",
        resp.status()
    );
    let location = resp
        .headers()
        .get("location")
        .expect("Redirect should have location header")
        .to_str()
        .unwrap();
    assert_eq!(location, expected_location);
}

/// Assert that an HX-Redirect header points to the expected location.
pub fn assert_hx_redirect(resp: &Response, expected_location: &str) {
    let hx = resp
        .headers()
        .get("hx-redirect")
        .expect("Expected HX-Redirect header")
        .to_str()
        .unwrap();
    assert_eq!(hx, expected_location);
}
