use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use hangman_back::{
    config::AppConfig,
    dao::game_store::memory::MemoryGameStore,
    routes,
    services::mailer::{MailError, MailMessage, Mailer},
    state::{AppState, SharedState},
};

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl RecordingMailer {
    fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: MailMessage) -> BoxFuture<'static, Result<(), MailError>> {
        let sent = self.sent.clone();
        Box::pin(async move {
            sent.lock().unwrap().push(message);
            Ok(())
        })
    }
}

struct TestApp {
    router: Router,
    mailer: RecordingMailer,
    _state: SharedState,
}

impl TestApp {
    async fn new() -> Self {
        let app = Self::degraded();
        app._state
            .set_game_store(Arc::new(MemoryGameStore::new()))
            .await;
        app
    }

    fn degraded() -> Self {
        let mailer = RecordingMailer::default();
        let (state, _worker) = AppState::new(AppConfig::default(), Arc::new(mailer.clone()));
        Self {
            router: routes::router(state.clone()),
            mailer,
            _state: state,
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(body) => self.send_json(method, uri, body.to_string()).await,
            None => {
                let request = Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap();
                self.send(request).await
            }
        }
    }

    async fn send_json(&self, method: Method, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    async fn create_user(&self, name: &str, email: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/user",
            Some(json!({ "user_name": name, "email": email })),
        )
        .await
    }

    async fn new_game(&self, name: &str, answer: &str, attempts: Option<i64>) -> (StatusCode, Value) {
        let mut body = json!({ "user_name": name, "answer": answer });
        if let Some(attempts) = attempts {
            body["attempts"] = json!(attempts);
        }
        self.request(Method::POST, "/game", Some(body)).await
    }

    async fn start_game(&self, name: &str, answer: &str, attempts: Option<i64>) -> String {
        let (status, body) = self.new_game(name, answer, attempts).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["urlsafe_key"].as_str().unwrap().to_owned()
    }

    async fn guess(&self, key: &str, letter: &str) -> (StatusCode, Value) {
        self.request(
            Method::PUT,
            &format!("/game/{key}"),
            Some(json!({ "move": letter })),
        )
        .await
    }
}

#[tokio::test]
async fn registers_users_with_unique_name_and_email() {
    let app = TestApp::new().await;

    let (status, body) = app.create_user("ada", "ada@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User ada created!");

    let (status, body) = app.create_user("ada", "other@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A User with username ada already exists!");

    let (status, body) = app.create_user("bob", "ada@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A User with email ada@example.com already exists!");

    let (status, _) = app.create_user("carol", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn new_game_validates_input_and_owner() {
    let app = TestApp::new().await;
    app.create_user("ada", "ada@example.com").await;

    let (status, body) = app.new_game("nobody", "word", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "A User with name nobody does not exist!");

    let (status, _) = app.new_game("ada", "word", Some(0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.new_game("ada", "", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.new_game("ada", "two words", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.new_game("ada", "word", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Good luck playing Hangman!");
    assert_eq!(body["user_name"], "ada");
    assert_eq!(body["attempts"], 6);
    assert_eq!(body["attempts_remaining"], 6);
    assert_eq!(body["game_over"], false);
    assert_eq!(body["revealed"], "____");

    let key = body["urlsafe_key"].as_str().unwrap();
    let (status, body) = app.get(&format!("/game/{key}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You have 6 attempts remaining");
}

#[tokio::test]
async fn winning_game_records_score_and_ranking() {
    let app = TestApp::new().await;
    app.create_user("ada", "ada@example.com").await;
    let key = app.start_game("ada", "abba", Some(4)).await;

    let (_, body) = app.guess(&key, "z").await;
    assert_eq!(body["message"], "Wrong! You have 3 attempts remaining!");

    let (_, body) = app.guess(&key, "a").await;
    assert_eq!(body["message"], "Correct! You got a__a");

    let (_, body) = app.guess(&key, "a").await;
    assert_eq!(body["message"], "You already got the letter a");
    assert_eq!(body["attempts_remaining"], 3);

    let (status, body) = app.guess(&key, "b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You win!");
    assert_eq!(body["game_over"], true);
    assert_eq!(body["revealed"], "abba");

    let (status, body) = app.guess(&key, "c").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Game is over!");

    let (_, history) = app.get(&format!("/game/{key}/history")).await;
    assert_eq!(
        history["moves"],
        json!([
            "Guess: z, Result: Wrong! You have 3 attempts remaining!",
            "Guess: a, Result: Correct! You got a__a",
            "Guess: b, Result: You win!",
        ])
    );

    let (status, scores) = app.get("/scores/user/ada").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scores.as_array().unwrap().len(), 1);
    assert_eq!(scores[0]["won"], true);
    assert_eq!(scores[0]["attempts_used"], 1);
    assert_eq!(scores[0]["attempts"], 4);

    let (status, high_scores) = app.get("/scores/high_scores?number_of_results=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(high_scores[0]["user_name"], "ada");

    let (status, rankings) = app.get("/users/rankings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rankings[0]["name"], "ada");
    assert_eq!(rankings[0]["won"], 1);
    assert_eq!(rankings[0]["total_played"], 1);
    assert_eq!(rankings[0]["win_ratio"], 1.0);
}

#[tokio::test]
async fn losing_game_counts_as_played() {
    let app = TestApp::new().await;
    app.create_user("bob", "bob@example.com").await;
    let key = app.start_game("bob", "cat", Some(2)).await;

    app.guess(&key, "x").await;
    let (_, body) = app.guess(&key, "y").await;
    assert_eq!(body["message"], "Game Over, You lose!");
    assert_eq!(body["attempts_remaining"], 0);

    let (_, scores) = app.get("/scores").await;
    assert_eq!(scores[0]["user_name"], "bob");
    assert_eq!(scores[0]["won"], false);
    assert_eq!(scores[0]["attempts_used"], 2);

    let (status, _) = app.get("/scores/high_scores").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/users/rankings").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cannot find any users!");
}

#[tokio::test]
async fn invalid_moves_leave_game_untouched() {
    let app = TestApp::new().await;
    app.create_user("ada", "ada@example.com").await;
    let key = app.start_game("ada", "word", None).await;

    for guess in ["ab", "", "7"] {
        let (status, body) = app.guess(&key, guess).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You must enter a single character!");
    }

    let (_, body) = app.get(&format!("/game/{key}")).await;
    assert_eq!(body["attempts_remaining"], 6);
    let (_, history) = app.get(&format!("/game/{key}/history")).await;
    assert_eq!(history["moves"], json!([]));

    let (status, _) = app.guess("not-a-key", "a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_only_removes_games_in_progress() {
    let app = TestApp::new().await;
    app.create_user("ada", "ada@example.com").await;
    let active = app.start_game("ada", "word", None).await;
    let finished = app.start_game("ada", "a", None).await;
    app.guess(&finished, "a").await;

    let (status, body) = app.get("/user/ada/games").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["urlsafe_key"], active.as_str());

    let (status, body) = app
        .request(Method::DELETE, &format!("/game/{finished}/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Game is already over!");

    let (status, body) = app
        .request(Method::DELETE, &format!("/game/{active}/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("Game with key {active} deleted."));

    let (status, body) = app.get(&format!("/game/{active}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Game not found!");

    let (status, _) = app.get("/user/nobody/games").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn average_attempts_cache_refreshes_on_task() {
    let app = TestApp::new().await;
    app.create_user("ada", "ada@example.com").await;

    let (_, body) = app.get("/games/average_attempts").await;
    assert_eq!(body["message"], "");

    for attempts in [3, 5, 4] {
        app.start_game("ada", "word", Some(attempts)).await;
    }

    let (status, body) = app
        .request(Method::POST, "/tasks/cache_average_attempts", None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, body) = app.get("/games/average_attempts").await;
    assert_eq!(body["message"], "The average moves remaining is 4.00");
}

#[tokio::test]
async fn reminder_job_mails_users_with_active_games() {
    let app = TestApp::new().await;
    app.create_user("ada", "ada@example.com").await;
    app.create_user("bob", "bob@example.com").await;
    let key = app.start_game("ada", "word", None).await;

    let (status, report) = app.get("/crons/send_reminder").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report, json!({ "notified": 1, "failed": 0 }));

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert_eq!(sent[0].from, "noreply@hangman.local");
    assert_eq!(sent[0].subject, "This is a reminder!");
    assert!(sent[0].body.starts_with("Hello ada,"));
    assert!(sent[0].body.contains(&key));
}

#[tokio::test]
async fn degraded_mode_rejects_store_operations() {
    let app = TestApp::degraded();

    let (status, body) = app.get("/healthcheck").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");

    let (status, _) = app.create_user("ada", "ada@example.com").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = app.get("/crons/send_reminder").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let healthy = TestApp::new().await;
    let (_, body) = healthy.get("/healthcheck").await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn serves_openapi_document() {
    let app = TestApp::new().await;

    let (status, doc) = app.get("/api-doc/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/game/{game_key}"].is_object());
}

#[tokio::test]
async fn malformed_bodies_are_json_bad_requests() {
    let app = TestApp::new().await;
    app.create_user("ada", "ada@example.com").await;
    let key = app.start_game("ada", "word", Some(3)).await;

    let (status, body) = app
        .request(Method::PUT, &format!("/game/{key}"), Some(json!({ "move": 5 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some_and(|message| !message.is_empty()));

    let (status, body) = app
        .request(
            Method::POST,
            "/game",
            Some(json!({ "user_name": "ada", "answer": "word", "attempts": 2.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = app
        .send_json(Method::POST, "/user", r#"{"user_name": "bob""#.to_owned())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = app.get("/scores/high_scores?number_of_results=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (_, game) = app.get(&format!("/game/{key}")).await;
    assert_eq!(game["attempts_remaining"], 3);
}

#[tokio::test]
async fn new_game_reports_plain_validation_messages() {
    let app = TestApp::new().await;
    app.create_user("ada", "ada@example.com").await;

    let (status, body) = app.new_game("nobody", "", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "A User with name nobody does not exist!");

    let (status, body) = app.new_game("ada", "", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You must enter an answer to create a new game!");

    let (status, body) = app.new_game("ada", "word", Some(0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Number of attempts must be greater than 0!");
}
