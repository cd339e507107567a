use api::{AppState, ServerConfig, build_app};
use auth::{
    jwt::{JwtConfig, JwtService},
    rate_limiter::{RateLimiter, RateLimiterConfig},
};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "api-routes-test-secret-0123456789abcdef";

struct TestApp {
    router: Router,
}

/// A registered user and their bearer token
struct Account {
    id: String,
    token: String,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::in_memory(
            JwtService::new(JwtConfig::with_secret(SECRET)).unwrap(),
            RateLimiter::new(RateLimiterConfig::default()),
        );
        let router = build_app(state, &ServerConfig::default()).unwrap();
        Self { router }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    async fn register(&self, name: &str) -> Account {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase()),
                    "password": "correct-horse-battery",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        Account {
            id: body["_id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    async fn create_board(&self, account: &Account, title: &str) -> Value {
        let (status, body) = self
            .post("/api/boards", &account.token, json!({ "title": title }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create board failed: {}", body);
        body
    }

    async fn create_todo(&self, account: &Account, board: &Value, title: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/todos",
                &account.token,
                json!({ "boardId": board["_id"], "title": title }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create todo failed: {}", body);
        body
    }
}

#[tokio::test]
async fn root_and_health_are_public() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "API is running...");

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new();

    for (method, uri) in [
        (Method::GET, "/api/boards"),
        (Method::POST, "/api/boards"),
        (Method::GET, "/api/todos/user"),
        (Method::POST, "/api/todos"),
    ] {
        let (status, body) = app.request(method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} accepted", uri);
        assert_eq!(body["error"], "Not authorized");
    }

    let (status, _) = app.get("/api/boards", "not.a.jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_board_todo_flow() {
    let app = TestApp::new();
    app.register("Ada").await;

    let (status, login) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "correct-horse-battery" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let ada = Account {
        id: login["_id"].as_str().unwrap().to_string(),
        token: login["token"].as_str().unwrap().to_string(),
    };

    let board = app.create_board(&ada, "Home").await;
    assert_eq!(board["title"], "Home");
    assert_eq!(board["user"], ada.id.as_str());
    assert!(board["createdAt"].is_string());

    let todo = app.create_todo(&ada, &board, "Buy milk").await;
    assert_eq!(todo["board"], board["_id"]);

    let uri = format!("/api/todos/board/{}", board["_id"].as_str().unwrap());
    let (status, todos) = app.get(&uri, &ada.token).await;
    assert_eq!(status, StatusCode::OK);
    let todos = todos.as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["title"], "Buy milk");
    assert_eq!(todos[0]["status"], "pending");
}

#[tokio::test]
async fn board_creation_requires_a_title() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;

    for body in [json!({ "title": "" }), json!({ "title": null }), json!({})] {
        let (status, response) = app.post("/api/boards", &ada.token, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Please add a title");
    }

    let board = app.create_board(&ada, "Groceries").await;
    assert_eq!(board["title"], "Groceries");
}

#[tokio::test]
async fn listing_boards_is_stable_and_private() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let bob = app.register("Bob").await;
    app.create_board(&ada, "Home").await;
    app.create_board(&bob, "Garage").await;
    app.create_board(&ada, "Work").await;

    let (_, first) = app.get("/api/boards", &ada.token).await;
    let (_, second) = app.get("/api/boards", &ada.token).await;
    assert_eq!(first, second);

    let titles: Vec<_> = first
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Home", "Work"]);
}

#[tokio::test]
async fn board_owner_cannot_be_changed() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let bob = app.register("Bob").await;
    let board = app.create_board(&ada, "Home").await;
    let uri = format!("/api/boards/{}", board["_id"].as_str().unwrap());

    let (status, updated) = app
        .put(
            &uri,
            &ada.token,
            json!({
                "title": "House",
                "user": bob.id,
                "_id": Uuid::new_v4(),
                "createdAt": "2000-01-01T00:00:00Z",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "House");
    assert_eq!(updated["user"], ada.id.as_str());
    assert_eq!(updated["_id"], board["_id"]);
    assert_eq!(updated["createdAt"], board["createdAt"]);

    let (_, bobs) = app.get("/api/boards", &bob.token).await;
    assert_eq!(bobs, json!([]));
}

#[tokio::test]
async fn strangers_get_401_and_nothing_changes() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let board = app.create_board(&ada, "Work").await;
    let todo = app.create_todo(&ada, &board, "Write report").await;
    let bob = app.register("Bob").await;

    let board_uri = format!("/api/boards/{}", board["_id"].as_str().unwrap());
    let todo_uri = format!("/api/todos/{}", todo["_id"].as_str().unwrap());
    let list_uri = format!("/api/todos/board/{}", board["_id"].as_str().unwrap());

    let attempts = [
        app.delete(&board_uri, &bob.token).await,
        app.put(&board_uri, &bob.token, json!({ "title": "Mine" })).await,
        app.put(&todo_uri, &bob.token, json!({ "status": "completed" })).await,
        app.delete(&todo_uri, &bob.token).await,
        app.get(&list_uri, &bob.token).await,
        app.post(
            "/api/todos",
            &bob.token,
            json!({ "boardId": board["_id"], "title": "Sneaky" }),
        )
        .await,
    ];
    for (status, body) in attempts {
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "User not authorized");
    }

    let (_, boards) = app.get("/api/boards", &ada.token).await;
    assert_eq!(boards, json!([board]));
    let (_, todos) = app.get(&list_uri, &ada.token).await;
    assert_eq!(todos, json!([todo]));
}

#[tokio::test]
async fn missing_entities_are_404() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let ghost = Uuid::new_v4();

    let (status, body) = app
        .put(&format!("/api/boards/{}", ghost), &ada.token, json!({ "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Board not found");

    let (status, _) = app.delete(&format!("/api/boards/{}", ghost), &ada.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .get(&format!("/api/todos/board/{}", ghost), &ada.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .put(&format!("/api/todos/{}", ghost), &ada.token, json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Todo not found");

    let (status, _) = app
        .post("/api/todos", &ada.token, json!({ "boardId": ghost, "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_input_is_400() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let board = app.create_board(&ada, "Home").await;

    let (status, _) = app.delete("/api/boards/not-a-uuid", &ada.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/todos", &ada.token, json!({ "title": "Buy milk" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please add boardId and title");

    let (status, _) = app
        .post(
            "/api/todos",
            &ada.token,
            json!({ "boardId": board["_id"], "title": "x", "status": "done" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/todos", &ada.token, json!({ "boardId": "nope", "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggling_status_round_trips() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let board = app.create_board(&ada, "Home").await;
    let todo = app.create_todo(&ada, &board, "Buy milk").await;
    let todo_uri = format!("/api/todos/{}", todo["_id"].as_str().unwrap());
    let list_uri = format!("/api/todos/board/{}", board["_id"].as_str().unwrap());

    for status in ["completed", "pending"] {
        let (code, updated) = app
            .put(&todo_uri, &ada.token, json!({ "status": status }))
            .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(updated["status"], status);

        let (_, todos) = app.get(&list_uri, &ada.token).await;
        assert_eq!(todos[0]["status"], status);
    }
}

#[tokio::test]
async fn todo_fields_can_be_set_and_cleared() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let board = app.create_board(&ada, "Home").await;
    let (_, todo) = app
        .post(
            "/api/todos",
            &ada.token,
            json!({
                "boardId": board["_id"],
                "title": "Dentist",
                "description": "Bring forms",
                "status": "in-progress",
                "dueDate": "2025-03-14T09:00:00Z",
            }),
        )
        .await;
    assert_eq!(todo["status"], "in-progress");
    assert_eq!(todo["dueDate"], "2025-03-14T09:00:00Z");

    let todo_uri = format!("/api/todos/{}", todo["_id"].as_str().unwrap());
    let (status, updated) = app
        .put(
            &todo_uri,
            &ada.token,
            json!({ "description": null, "dueDate": null, "board": Uuid::new_v4() }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["dueDate"], Value::Null);
    assert_eq!(updated["title"], "Dentist");
    assert_eq!(updated["board"], board["_id"]);
}

#[tokio::test]
async fn user_listing_spans_boards_with_titles() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let bob = app.register("Bob").await;
    let home = app.create_board(&ada, "Home").await;
    let work = app.create_board(&ada, "Work").await;
    let garage = app.create_board(&bob, "Garage").await;
    app.create_todo(&ada, &home, "Buy milk").await;
    app.create_todo(&ada, &work, "Write report").await;
    app.create_todo(&bob, &garage, "Fix bike").await;

    let (status, todos) = app.get("/api/todos/user", &ada.token).await;

    assert_eq!(status, StatusCode::OK);
    let todos = todos.as_array().unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["title"], "Buy milk");
    assert_eq!(todos[0]["board"]["_id"], home["_id"]);
    assert_eq!(todos[0]["board"]["title"], "Home");
    assert_eq!(todos[1]["title"], "Write report");
    assert_eq!(todos[1]["board"]["title"], "Work");
}

#[tokio::test]
async fn deleting_a_board_removes_its_todos() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let board = app.create_board(&ada, "Home").await;
    let todo = app.create_todo(&ada, &board, "Buy milk").await;
    let board_id = board["_id"].as_str().unwrap();

    let (status, body) = app
        .delete(&format!("/api/boards/{}", board_id), &ada.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": board_id }));

    let (_, todos) = app.get("/api/todos/user", &ada.token).await;
    assert_eq!(todos, json!([]));

    let (status, _) = app
        .delete(
            &format!("/api/todos/{}", todo["_id"].as_str().unwrap()),
            &ada.token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_todo_returns_its_id() {
    let app = TestApp::new();
    let ada = app.register("Ada").await;
    let board = app.create_board(&ada, "Home").await;
    let todo = app.create_todo(&ada, &board, "Buy milk").await;
    let todo_id = todo["_id"].as_str().unwrap();

    let (status, body) = app
        .delete(&format!("/api/todos/{}", todo_id), &ada.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": todo_id }));
}

#[tokio::test]
async fn cors_preflight_allows_the_frontend() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/boards")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}
