//! Typed client for the TaskMaster REST API

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{ClientError, ClientResult},
    models::{AuthResponse, Board, Deleted, NewTodo, Todo, TodoUpdate, User, UserTodo},
    session::Session,
};

/// Default API root, including the `/api` prefix
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Anonymous client, able to register and log in
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Client authenticated with the session's token
    pub fn from_session(session: &Session) -> Self {
        Self::new(session.base_url.clone()).with_token(session.token.clone())
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = json!({ "name": name, "email": email, "password": password });
        self.send(self.http.post(self.url("/auth/register")).json(&body))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = json!({ "email": email, "password": password });
        self.send(self.http.post(self.url("/auth/login")).json(&body))
            .await
    }

    /// The user behind the current token
    pub async fn me(&self) -> ClientResult<User> {
        self.send(self.authed(self.http.get(self.url("/auth/me"))))
            .await
    }

    pub async fn list_boards(&self) -> ClientResult<Vec<Board>> {
        self.send(self.authed(self.http.get(self.url("/boards"))))
            .await
    }

    pub async fn create_board(&self, title: &str) -> ClientResult<Board> {
        let body = json!({ "title": title });
        self.send(self.authed(self.http.post(self.url("/boards")).json(&body)))
            .await
    }

    pub async fn update_board(&self, id: Uuid, title: &str) -> ClientResult<Board> {
        let body = json!({ "title": title });
        let url = self.url(&format!("/boards/{}", id));
        self.send(self.authed(self.http.put(url).json(&body))).await
    }

    pub async fn delete_board(&self, id: Uuid) -> ClientResult<Uuid> {
        let url = self.url(&format!("/boards/{}", id));
        let deleted: Deleted = self.send(self.authed(self.http.delete(url))).await?;
        Ok(deleted.id)
    }

    pub async fn list_todos_for_board(&self, board: Uuid) -> ClientResult<Vec<Todo>> {
        let url = self.url(&format!("/todos/board/{}", board));
        self.send(self.authed(self.http.get(url))).await
    }

    pub async fn list_todos_for_user(&self) -> ClientResult<Vec<UserTodo>> {
        self.send(self.authed(self.http.get(self.url("/todos/user"))))
            .await
    }

    pub async fn create_todo(&self, todo: &NewTodo) -> ClientResult<Todo> {
        self.send(self.authed(self.http.post(self.url("/todos")).json(todo)))
            .await
    }

    pub async fn update_todo(&self, id: Uuid, update: &TodoUpdate) -> ClientResult<Todo> {
        let url = self.url(&format!("/todos/{}", id));
        self.send(self.authed(self.http.put(url).json(update))).await
    }

    pub async fn delete_todo(&self, id: Uuid) -> ClientResult<Uuid> {
        let url = self.url(&format!("/todos/{}", id));
        let deleted: Deleted = self.send(self.authed(self.http.delete(url))).await?;
        Ok(deleted.id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        debug!("{} {}", response.status(), response.url());
        parse(response).await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        });

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
