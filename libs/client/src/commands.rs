//! Command execution
//!
//! Each command returns the text to print. Commands that touch protected
//! routes first validate the stored session against `/auth/me`.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::info;

use crate::{
    api_client::ApiClient,
    cli::{AddTodo, BoardCommand, Cli, Command, TodoCommand, UpdateTodo},
    error::{ClientError, ClientResult},
    models::{AuthResponse, NewTodo, TodoUpdate},
    session::{Session, SessionStore},
    views::{BoardView, CalendarMonth, Dashboard},
};

pub async fn run(cli: Cli, store: &SessionStore) -> ClientResult<String> {
    match cli.command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let client = ApiClient::new(cli.url);
            let auth = client.register(&name, &email, &password).await?;
            start_session(store, &client, auth, "Registered")
        }
        Command::Login { email, password } => {
            let client = ApiClient::new(cli.url);
            let auth = client.login(&email, &password).await?;
            start_session(store, &client, auth, "Logged in")
        }
        Command::Logout => {
            store.clear()?;
            Ok("Logged out".to_string())
        }
        Command::Whoami => {
            let (session, _) = open_session(store).await?;
            Ok(format!(
                "{} <{}> on {}",
                session.user.name, session.user.email, session.base_url
            ))
        }
        Command::Dashboard => {
            let (session, client) = open_session(store).await?;
            let boards = client.list_boards().await?;
            let todos = client.list_todos_for_user().await?;
            Ok(Dashboard {
                user: &session.user,
                boards: &boards,
                todos: &todos,
                now: Utc::now(),
            }
            .to_string())
        }
        Command::Boards(command) => {
            let (_, client) = open_session(store).await?;
            run_board_command(&client, command).await
        }
        Command::Todos(command) => {
            let (_, client) = open_session(store).await?;
            run_todo_command(&client, command).await
        }
        Command::Calendar { month } => {
            let (year, month) = match month {
                Some(month) => parse_month(&month)?,
                None => {
                    let today = Utc::now().date_naive();
                    (today.year(), today.month())
                }
            };
            let (_, client) = open_session(store).await?;
            let todos = client.list_todos_for_user().await?;
            Ok(CalendarMonth::new(year, month, &todos)?.to_string())
        }
    }
}

/// Load the stored session and confirm the server still accepts it
///
/// A rejected token removes the session file.
pub async fn open_session(store: &SessionStore) -> ClientResult<(Session, ApiClient)> {
    let session = store.load()?.ok_or(ClientError::NotLoggedIn)?;
    let client = ApiClient::from_session(&session);

    match client.me().await {
        Ok(_) => Ok((session, client)),
        Err(e) if e.is_unauthorized() => {
            store.clear()?;
            Err(ClientError::SessionExpired)
        }
        Err(e) => Err(e),
    }
}

fn start_session(
    store: &SessionStore,
    client: &ApiClient,
    auth: AuthResponse,
    verb: &str,
) -> ClientResult<String> {
    let session = Session {
        base_url: client.base_url().to_string(),
        token: auth.token,
        user: auth.user,
    };
    store.save(&session)?;
    info!("Session stored at {}", store.path().display());

    Ok(format!(
        "{} as {} <{}>",
        verb, session.user.name, session.user.email
    ))
}

async fn run_board_command(client: &ApiClient, command: BoardCommand) -> ClientResult<String> {
    match command {
        BoardCommand::List => {
            let boards = client.list_boards().await?;
            if boards.is_empty() {
                return Ok("No boards yet".to_string());
            }
            Ok(boards
                .iter()
                .map(|b| format!("{}  {}", b.id, b.title))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        BoardCommand::Create { title } => {
            let board = client.create_board(&title).await?;
            Ok(format!("Created board {}  {}", board.id, board.title))
        }
        BoardCommand::Rename { id, title } => {
            let board = client.update_board(id, &title).await?;
            Ok(format!("Renamed board {} to {}", board.id, board.title))
        }
        BoardCommand::Delete { id } => {
            let id = client.delete_board(id).await?;
            Ok(format!("Deleted board {}", id))
        }
    }
}

async fn run_todo_command(client: &ApiClient, command: TodoCommand) -> ClientResult<String> {
    match command {
        TodoCommand::List { board } => {
            let boards = client.list_boards().await?;
            let board = boards
                .iter()
                .find(|b| b.id == board)
                .ok_or_else(|| ClientError::InvalidInput(format!("No board with id {}", board)))?;
            let todos = client.list_todos_for_board(board.id).await?;
            Ok(BoardView {
                board,
                todos: &todos,
            }
            .to_string())
        }
        TodoCommand::Add(add) => {
            let todo = client.create_todo(&new_todo(add)?).await?;
            Ok(format!("Added todo {}  {}", todo.id, todo.title))
        }
        TodoCommand::Toggle { id } => {
            let todos = client.list_todos_for_user().await?;
            let current = todos
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| ClientError::InvalidInput(format!("No todo with id {}", id)))?;

            let update = TodoUpdate {
                status: Some(current.status.toggled()),
                ..TodoUpdate::default()
            };
            let todo = client.update_todo(id, &update).await?;
            Ok(format!("{} is now {}", todo.title, todo.status))
        }
        TodoCommand::Update(update) => {
            let id = update.id;
            let update = todo_update(update)?;
            let todo = client.update_todo(id, &update).await?;
            Ok(format!("Updated todo {}  {} ({})", todo.id, todo.title, todo.status))
        }
        TodoCommand::Delete { id } => {
            let id = client.delete_todo(id).await?;
            Ok(format!("Deleted todo {}", id))
        }
    }
}

fn new_todo(add: AddTodo) -> ClientResult<NewTodo> {
    Ok(NewTodo {
        board_id: add.board,
        title: add.title,
        description: add.description,
        status: add.status,
        due_date: add.due.as_deref().map(parse_due).transpose()?,
    })
}

fn todo_update(update: UpdateTodo) -> ClientResult<TodoUpdate> {
    let description = if update.clear_description {
        Some(None)
    } else {
        update.description.map(Some)
    };
    let due_date = if update.clear_due {
        Some(None)
    } else {
        update.due.as_deref().map(parse_due).transpose()?.map(Some)
    };

    let update = TodoUpdate {
        title: update.title,
        description,
        status: update.status,
        due_date,
    };
    if update.is_empty() {
        return Err(ClientError::InvalidInput("Nothing to update".to_string()));
    }
    Ok(update)
}

/// RFC 3339 timestamp, or a bare date taken as midnight UTC
pub fn parse_due(value: &str) -> ClientResult<DateTime<Utc>> {
    if let Ok(when) = DateTime::parse_from_rfc3339(value) {
        return Ok(when.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| ClientError::InvalidInput(format!("Invalid due date: {}", value)))
}

/// `YYYY-MM` into (year, month)
pub fn parse_month(value: &str) -> ClientResult<(i32, u32)> {
    let invalid = || ClientError::InvalidInput(format!("Invalid month: {} (expected YYYY-MM)", value));

    let (year, month) = value.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
