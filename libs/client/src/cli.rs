//! Command-line interface definition

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::{api_client::DEFAULT_BASE_URL, models::TodoStatus};

#[derive(Debug, Parser)]
#[command(name = "taskmaster")]
#[command(about = "Boards and todos from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// API root used by register and login
    #[arg(long, env = "TASKMASTER_URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and log in
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Log in and remember the session
    Login { email: String, password: String },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Boards overview with upcoming due todos
    Dashboard,
    /// Manage boards
    #[command(subcommand)]
    Boards(BoardCommand),
    /// Manage todos
    #[command(subcommand)]
    Todos(TodoCommand),
    /// Todos of one month by due day
    Calendar {
        /// Month as YYYY-MM (default: current month)
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum BoardCommand {
    List,
    Create { title: String },
    Rename { id: Uuid, title: String },
    /// Delete a board and all of its todos
    Delete { id: Uuid },
}

#[derive(Debug, Subcommand)]
pub enum TodoCommand {
    /// Show one board and its todos
    List { board: Uuid },
    Add(AddTodo),
    /// Flip between completed and pending
    Toggle { id: Uuid },
    Update(UpdateTodo),
    Delete { id: Uuid },
}

#[derive(Debug, Args)]
pub struct AddTodo {
    pub board: Uuid,
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD (midnight UTC)
    #[arg(long, value_name = "WHEN")]
    pub due: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TodoStatus>,
}

#[derive(Debug, Args)]
pub struct UpdateTodo {
    pub id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TodoStatus>,
    #[arg(long, value_name = "WHEN", conflicts_with = "clear_due")]
    pub due: Option<String>,
    #[arg(long)]
    pub clear_due: bool,
}

fn parse_status(value: &str) -> Result<TodoStatus, String> {
    match value {
        "pending" => Ok(TodoStatus::Pending),
        "in-progress" => Ok(TodoStatus::InProgress),
        "completed" => Ok(TodoStatus::Completed),
        other => Err(format!(
            "unknown status '{}' (expected pending, in-progress or completed)",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_todo_update_flags() {
        let id = Uuid::new_v4();
        let id_arg = id.to_string();
        let cli = Cli::try_parse_from([
            "taskmaster",
            "--url",
            "http://example.com/api",
            "todos",
            "update",
            id_arg.as_str(),
            "--status",
            "in-progress",
            "--clear-due",
        ])
        .unwrap();

        assert_eq!(cli.url, "http://example.com/api");
        let Command::Todos(TodoCommand::Update(update)) = cli.command else {
            panic!("parsed the wrong command");
        };
        assert_eq!(update.id, id);
        assert_eq!(update.status, Some(TodoStatus::InProgress));
        assert!(update.clear_due);
        assert!(!update.clear_description);
    }

    #[test]
    fn rejects_unknown_status() {
        let board = Uuid::new_v4().to_string();
        let result = Cli::try_parse_from([
            "taskmaster",
            "todos",
            "add",
            board.as_str(),
            "Buy milk",
            "--status",
            "done",
        ]);
        assert!(result.is_err());
    }
}
