//! Text views over boards and todos
//!
//! Views are plain values implementing [`Display`]; the commands fetch the
//! data and print the view. Dates are shown in UTC.

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::{
    error::{ClientError, ClientResult},
    models::{Board, Todo, TodoStatus, User, UserTodo},
};

/// How many due todos the dashboard lists
pub const UPCOMING_LIMIT: usize = 5;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn marker(status: TodoStatus) -> &'static str {
    match status {
        TodoStatus::Pending => "[ ]",
        TodoStatus::InProgress => "[~]",
        TodoStatus::Completed => "[x]",
    }
}

/// Open todos due at or after `now`, soonest first
pub fn upcoming(todos: &[UserTodo], now: DateTime<Utc>, limit: usize) -> Vec<&UserTodo> {
    let mut due: Vec<&UserTodo> = todos
        .iter()
        .filter(|t| t.status != TodoStatus::Completed)
        .filter(|t| t.due_date.is_some_and(|due| due >= now))
        .collect();
    due.sort_by_key(|t| t.due_date);
    due.truncate(limit);
    due
}

/// The caller's boards and what is coming up next
pub struct Dashboard<'a> {
    pub user: &'a User,
    pub boards: &'a [Board],
    pub todos: &'a [UserTodo],
    pub now: DateTime<Utc>,
}

impl Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Welcome, {}", self.user.name)?;
        writeln!(f)?;
        writeln!(f, "Your Boards")?;
        if self.boards.is_empty() {
            writeln!(f, "  (none yet)")?;
        }
        for board in self.boards {
            let count = self.todos.iter().filter(|t| t.board.id == board.id).count();
            writeln!(
                f,
                "  {}  {}  ({} todos, created {})",
                board.id,
                board.title,
                count,
                board.created_at.format("%Y-%m-%d")
            )?;
        }

        let upcoming = upcoming(self.todos, self.now, UPCOMING_LIMIT);
        if !upcoming.is_empty() {
            writeln!(f)?;
            writeln!(f, "Upcoming")?;
            for todo in upcoming {
                if let Some(due) = todo.due_date {
                    writeln!(
                        f,
                        "  {}  {} {} ({})",
                        due.format("%Y-%m-%d %H:%M"),
                        marker(todo.status),
                        todo.title,
                        todo.board.title
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// One board with its todos
pub struct BoardView<'a> {
    pub board: &'a Board,
    pub todos: &'a [Todo],
}

impl Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board.title)?;
        if self.todos.is_empty() {
            return writeln!(f, "  No todos yet");
        }

        for todo in self.todos {
            write!(f, "  {} {}  {}", marker(todo.status), todo.id, todo.title)?;
            if let Some(due) = todo.due_date {
                write!(f, "  due {}", due.format("%Y-%m-%d %H:%M"))?;
            }
            writeln!(f)?;
            if let Some(description) = &todo.description {
                writeln!(f, "      {}", description)?;
            }
        }
        Ok(())
    }
}

/// A month of todos keyed by due day
#[derive(Debug)]
pub struct CalendarMonth {
    first: NaiveDate,
    days: u32,
    entries: BTreeMap<u32, Vec<UserTodo>>,
}

impl CalendarMonth {
    /// Group the todos due within `year`-`month`; undated todos are skipped
    pub fn new(year: i32, month: u32, todos: &[UserTodo]) -> ClientResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ClientError::InvalidInput(format!("Invalid month: {}-{}", year, month)))?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| ClientError::InvalidInput(format!("Invalid month: {}-{}", year, month)))?;
        let days = next.signed_duration_since(first).num_days() as u32;

        let mut entries: BTreeMap<u32, Vec<UserTodo>> = BTreeMap::new();
        for todo in todos {
            let Some(due) = todo.due_date else { continue };
            if due.year() == year && due.month() == month {
                entries.entry(due.day()).or_default().push(todo.clone());
            }
        }
        for day in entries.values_mut() {
            day.sort_by_key(|t| t.due_date);
        }

        Ok(Self {
            first,
            days,
            entries,
        })
    }

    pub fn days_in_month(&self) -> u32 {
        self.days
    }

    /// Todos due on `day`, earliest first
    pub fn todos_on(&self, day: u32) -> &[UserTodo] {
        self.entries.get(&day).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = MONTH_NAMES[self.first.month0() as usize];
        writeln!(f, "{} {}", name, self.first.year())?;
        writeln!(f, " Su  Mo  Tu  We  Th  Fr  Sa")?;

        let offset = self.first.weekday().num_days_from_sunday();
        for _ in 0..offset {
            write!(f, "    ")?;
        }
        for day in 1..=self.days {
            let flag = if self.entries.contains_key(&day) { '*' } else { ' ' };
            write!(f, "{:>3}{}", day, flag)?;
            if (offset + day) % 7 == 0 {
                writeln!(f)?;
            }
        }
        if (offset + self.days) % 7 != 0 {
            writeln!(f)?;
        }

        for (day, todos) in &self.entries {
            writeln!(f)?;
            writeln!(f, "{} {}", name, day)?;
            for todo in todos {
                if let Some(due) = todo.due_date {
                    writeln!(
                        f,
                        "  {}  {} {} ({})",
                        due.format("%H:%M"),
                        marker(todo.status),
                        todo.title,
                        todo.board.title
                    )?;
                }
            }
        }
        Ok(())
    }
}
