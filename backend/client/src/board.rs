//! # Board
//!
//! Local view of the todo list.
//!
//! The server is the only source of truth. Every successful write is followed
//! by a full [`Board::refresh`] that throws away the local rows and rebuilds
//! them, so the board never patches itself optimistically.
//!
//! ## Local state
//! - Rows: the last fetched todos, each with an `is_editing` flag that only
//!   exists on this side
//! - Draft: the pending text for the next new todo
//!
//! ## Notices
//! Actions return an optional [`Notice`] instead of failing. Error notices
//! carry the server's message when it sent one, otherwise a fixed fallback.
//! A failed call leaves the rows exactly as the last successful fetch left
//! them.
use std::fmt;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::{api::ApiClient, models::Todo};

pub const EMPTY_DRAFT: &str = "Please enter a todo.";
pub const EMPTY_EDIT: &str = "Please enter valid content for the todo.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub todo: Todo,
    pub is_editing: bool,
}

pub struct Board {
    api: ApiClient,
    rows: Vec<Row>,
    draft: String,
}

impl Board {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rows: Vec::new(),
            draft: String::new(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn editing(&self) -> Option<&Row> {
        self.rows.iter().find(|row| row.is_editing)
    }

    /// Row index for a 1-based position or a full id.
    pub fn position(&self, target: &str) -> Option<usize> {
        if let Ok(number) = target.parse::<usize>() {
            return number.checked_sub(1).filter(|&index| index < self.rows.len());
        }

        self.rows.iter().position(|row| row.todo.id == target)
    }

    pub async fn load(&mut self) -> Option<Notice> {
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Option<Notice> {
        match self.api.list().await {
            Ok(todos) => {
                self.rows = todos
                    .into_iter()
                    .map(|todo| Row {
                        todo,
                        is_editing: false,
                    })
                    .collect();
                None
            }
            Err(e) => {
                warn!("Refresh failed: {e}");
                Some(Notice::Error(e.user_message("Error fetching todos")))
            }
        }
    }

    pub async fn add(&mut self) -> Option<Notice> {
        if self.draft.trim().is_empty() {
            return Some(Notice::Error(EMPTY_DRAFT.to_string()));
        }

        match self.api.create(&self.draft).await {
            Ok(todo) => {
                info!(id = %todo.id, "Added todo");
                self.draft.clear();
                self.refresh().await
            }
            Err(e) => Some(Notice::Error(e.user_message("Error adding todo"))),
        }
    }

    /// Opens the row at `index` for editing and closes every other row.
    /// Toggling the open row closes it.
    pub fn toggle_editing(&mut self, index: usize) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.is_editing = if i == index { !row.is_editing } else { false };
        }
    }

    pub async fn save_edit(&mut self, id: &str, content: &str) -> Option<Notice> {
        if content.trim().is_empty() {
            return Some(Notice::Error(EMPTY_EDIT.to_string()));
        }

        match self.api.update(id, content).await {
            Ok(_) => self.refresh().await,
            Err(e) => Some(Notice::Error(e.user_message("Error updating todo"))),
        }
    }

    pub async fn delete(&mut self, id: &str) -> Option<Notice> {
        match self.api.delete(id).await {
            Ok(_) => self
                .refresh()
                .await
                .or_else(|| Some(Notice::Success("Todo deleted successfully".to_string()))),
            Err(e) => Some(Notice::Error(e.user_message("Error deleting todo"))),
        }
    }

    /// Deletes every known row concurrently, then refreshes once. Nothing is
    /// rolled back when only some deletes succeed.
    pub async fn clear_all(&mut self) -> Option<Notice> {
        let mut deletes = JoinSet::new();

        for row in &self.rows {
            let api = self.api.clone();
            let id = row.todo.id.clone();

            deletes.spawn(async move { api.delete(&id).await });
        }

        let mut failed = 0usize;
        while let Some(result) = deletes.join_next().await {
            match result {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    warn!("Delete during clear failed: {e}");
                    failed += 1;
                }
                Err(e) => {
                    warn!("Delete task failed: {e}");
                    failed += 1;
                }
            }
        }

        let refreshed = self.refresh().await;

        if failed > 0 {
            return Some(Notice::Error("Error clearing todos".to_string()));
        }

        refreshed.or_else(|| Some(Notice::Success("All todos cleared successfully".to_string())))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            let marker = if row.is_editing { "*" } else { " " };

            writeln!(f, "{marker}{:>3}. {}  [{}]", i + 1, row.todo.content, row.todo.id)?;
        }

        writeln!(f, "{} tasks left", self.remaining())
    }
}
