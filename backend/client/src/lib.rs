//! # Todo Client
//!
//! Client side of the todo service.
//!
//! - [`api::ApiClient`]: one call per endpoint, errors carry the server's
//!   `message` when present
//! - [`board::Board`]: the list as a user sees it, with the add, edit, delete
//!   and clear-all flows layered on top of the API
//!
//! The `todo-cli` binary drives a [`board::Board`] from the command line.
//!
//! ```sh
//! todo-cli --url http://localhost:3000 add "buy milk"
//! todo-cli edit 1 "buy oat milk"
//! todo-cli delete 1
//! todo-cli clear
//! ```
pub mod api;
pub mod board;
pub mod error;
pub mod models;
