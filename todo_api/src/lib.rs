//! Paged CRUD API for todos.
//!
//! Every endpoint answers with the same [`AppResponse`] envelope; listings add
//! a [`PageMeta`](pagination::PageMeta) with navigation links. Storage goes
//! through the [`TodoRepository`] trait, implemented over Sea-ORM by
//! [`TodoService`], one transaction per call.

pub mod config;
pub mod core;
pub mod entity;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod openapi;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod server;
pub mod validation;

pub use crate::core::{TodoRepository, TodoService};
pub use errors::ApiError;
pub use response::{AppResponse, Envelope};
pub use routes::{AppState, router};
