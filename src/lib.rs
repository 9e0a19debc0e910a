//! Multi-user to-do list backend: users own lists, lists contain to-do items,
//! and every operation is scoped to the authenticated owner. This crate holds
//! the domain models, the service layer with the ownership-authorization
//! rules, session-token authentication, the error taxonomy, and the HTTP
//! routing used by the `main` binary.

pub mod auth;
pub mod config;
pub mod error;
pub mod mailer;
pub mod models;
pub mod response;
pub mod routes;
pub mod security;
pub mod services;
