//! HTTP backend of the Entropy Gaming dashboard: org chart, forum and ticket
//! transcripts behind JWT authentication.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;

pub use config::Config;
pub use db::DbPool;
