pub mod api;
pub mod forum;
pub mod models;
pub mod orgchart;
pub mod transcript;

pub use models::*;
