// server module public api

pub mod app;
pub mod handlers;
pub mod middleware;
pub mod render;

pub use app::{create_app, create_app_with_store, start_server};
