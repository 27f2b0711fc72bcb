#![forbid(unsafe_code)]

pub mod app;
mod assets;
pub mod config;
pub mod demo;
mod error;
mod handlers;
pub mod import;
pub mod logging;
mod pages;

pub use app::{AppState, build_router, serve, shutdown_signal};
pub use error::ApiError;
