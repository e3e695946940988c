pub mod auth;
pub mod chat;
pub mod classifier;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod server;

pub use error::{Error, Result};
