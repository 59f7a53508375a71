pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod formatter;
pub mod llm;
pub mod model;
pub mod prediction;
pub mod server;
pub mod validation;

pub use error::{Error, Result};
