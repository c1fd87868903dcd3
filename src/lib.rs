//! Interactive console client for a local model server: list installed
//! models, chat with one while logging the transcript, or derive a new model
//! with custom sampling parameters.

pub mod catalog;
pub mod chat;
pub mod client;
pub mod config;
pub mod console;
pub mod derive;
pub mod error;
pub mod menu;

pub use catalog::ModelSummary;
pub use client::OllamaClient;
pub use config::Settings;
pub use menu::MenuController;
