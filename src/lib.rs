pub mod chat;
pub mod config;
pub mod gemini;
pub mod grounding;
pub mod matcher;
pub mod models;
pub mod sections;
pub mod server;
pub mod sessions;
pub mod tags;

pub use config::AppConfig;
pub use server::run_server;
