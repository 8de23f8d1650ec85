use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub document_path: PathBuf,
    pub gemini_base_url: String,
    pub gemini_api_key: String,
    pub answer_model: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("MINIBOT_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            document_path: env::var("ITINERARY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./itinerary.txt")),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            answer_model: env::var("ANSWER_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
        }
    }
}
