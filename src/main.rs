use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use minibot::chat::ChatService;
use minibot::gemini::GeminiClient;
use minibot::sections::SectionStore;
use minibot::sessions::SessionStore;
use minibot::tags::TagIndex;
use minibot::{run_server, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env();

    let sections = Arc::new(SectionStore::load(&config.document_path).await?);
    tracing::info!(
        "loaded {} itinerary sections from {}",
        sections.len(),
        config.document_path.display()
    );

    let tags = Arc::new(TagIndex::new());
    let gemini = GeminiClient::new(
        config.gemini_base_url.clone(),
        config.gemini_api_key.clone(),
    );
    let sessions = SessionStore::new();

    let chat = ChatService::new(
        config.clone(),
        sections,
        tags,
        gemini,
        sessions.clone(),
    );

    run_server(config, chat, sessions).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
