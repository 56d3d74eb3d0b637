use std::sync::Arc;

use tracing::info;

use first_aid_assistant::agent::{AssistantClient, ChatCompletionsClient, ReqwestTransport};
use first_aid_assistant::config::AppConfig;
use first_aid_assistant::notify::AlertQueue;
use first_aid_assistant::routes::{router, AppState};
use first_aid_assistant::service::{ChatService, VoiceService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "first_aid_assistant=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env()?;

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let transport = Arc::new(ReqwestTransport::new()?);
    let client = AssistantClient::new(transport.clone(), config.gemini.clone())
        .with_history_policy(config.history_policy);
    info!(
        model = %config.gemini.model,
        history_policy = ?config.history_policy,
        "Assistant client ready"
    );

    let voice_client = ChatCompletionsClient::new(transport, config.voice.clone());
    let voice = VoiceService::new(Arc::new(voice_client));

    let alerts = Arc::new(AlertQueue::new());
    let chat = ChatService::new(Arc::new(client), alerts.clone());
    let app = router(AppState { chat, voice, alerts });

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
