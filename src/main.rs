use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;

use morning_assist::agent::Agent;
use morning_assist::channels::{ChannelManager, CliChannel, WebChannel};
use morning_assist::config::AssistantConfig;
use morning_assist::conversation::{SessionRouteState, SessionStore, session_routes};
use morning_assist::dialogue::{DialogueController, Welcome};
use morning_assist::error::ConfigError;
use morning_assist::llm::{CompletionAdapter, LlmConfig, create_provider};
use morning_assist::search::{DuckDuckGo, SearchAdapter, SearchConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let llm_config = LlmConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        if let ConfigError::MissingEnvVar(key) = &e {
            eprintln!("  export {}=...", key);
        }
        std::process::exit(1);
    });
    let config = AssistantConfig::from_env()?;

    eprintln!("🌅 Morning Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", llm_config.model);
    eprintln!("   Search results: {}", config.max_results);
    if config.web_enabled {
        eprintln!("   Chat WS: ws://0.0.0.0:{}/ws/chat", config.ws_port);
        eprintln!("   Session API: http://0.0.0.0:{}/api/sessions/{{id}}", config.ws_port);
    } else {
        eprintln!("   Web channel: disabled");
    }
    eprintln!("   Type a message and press Enter. /help for commands, /quit to exit.\n");

    // ── Providers ───────────────────────────────────────────────────────
    let llm = create_provider(&llm_config)?;
    let search = DuckDuckGo::new(SearchConfig::from_env()).context("Failed to create search client")?;

    let controller = DialogueController::new(
        CompletionAdapter::new(llm),
        SearchAdapter::new(Arc::new(search)),
    )
    .with_max_results(config.max_results)
    .with_history_window(config.history_window);

    let sessions = Arc::new(SessionStore::new());
    let welcome = Welcome::default();

    // ── Channels ────────────────────────────────────────────────────────
    let mut channels = ChannelManager::new();
    channels.add(Box::new(CliChannel::new(welcome.clone())));

    if config.web_enabled {
        let web_channel = WebChannel::new(welcome.clone(), Arc::clone(&sessions));
        let app = web_channel
            .router()
            .merge(session_routes(SessionRouteState {
                store: Arc::clone(&sessions),
                welcome: welcome.clone(),
            }))
            .layer(CorsLayer::permissive());

        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.ws_port))
            .await
            .with_context(|| format!("Failed to bind web chat port {}", config.ws_port))?;
        let port = config.ws_port;
        tokio::spawn(async move {
            tracing::info!(port, "Web chat server started");
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Web chat server stopped");
            }
        });

        channels.add(Box::new(web_channel));
    }

    eprintln!("   Channels: {}\n", channels.names().join(", "));

    let agent = Agent::new(config, controller, channels, sessions).with_welcome(welcome);
    agent.run().await?;

    Ok(())
}
