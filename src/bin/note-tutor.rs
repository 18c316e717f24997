//! HTTP server binary for note-tutor.
//!
//! A thin shim over the library crate that maps flags and environment
//! variables to `ServiceConfig` and serves the router.

use anyhow::{Context, Result};
use clap::Parser;
use note_tutor::{router, AppState, LlmGenerator, ServiceConfig};
use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default port (5042), resolving relative refs against the notes API
  API_URL=http://localhost:8080 GEMINI_API_KEY=... note-tutor

  # Different port and model
  note-tutor --port 6000 --model gemini-2.5-flash

  # Explicit pdfium library
  note-tutor --pdfium-lib-path /opt/pdfium/lib/libpdfium.so

ENVIRONMENT:
  A .env file in the working directory is loaded before flags are parsed.
  GEMINI_API_KEY   Credential for the default provider
  RUST_LOG         Overrides the log filter (e.g. note_tutor=debug)
"#;

#[derive(Parser, Debug)]
#[command(
    name = "note-tutor",
    version,
    about = "Summarise lecture notes and generate quizzes with a vision LLM",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Base URL prepended to references that start with `/`.
    #[arg(long, env = "API_URL", default_value = "")]
    api_url: String,

    /// Port to listen on.
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 5042)]
    port: u16,

    /// Address to bind.
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER", default_value = "gemini")]
    provider: String,

    /// LLM model ID.
    #[arg(long, env = "EDGEQUAKE_MODEL", default_value = "gemini-2.0-flash")]
    model: String,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "NOTE_TUTOR_TEMPERATURE", default_value_t = 0.4)]
    temperature: f32,

    /// Maximum output tokens per model call.
    #[arg(long, env = "NOTE_TUTOR_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// Download timeout in seconds (default: none).
    #[arg(long, env = "NOTE_TUTOR_DOWNLOAD_TIMEOUT")]
    download_timeout: Option<u64>,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib_path: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, env = "NOTE_TUTOR_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Config ───────────────────────────────────────────────────────────
    let config = ServiceConfig::builder()
        .base_url(cli.api_url)
        .port(cli.port)
        .bind_address(cli.bind)
        .provider_name(cli.provider)
        .model(cli.model)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .download_timeout_secs(cli.download_timeout)
        .pdfium_lib_path(cli.pdfium_lib_path)
        .build()
        .context("Invalid configuration")?;

    if config.base_url.is_empty() {
        tracing::warn!("API_URL is not set; relative asset references will not resolve");
    }
    tracing::info!("{:?}", config);

    // ── Provider ─────────────────────────────────────────────────────────
    let generator =
        LlmGenerator::from_config(&config).context("Failed to initialise the LLM provider")?;

    // ── Serve ────────────────────────────────────────────────────────────
    let addr = config.socket_addr();
    let state = AppState::new(config, Arc::new(generator)).context("Failed to build app state")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
