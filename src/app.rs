use crate::application::{LostItemAnalysisUseCase, ResultCache};
use crate::infrastructure::config::Settings;
use crate::infrastructure::llm_clients::GeminiClient;
use crate::interfaces::http::{start_server, HttpState};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Builds the analysis service from settings and wires it to the HTTP interface.
pub fn build_state(settings: &Settings) -> HttpState {
    let llm_client = Arc::new(GeminiClient::new(settings.request_timeout()));
    let analysis = LostItemAnalysisUseCase::new(
        llm_client,
        settings.llm_config(),
        settings.prompt_language,
    );
    let cache = ResultCache::new(settings.cache_max_entries, settings.cache_ttl_secs);
    HttpState::new(Arc::new(analysis), cache)
}

pub async fn run() -> std::io::Result<()> {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            init_tracing("info");
            error!(error = %err, "Failed to load settings");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
        }
    };
    init_tracing(&settings.log_filter);

    if !settings.has_credential() {
        warn!("GEMINI_API_KEY is not set; analysis requests will be rejected");
    }

    info!(
        host = %settings.http_host,
        port = settings.http_port,
        model = %settings.gemini_model,
        prompt_language = %settings.prompt_language,
        "Starting lacak HTTP server"
    );

    let server = start_server(build_state(&settings), &settings.http_host, settings.http_port)
        .map_err(|err| {
            error!(error = %err, "Failed to bind HTTP server");
            err
        })?;

    server.await
}
