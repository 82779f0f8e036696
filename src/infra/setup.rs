use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    data_store::DataStore,
    infra::{config::AppConfig, error::InfraError},
    ports::resource_client::ResourceClient,
    use_cases::web_config::WebConfigUseCases,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<DataStore>,
    pub web_config_use_cases: Arc<WebConfigUseCases>,
}

pub fn init_app_state(config: AppConfig, client: Arc<dyn ResourceClient>) -> AppState {
    let store = Arc::new(DataStore::with_cache(client, config.resolve_cache));
    let web_config_use_cases = WebConfigUseCases::new(store.clone());

    info!(
        api_base_url = %config.api_base_url,
        resolve_cache = config.resolve_cache,
        "web config accessor ready"
    );

    AppState {
        config: Arc::new(config),
        store,
        web_config_use_cases: Arc::new(web_config_use_cases),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &AppConfig) -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "webconfig=debug".into());

    // Exactly one of the two layers is active
    let (json_layer, console_layer) = if config.log_json {
        let json = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true);
        (Some(json), None)
    } else {
        let console = fmt::layer().with_target(false).with_level(true).pretty();
        (None, Some(console))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(console_layer)
        .try_init()
        .map_err(InfraError::Tracing)
}
