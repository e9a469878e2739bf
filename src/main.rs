use std::{process, sync::Arc};

use temblor::{
    application::quakes::QuakeService,
    cache::{CacheStore, MemoryStore, RedisStore},
    config,
    infra::{
        error::InfraError,
        http::{self, AppState},
        telemetry,
        upstream::UsgsClient,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &InfraError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), InfraError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| InfraError::configuration(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    let source = Arc::new(UsgsClient::new(&settings.upstream)?);

    let cache: Arc<dyn CacheStore> = if settings.cache.enabled {
        let store = RedisStore::connect(&settings.cache.host, settings.cache.port)
            .map_err(|err| InfraError::cache_store(err.to_string()))?;
        info!(
            host = %settings.cache.host,
            port = settings.cache.port,
            ttl_secs = settings.cache.ttl.as_secs(),
            "using redis response cache"
        );
        Arc::new(store)
    } else {
        info!(
            ttl_secs = settings.cache.ttl.as_secs(),
            "cache disabled, using in-process store"
        );
        Arc::new(MemoryStore::new())
    };

    let quakes = Arc::new(QuakeService::new(source, cache, settings.cache.ttl));
    let router = http::build_router(AppState { quakes });

    let listener = tokio::net::TcpListener::bind(settings.server.addr).await?;
    info!(addr = %settings.server.addr, "listening");

    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
