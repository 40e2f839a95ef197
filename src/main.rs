use actix_web::{web, App, HttpServer};
use book_cache::backend::InMemoryBackend;
use book_cache::notify::InMemorySink;
use book_cache::observability::{LogMetrics, TtlPolicy};
use book_cache::repository::InMemoryRepository;
use book_cache::{
    http, AppConfig, BookRepository, BookService, CacheBackend, CacheExpander, Error,
    NotificationSink, Result,
};
use log::{error, info};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting book-cache v{}", book_cache::VERSION);

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    run(config).await.map_err(|e| {
        error!("Server failed: {}", e);
        std::io::Error::other(e.to_string())
    })
}

// ============================================================================
// Dependency Injection - pick each collaborator from the configuration
// ============================================================================

#[cfg(feature = "postgres")]
async fn run(config: AppConfig) -> Result<()> {
    use book_cache::repository::PgBookRepository;

    match config.database_url.clone() {
        Some(url) => {
            info!("📦 Connecting to PostgreSQL...");
            let repo = PgBookRepository::connect(&url, config.database_max_connections).await?;
            with_cache(config, Arc::new(repo)).await
        }
        None => {
            info!("DATABASE_URL not set, using in-memory store");
            with_cache(config, Arc::new(InMemoryRepository::new())).await
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn run(config: AppConfig) -> Result<()> {
    if config.database_url.is_some() {
        log::warn!("DATABASE_URL ignored: built without the `postgres` feature");
    }
    with_cache(config, Arc::new(InMemoryRepository::new())).await
}

#[cfg(feature = "redis")]
async fn with_cache<R>(config: AppConfig, repo: Arc<R>) -> Result<()>
where
    R: BookRepository + 'static,
{
    use book_cache::backend::RedisBackend;
    use book_cache::notify::RedisSink;

    match config.redis_url.clone() {
        Some(url) => {
            let backend = RedisBackend::from_connection_string(&url, config.redis_pool_size)?;
            // Cache and PUBLISH share one pool.
            let sink = RedisSink::new(backend.pool().clone());
            info!("✓ Redis cache backend and notification sink configured");
            serve(config, repo, backend, Arc::new(sink)).await
        }
        None => {
            info!("REDIS_URL not set, using in-memory cache and notification log");
            serve_inmemory(config, repo).await
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn with_cache<R>(config: AppConfig, repo: Arc<R>) -> Result<()>
where
    R: BookRepository + 'static,
{
    if config.redis_url.is_some() {
        log::warn!("REDIS_URL ignored: built without the `redis` feature");
    }
    serve_inmemory(config, repo).await
}

async fn serve_inmemory<R>(config: AppConfig, repo: Arc<R>) -> Result<()>
where
    R: BookRepository + 'static,
{
    let backend = InMemoryBackend::new();
    let sweeper = backend.spawn_sweeper(config.cache_ttl);

    let result = serve(config, repo, backend, Arc::new(InMemorySink::new())).await;
    sweeper.abort();
    result
}

// ============================================================================
// Server
// ============================================================================

async fn serve<R, B, N>(config: AppConfig, repo: Arc<R>, backend: B, sink: Arc<N>) -> Result<()>
where
    R: BookRepository + 'static,
    B: CacheBackend + 'static,
    N: NotificationSink + 'static,
{
    let cache = CacheExpander::new(backend)
        .with_metrics(Box::new(LogMetrics))
        .with_ttl_policy(TtlPolicy::Fixed(config.cache_ttl));
    let service = BookService::new(repo, cache, sink).with_topic(config.notify_topic.clone());
    let data = web::Data::new(service);

    let bind_address = config.bind_address();
    info!("🚀 Starting server at http://{}", bind_address);
    info!(
        "   cache TTL {:?}, notifications on '{}'",
        config.cache_ttl, config.notify_topic
    );

    // actix installs SIGINT/SIGTERM handlers and drains workers before returning.
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(http::configure::<R, B, N>)
    })
    .bind(&bind_address)
    .map_err(|e| Error::ConfigError(format!("Failed to bind {}: {}", bind_address, e)))?
    .run()
    .await?;

    info!("Server shut down gracefully");
    Ok(())
}
