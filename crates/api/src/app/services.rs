use std::sync::Arc;

use anyhow::Context;

use marketstat_infra::{
    cache::{InMemoryResponseCache, RedisResponseCache, ResponseCache},
    config::AppConfig,
    db::{SqliteStore, Store},
    jobs::{ReportDispatcher, ReportPipeline},
    mail::{Mailer, SmtpMailer},
    statistics::Aggregator,
};
use marketstat_reporting::{Clock, Reporter, SystemClock};

/// Everything a handler needs, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn Store>,
    pub cache: Arc<dyn ResponseCache>,
    pub dispatcher: ReportDispatcher,
    pub cache_prefix: String,
}

impl AppServices {
    /// Wire services from explicit parts (tests swap in in-memory pieces here).
    pub fn new(
        store: Arc<dyn Store>,
        cache: Arc<dyn ResponseCache>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        cache_prefix: impl Into<String>,
    ) -> Self {
        // The report pipeline holds its own store handle; it never borrows
        // anything from the request that scheduled it.
        let pipeline = ReportPipeline::new(
            Aggregator::new(store.clone(), clock.clone()),
            Reporter::new(clock),
            mailer,
        );

        Self {
            store,
            cache,
            dispatcher: ReportDispatcher::new(pipeline),
            cache_prefix: cache_prefix.into(),
        }
    }

    /// Production wiring: SQLite store, Redis cache (in-memory fallback), SMTP.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = SqliteStore::connect(&config.database_url)
            .await
            .with_context(|| format!("failed to open database {}", config.database_url))?;
        tracing::info!(database_url = %config.database_url, "database ready");

        let cache = build_cache(config).await;
        let mailer = Arc::new(SmtpMailer::new(config.smtp.clone()));

        Ok(Self::new(
            Arc::new(store),
            cache,
            mailer,
            Arc::new(SystemClock),
            config.cache_prefix.clone(),
        ))
    }
}

async fn build_cache(config: &AppConfig) -> Arc<dyn ResponseCache> {
    match RedisResponseCache::connect(&config.redis_url).await {
        Ok(cache) => {
            tracing::info!(redis_url = %config.redis_url, "response cache backed by redis");
            Arc::new(cache)
        }
        Err(e) => {
            tracing::warn!(
                redis_url = %config.redis_url,
                error = %e,
                "redis unavailable; falling back to in-memory response cache"
            );
            Arc::new(InMemoryResponseCache::new())
        }
    }
}
