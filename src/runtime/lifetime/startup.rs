use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::ScoringService;
use crate::storage::Storage;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub scoring: Arc<ScoringService>,
}

/// 根据配置构建存储和计分引擎
pub async fn build_context(config: &AppConfig) -> Result<StartupContext> {
    let storage = crate::storage::create_storage(config).await?;
    warn!("Storage backend initialized and migrations completed");

    if config.cache_enabled() {
        debug!(
            "Read cache enabled: {} (ttl {}s, capacity {})",
            config.cache.cache_type, config.cache.default_ttl, config.cache.memory.max_capacity
        );
    }

    let scoring = Arc::new(ScoringService::new(storage.clone(), &config.scoring));
    warn!(
        "Scoring engine initialized (background recompute: {})",
        scoring.background_enabled()
    );

    Ok(StartupContext { storage, scoring })
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> StartupContext {
    build_context(AppConfig::get())
        .await
        .expect("Failed to create storage backend")
}
