use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::clients::fetcher::{HttpFetcher, PageFetcher};
use crate::clients::openai::{LlmClient, OpenAiClient};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AgendaService, ChatService, Clock, HashtagAcquirer, HashtagCacheManager, HashtagCacheStore,
    HashtagGenerator, SeaOrmAgendaService, SeaOrmChatService, SystemClock,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("SocialMate/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// External collaborators of the pipeline. Swapped for stubs in tests.
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn PageFetcher>,
    pub llm: Arc<dyn LlmClient>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.llm.request_timeout_seconds)?;

        let fetcher = Arc::new(HttpFetcher::with_shared_client(http_client.clone()));
        let llm = Arc::new(OpenAiClient::new(
            http_client,
            config.llm.resolved_api_key(),
            &config.llm.base_url,
            &config.llm.chat_model,
            Duration::from_secs(config.llm.request_timeout_seconds),
        ));

        Ok(Self {
            fetcher,
            llm,
            clock: Arc::new(SystemClock),
        })
    }
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub hashtags: Arc<HashtagCacheManager>,

    pub chat_service: Arc<dyn ChatService>,

    pub agenda_service: Arc<dyn AgendaService>,

    pub llm_configured: bool,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let collaborators = Collaborators::from_config(&config)?;
        let llm_configured = config.llm.resolved_api_key().is_some();
        let mut state = Self::with_collaborators(config, collaborators).await?;
        state.llm_configured = llm_configured;
        Ok(state)
    }

    pub async fn with_collaborators(
        config: Config,
        collaborators: Collaborators,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let Collaborators {
            fetcher,
            llm,
            clock,
        } = collaborators;

        let generator = HashtagGenerator::new(llm.clone(), &config.llm);
        let acquirer = Arc::new(HashtagAcquirer::with_default_sources(
            &config.hashtags,
            &fetcher,
            generator,
        ));

        let cache_store: Arc<dyn HashtagCacheStore> = Arc::new(store.clone());
        let hashtags = Arc::new(HashtagCacheManager::new(
            cache_store,
            acquirer,
            clock.clone(),
            config.hashtags.clone(),
        ));

        let chat_service = Arc::new(SeaOrmChatService::new(
            store.clone(),
            llm,
            clock.clone(),
            &config.llm,
        )) as Arc<dyn ChatService + Send + Sync + 'static>;

        let agenda_service = Arc::new(SeaOrmAgendaService::new(store.clone(), clock))
            as Arc<dyn AgendaService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            hashtags,
            chat_service,
            agenda_service,
            llm_configured: true,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
