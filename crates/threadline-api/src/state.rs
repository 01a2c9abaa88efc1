//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the REST API. Services are generic over repository and issuer traits;
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use threadline_core::chat::orchestrator::{TurnOrchestrator, TurnSettings};
use threadline_core::chat::service::ConversationService;
use threadline_core::llm::credentials::CredentialLookup;
use threadline_core::service::identity::IdentityService;
use threadline_infra::config::{load_config, resolve_data_dir};
use threadline_infra::crypto::keys::Sha256ApiKeyIssuer;
use threadline_infra::llm::build_provider_router;
use threadline_infra::secret::env::EnvCredentials;
use threadline_infra::sqlite::conversation::SqliteConversationRepository;
use threadline_infra::sqlite::pool::{DatabasePool, database_url};
use threadline_infra::sqlite::user::SqliteUserRepository;
use threadline_types::config::AppConfig;
use tokio_util::sync::CancellationToken;

pub type ConcreteOrchestrator = TurnOrchestrator<SqliteConversationRepository>;
pub type ConcreteConversationService = ConversationService<SqliteConversationRepository>;
pub type ConcreteIdentityService = IdentityService<SqliteUserRepository, Sha256ApiKeyIssuer>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub conversations: Arc<ConcreteConversationService>,
    pub identity: Arc<ConcreteIdentityService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
    /// Cancelled on server shutdown; each turn gets a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Resolve the data dir, load config, open the database, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        Ok(Self::from_parts(config, data_dir, db_pool, &EnvCredentials::new()))
    }

    /// Wire services over an already-open database.
    pub fn from_parts<C>(
        config: AppConfig,
        data_dir: PathBuf,
        db_pool: DatabasePool,
        credentials: &C,
    ) -> Self
    where
        C: CredentialLookup + ?Sized,
    {
        let conversation_repo = Arc::new(SqliteConversationRepository::new(db_pool.clone()));
        let user_repo = Arc::new(SqliteUserRepository::new(db_pool.clone()));

        let router = build_provider_router(&config, credentials);
        let settings = TurnSettings {
            context_window: config.context_window,
            provider_timeout: Duration::from_secs(config.provider_timeout_secs),
        };

        Self {
            orchestrator: Arc::new(TurnOrchestrator::new(
                conversation_repo.clone(),
                router,
                settings,
            )),
            conversations: Arc::new(ConversationService::new(conversation_repo)),
            identity: Arc::new(IdentityService::new(user_repo, Sha256ApiKeyIssuer::new())),
            config: Arc::new(config),
            data_dir,
            db_pool,
            shutdown: CancellationToken::new(),
        }
    }
}
