//! Application state and sub-state types.
//!
//! AppState is split into domain sub-states so handlers and services reach
//! only for what they need, without a single flat bag of repositories.

use ideaport_core::Config;
use ideaport_db::{
    CampaignRepository, ContributorRepository, DocumentRepository, IdeaRepository, TaskRepository,
    UserRepository,
};
use ideaport_services::{EmailService, VirusScanner};
use ideaport_storage::Storage;
use ideaport_worker::TaskQueue;
use sqlx::PgPool;
use std::sync::Arc;

/// Database pool and all repositories.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub campaign_repository: CampaignRepository,
    pub idea_repository: IdeaRepository,
    pub contributor_repository: ContributorRepository,
    pub document_repository: DocumentRepository,
    pub user_repository: UserRepository,
    pub task_repository: TaskRepository,
}

impl DbState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            campaign_repository: CampaignRepository::new(pool.clone()),
            idea_repository: IdeaRepository::new(pool.clone()),
            contributor_repository: ContributorRepository::new(pool.clone()),
            document_repository: DocumentRepository::new(pool.clone()),
            user_repository: UserRepository::new(pool.clone()),
            task_repository: TaskRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Upload limits for idea documents.
#[derive(Clone)]
pub struct DocumentConfig {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

/// Auth settings used by the JWT middleware.
#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
}

pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub documents: DocumentConfig,
    pub security: SecurityConfig,
    pub storage: Arc<dyn Storage>,
    pub scanner: Arc<dyn VirusScanner>,
    pub email: Option<EmailService>,
    /// Submission handle; the worker pool runs on a separate queue instance
    /// holding a weak reference back to this state.
    pub task_queue: TaskQueue,
}
