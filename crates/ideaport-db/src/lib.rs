//! Entity Store: sqlx/Postgres repositories for campaigns, ideas,
//! contributors, documents, users, and the task queue table.

pub mod db;

pub use db::campaign::CampaignRepository;
pub use db::contributor::ContributorRepository;
pub use db::document::DocumentRepository;
pub use db::idea::IdeaRepository;
pub use db::task::TaskRepository;
pub use db::user::UserRepository;
