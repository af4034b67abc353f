//! Auth helpers: seed users and mint tokens for them.

use sqlx::PgPool;
use uuid::Uuid;

use ideaport_api::auth::jwt::create_token;
use ideaport_core::models::User;

use super::TEST_JWT_SECRET;

pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

/// Insert a user row and mint a bearer token for it.
pub async fn create_test_user(pool: &PgPool, username: &str, is_staff: bool) -> TestUser {
    let user = sqlx::query_as::<sqlx::Postgres, User>(
        r#"
        INSERT INTO users (username, email, full_name, is_staff)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, email, full_name, is_staff, created_at
        "#,
    )
    .bind(username)
    .bind(format!("{}@example.com", username))
    .bind(format!("{} Example", username))
    .bind(is_staff)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test user");

    let token = create_token(user.id, TEST_JWT_SECRET, 1).expect("Failed to mint test token");

    TestUser { user, token }
}
