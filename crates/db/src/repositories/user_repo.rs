//! Repository for users.

use crate::models::user::{UpsertUser, User};
use crate::DbPool;

pub struct UserRepo;

impl UserRepo {
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Option<User> {
        pool.read().await.users.get(id).cloned()
    }

    /// Insert a user or refresh an existing one, keeping its `created_at`.
    pub async fn upsert(pool: &DbPool, input: &UpsertUser) -> User {
        let mut tables = pool.write().await;
        let now = chrono::Utc::now();
        let created_at = tables
            .users
            .get(&input.id)
            .map(|u| u.created_at)
            .unwrap_or(now);
        let user = User {
            id: input.id.clone(),
            email: input.email.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            profile_image_url: input.profile_image_url.clone(),
            created_at,
            updated_at: now,
        };
        tables.users.insert(input.id.clone(), user.clone());
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_preserves_created_at() {
        let pool = crate::create_empty_pool();
        let input = UpsertUser {
            id: "test-user-001".into(),
            email: Some("test@example.com".into()),
            ..Default::default()
        };
        let first = UserRepo::upsert(&pool, &input).await;
        let second = UserRepo::upsert(
            &pool,
            &UpsertUser {
                first_name: Some("测试".into()),
                ..input
            },
        )
        .await;

        assert_eq!(first.created_at, second.created_at);
        assert!(second.updated_at >= first.updated_at);
        let stored = UserRepo::find_by_id(&pool, "test-user-001").await.unwrap();
        assert_eq!(stored.first_name.as_deref(), Some("测试"));
        assert!(UserRepo::find_by_id(&pool, "nobody").await.is_none());
    }
}
