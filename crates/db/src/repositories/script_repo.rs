//! Repository for scripts.

use stagecraft_core::types::DbId;

use crate::models::script::{CreateScript, Script, UpdateScript};
use crate::DbPool;

pub struct ScriptRepo;

impl ScriptRepo {
    /// List scripts in id order, optionally only those owned by `user_id`.
    pub async fn list(pool: &DbPool, user_id: Option<&str>) -> Vec<Script> {
        pool.read()
            .await
            .scripts
            .values()
            .filter(|s| user_id.is_none_or(|u| s.user_id == u))
            .cloned()
            .collect()
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Option<Script> {
        pool.read().await.scripts.get(&id).cloned()
    }

    pub async fn create(pool: &DbPool, user_id: &str, input: &CreateScript) -> Script {
        let mut tables = pool.write().await;
        let script = Script {
            id: pool.allocate_id(),
            title: input.title.clone(),
            content: Some(input.content.clone()),
            genre: Some(input.genre.clone()),
            description: input.description.clone(),
            user_id: user_id.to_string(),
            created_at: chrono::Utc::now(),
        };
        tables.scripts.insert(script.id, script.clone());
        script
    }

    /// Apply the provided fields. Returns `None` if no script has this id.
    pub async fn update(pool: &DbPool, id: DbId, input: &UpdateScript) -> Option<Script> {
        let mut tables = pool.write().await;
        let script = tables.scripts.get_mut(&id)?;
        if let Some(title) = &input.title {
            script.title = title.clone();
        }
        if let Some(content) = &input.content {
            script.content = Some(content.clone());
        }
        if let Some(genre) = &input.genre {
            script.genre = Some(genre.clone());
        }
        if let Some(description) = &input.description {
            script.description = Some(description.clone());
        }
        Some(script.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_script(title: &str) -> CreateScript {
        CreateScript {
            title: title.into(),
            content: "（幕启）\n薇奥拉：这是伊利里亚。".into(),
            genre: "喜剧".into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn list_filters_by_owner() {
        let pool = crate::create_empty_pool();
        ScriptRepo::create(&pool, "u1", &new_script("A")).await;
        ScriptRepo::create(&pool, "u2", &new_script("B")).await;
        ScriptRepo::create(&pool, "u1", &new_script("C")).await;

        let mine: Vec<_> = ScriptRepo::list(&pool, Some("u1"))
            .await
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(mine, ["A", "C"]);
        assert_eq!(ScriptRepo::list(&pool, None).await.len(), 3);
    }

    #[tokio::test]
    async fn update_merges_only_given_fields() {
        let pool = crate::create_empty_pool();
        let script = ScriptRepo::create(&pool, "u1", &new_script("Original")).await;

        let updated = ScriptRepo::update(
            &pool,
            script.id,
            &UpdateScript {
                genre: Some("浪漫剧".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Original");
        assert_eq!(updated.genre.as_deref(), Some("浪漫剧"));
        assert_eq!(updated.content, script.content);
        assert!(ScriptRepo::update(&pool, 404, &UpdateScript::default()).await.is_none());
    }
}
