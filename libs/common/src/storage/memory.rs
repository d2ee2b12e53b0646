//! In-process user storage
//!
//! Records live in a map behind an async lock and vanish on process exit.
//! Usernames are not checked for uniqueness: two users may share one, and
//! lookups by username return the earliest inserted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::Storage;
use crate::error::StorageResult;
use crate::models::{InsertUser, User};

#[derive(Debug, Default)]
struct Records {
    users: HashMap<Uuid, User>,
    /// IDs in insertion order
    order: Vec<Uuid>,
}

/// In-memory user storage
#[derive(Debug, Clone, Default)]
pub struct MemStorage {
    records: Arc<RwLock<Records>>,
}

impl MemStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        debug!("Finding user by ID: {}", id);
        Ok(self.records.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        debug!("Finding user by username: {}", username);

        let records = self.records.read().await;
        let user = records
            .order
            .iter()
            .filter_map(|id| records.users.get(id))
            .find(|user| user.username == username)
            .cloned();

        Ok(user)
    }

    async fn create_user(&self, insert_user: InsertUser) -> StorageResult<User> {
        let user = insert_user.into_user(Uuid::new_v4());

        let mut records = self.records.write().await;
        records.order.push(user.id);
        records.users.insert(user.id, user.clone());

        info!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get_user() {
        let storage = MemStorage::new();
        let payload = InsertUser::new("alice", "p1");

        let created = storage.create_user(payload.clone()).await.unwrap();
        assert!(!created.id.is_nil());
        assert_eq!(created.username, payload.username);
        assert_eq!(created.password, payload.password);

        let fetched = storage.get_user(created.id).await.unwrap();
        assert_eq!(fetched, Some(payload.into_user(created.id)));
    }

    #[tokio::test]
    async fn test_lookups_on_empty_store_return_none() {
        let storage = MemStorage::new();

        assert!(storage.records.read().await.users.is_empty());
        assert_eq!(storage.get_user(Uuid::new_v4()).await.unwrap(), None);
        assert_eq!(storage.get_user_by_username("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_repeated_get_user_is_stable() {
        let storage = MemStorage::new();
        let created = storage
            .create_user(InsertUser::new("carol", "secret"))
            .await
            .unwrap();

        let first = storage.get_user(created.id).await.unwrap();
        let second = storage.get_user(created.id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_usernames_are_accepted() {
        let storage = MemStorage::new();

        let first = storage
            .create_user(InsertUser::new("dave", "one"))
            .await
            .unwrap();
        let second = storage
            .create_user(InsertUser::new("dave", "two"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(storage.records.read().await.order, vec![first.id, second.id]);
        assert_eq!(storage.get_user(first.id).await.unwrap(), Some(first.clone()));
        assert_eq!(storage.get_user(second.id).await.unwrap(), Some(second));

        let by_name = storage.get_user_by_username("dave").await.unwrap();
        assert_eq!(by_name, Some(first));
    }

    #[tokio::test]
    async fn test_alice_scenario() {
        let storage = MemStorage::new();

        let alice = storage
            .create_user(InsertUser::new("alice", "p1"))
            .await
            .unwrap();
        assert!(!alice.id.to_string().is_empty());
        assert_eq!(alice.username, "alice");

        assert_eq!(
            storage.get_user_by_username("alice").await.unwrap(),
            Some(alice)
        );
        assert_eq!(storage.get_user_by_username("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let storage = MemStorage::new();
        let handle = storage.clone();

        let created = handle
            .create_user(InsertUser::new("erin", "pw"))
            .await
            .unwrap();

        assert_eq!(storage.get_user(created.id).await.unwrap(), Some(created));
    }
}
