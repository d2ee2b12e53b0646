//! User storage abstraction
//!
//! [`Storage`] is the only contract the rest of the application depends on.
//! Two backends implement it: [`MemStorage`] for development and fallback,
//! and [`SupabaseStorage`] for the managed Postgres service. The backend is
//! chosen once at startup by [`select_storage`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::config::{BackendKind, StorageConfig};
use crate::error::StorageResult;
use crate::models::{InsertUser, User};

pub mod memory;
pub mod supabase;

pub use memory::MemStorage;
pub use supabase::SupabaseStorage;

/// Operations every user storage backend supports
#[async_trait]
pub trait Storage: Send + Sync {
    /// Find a user by ID. A miss is `Ok(None)`.
    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>>;

    /// Find a user by username. A miss is `Ok(None)`.
    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Persist a new user under a freshly generated ID and return the stored record
    async fn create_user(&self, insert_user: InsertUser) -> StorageResult<User>;

    /// Short label of the backend, used in logs and health output
    fn backend_name(&self) -> &'static str;
}

/// Build the backend selected by `config`
///
/// Called once at process start; the returned handle is shared for the
/// lifetime of the process.
pub fn select_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.backend() {
        BackendKind::Supabase(supabase_config) => {
            info!(
                "Using Supabase user storage at {} (table: {})",
                supabase_config.url, supabase_config.users_table
            );
            Arc::new(SupabaseStorage::new(supabase_config)?)
        }
        BackendKind::Memory => {
            info!("Supabase credentials not configured, using in-memory user storage");
            Arc::new(MemStorage::new())
        }
    };

    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_memory_storage() {
        let storage = select_storage(&StorageConfig::default()).unwrap();
        assert_eq!(storage.backend_name(), "memory");
    }

    #[test]
    fn test_select_supabase_storage() {
        let config = StorageConfig {
            supabase_url: Some("https://example.supabase.co".to_string()),
            supabase_service_role_key: Some("service-key".to_string()),
            users_table: None,
        };

        let storage = select_storage(&config).unwrap();
        assert_eq!(storage.backend_name(), "supabase");
    }

    #[test]
    fn test_select_rejects_invalid_supabase_url() {
        let config = StorageConfig {
            supabase_url: Some("example.supabase.co".to_string()),
            supabase_service_role_key: Some("service-key".to_string()),
            users_table: None,
        };

        assert!(select_storage(&config).is_err());
    }
}
