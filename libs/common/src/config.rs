//! Storage backend configuration
//!
//! Decides, from the process environment, which user storage backend the
//! service runs against. The decision itself is pure: see
//! [`StorageConfig::backend`].

use std::env;

/// Default name of the users table on the external service
pub const DEFAULT_USERS_TABLE: &str = "users";

/// Connection settings for the Supabase backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL (e.g. "https://xyzcompany.supabase.co")
    pub url: String,
    /// Service role key, sent on every request
    pub service_role_key: String,
    /// Table holding user rows
    pub users_table: String,
}

/// Backend chosen at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Supabase(SupabaseConfig),
}

/// Storage configuration struct
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub users_table: Option<String>,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SUPABASE_URL`: Supabase project URL
    /// - `SUPABASE_SERVICE_ROLE_KEY`: Service role key for server-side access
    /// - `SUPABASE_USERS_TABLE`: Users table name (default: "users")
    ///
    /// Variables that are set but empty are treated as absent.
    pub fn from_env() -> Self {
        Self {
            supabase_url: non_empty_var("SUPABASE_URL"),
            supabase_service_role_key: non_empty_var("SUPABASE_SERVICE_ROLE_KEY"),
            users_table: non_empty_var("SUPABASE_USERS_TABLE"),
        }
    }

    /// Pick the backend: Supabase when both the URL and the service key are
    /// present, the in-memory store otherwise.
    pub fn backend(&self) -> BackendKind {
        match (&self.supabase_url, &self.supabase_service_role_key) {
            (Some(url), Some(key)) => BackendKind::Supabase(SupabaseConfig {
                url: url.clone(),
                service_role_key: key.clone(),
                users_table: self
                    .users_table
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USERS_TABLE.to_string()),
            }),
            _ => BackendKind::Memory,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
