//! Supabase-backed user storage
//!
//! Talks to the PostgREST interface of a Supabase project using the service
//! role key. The HTTP client holds no session: the key is attached to every
//! request and there is nothing to persist or refresh.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::Storage;
use crate::config::SupabaseConfig;
use crate::error::{StorageError, StorageResult};
use crate::models::{InsertUser, User};

const GET_USER: &str = "getUser";
const GET_USER_BY_USERNAME: &str = "getUserByUsername";
const CREATE_USER: &str = "createUser";

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    code: Option<String>,
}

/// User storage backed by a Supabase table
#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    http: Client,
    table_url: String,
}

impl SupabaseStorage {
    /// Create a new Supabase storage client
    pub fn new(config: SupabaseConfig) -> StorageResult<Self> {
        let base_url = config.url.trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(StorageError::Configuration(format!(
                "Supabase URL must start with http:// or https://, got {:?}",
                config.url
            )));
        }

        if config.users_table.is_empty() {
            return Err(StorageError::Configuration(
                "Supabase users table name cannot be empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(&config.service_role_key)
            .map_err(|_| StorageError::Configuration("Invalid Supabase service key".to_string()))?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_role_key))
            .map_err(|_| StorageError::Configuration("Invalid Supabase service key".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                StorageError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            table_url: format!("{}/rest/v1/{}", base_url, config.users_table),
        })
    }

    /// Run a filtered select that may match at most one row
    async fn find_one(
        &self,
        operation: &'static str,
        column: &str,
        value: &str,
    ) -> StorageResult<Option<User>> {
        let filter = format!("eq.{}", value);
        let response = self
            .http
            .get(&self.table_url)
            .query(&[("select", "*"), (column, filter.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;

        let mut rows = read_rows(operation, response).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(StorageError::backend(
                operation,
                format!("expected at most one row, got {}", n),
            )),
        }
    }
}

#[async_trait]
impl Storage for SupabaseStorage {
    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        debug!("Finding user by ID: {}", id);
        self.find_one(GET_USER, "id", &id.to_string()).await
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        debug!("Finding user by username: {}", username);
        self.find_one(GET_USER_BY_USERNAME, "username", username)
            .await
    }

    async fn create_user(&self, insert_user: InsertUser) -> StorageResult<User> {
        let user = insert_user.into_user(Uuid::new_v4());

        let response = self
            .http
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&user)
            .send()
            .await
            .map_err(|e| transport_error(CREATE_USER, e))?;

        let created = read_rows(CREATE_USER, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::backend(CREATE_USER, "no row returned"))?;

        info!("Created user {} ({})", created.username, created.id);
        Ok(created)
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}

fn transport_error(operation: &'static str, err: reqwest::Error) -> StorageError {
    error!("Supabase {} request failed: {}", operation, err);
    StorageError::backend(operation, err.to_string())
}

/// Decode a PostgREST response into rows, turning error statuses into
/// backend failures
async fn read_rows(operation: &'static str, response: Response) -> StorageResult<Vec<User>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        error!("Supabase {} failed: {}", operation, message);

        let code = serde_json::from_str::<PostgrestError>(&body)
            .ok()
            .and_then(|e| e.code);
        if code.as_deref() == Some(UNIQUE_VIOLATION) {
            return Err(StorageError::UniqueViolation { operation, message });
        }
        return Err(StorageError::backend(operation, message));
    }

    response
        .json::<Vec<User>>()
        .await
        .map_err(|e| StorageError::backend(operation, format!("invalid response body: {}", e)))
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(PostgrestError {
            message: Some(message),
            code: Some(code),
        }) => format!("{} (code {})", message, code),
        Ok(PostgrestError {
            message: Some(message),
            code: None,
        }) => message,
        _ if body.trim().is_empty() => status.to_string(),
        _ => format!("{}: {}", status, body.trim()),
    }
}
