//! Common library for the marketplace application
//!
//! This crate provides the user model and the storage layer shared by the
//! services: a backend-agnostic [`storage::Storage`] trait, an in-memory
//! backend, a Supabase backend and the startup selector between them.
//!
//! ```rust,no_run
//! use common::config::StorageConfig;
//! use common::models::InsertUser;
//! use common::storage::select_storage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = select_storage(&StorageConfig::from_env())?;
//!     let user = storage.create_user(InsertUser::new("alice", "p1")).await?;
//!     println!("Created {} on {}", user.id, storage.backend_name());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod storage;
