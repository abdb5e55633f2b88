//! # Redis
//!
//! Document store for submissions.
//!
//! Core purpose is to persist RSVP and pledge documents per event and hand them back newest first.
//! Nothing is ever updated or deleted.
//!
//! ## Requirements
//!
//! - Every read and write is scoped to one event slug
//! - Listings are always newest first, ties keep insertion order
//! - Small dataset, a wedding has a few hundred guests at most
//!
//! ## Implementation
//!
//! - One Redis list per slug and collection: `events:{slug}:rsvps`, `events:{slug}:pledges`
//! - Documents are JSON strings
//! - `LPUSH` on insert, `LRANGE 0 -1` on read, so the list head is always the newest document
//! - No secondary keys, no transactions, every insert is a single independent command
use std::{
    collections::HashMap,
    fmt,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tokio::sync::{Mutex, OnceCell};
use tracing::info;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Rsvps,
    Pledges,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Rsvps => "rsvps",
            Collection::Pledges => "pledges",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn collection_key(slug: &str, collection: Collection) -> String {
    format!("events:{slug}:{collection}")
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert(&self, collection: Collection, slug: &str, document: String)
    -> Result<(), AppError>;

    /// Raw documents for `slug`, newest first.
    async fn find(&self, collection: Collection, slug: &str) -> Result<Vec<String>, AppError>;

    async fn shutdown(&self);
}

pub struct RedisStore {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    closed: AtomicBool,
}

impl RedisStore {
    pub fn open(redis_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            client: Client::open(redis_url)?,
            connection: OnceCell::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// Concurrent first callers wait on the same connection attempt.
    pub async fn connection(&self) -> Result<ConnectionManager, AppError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AppError::Unavailable("store has been shut down".to_string()));
        }

        let connection = self
            .connection
            .get_or_try_init(|| async {
                let config = ConnectionManagerConfig::new()
                    .set_number_of_retries(1)
                    .set_connection_timeout(Duration::from_millis(500));

                let manager = self
                    .client
                    .get_connection_manager_with_config(config)
                    .await?;

                info!("Connected to Redis");
                Ok::<_, AppError>(manager)
            })
            .await?;

        Ok(connection.clone())
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn insert(
        &self,
        collection: Collection,
        slug: &str,
        document: String,
    ) -> Result<(), AppError> {
        let mut connection = self.connection().await?;

        #[cfg(feature = "verbose")]
        info!("LPUSH {}", collection_key(slug, collection));

        let _: () = connection
            .lpush(collection_key(slug, collection), document)
            .await?;

        Ok(())
    }

    async fn find(&self, collection: Collection, slug: &str) -> Result<Vec<String>, AppError> {
        let mut connection = self.connection().await?;

        let documents: Vec<String> = connection
            .lrange(collection_key(slug, collection), 0, -1)
            .await?;

        Ok(documents)
    }

    async fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        info!("Redis store closed");
    }
}

/// In-process store with the same ordering as [`RedisStore`].
#[derive(Default)]
pub struct MemoryStore {
    lists: Mutex<HashMap<String, Vec<String>>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_open(&self) -> Result<(), AppError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AppError::Unavailable("store has been shut down".to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(
        &self,
        collection: Collection,
        slug: &str,
        document: String,
    ) -> Result<(), AppError> {
        self.check_open()?;

        self.lists
            .lock()
            .await
            .entry(collection_key(slug, collection))
            .or_default()
            .insert(0, document);

        Ok(())
    }

    async fn find(&self, collection: Collection, slug: &str) -> Result<Vec<String>, AppError> {
        self.check_open()?;

        Ok(self
            .lists
            .lock()
            .await
            .get(&collection_key(slug, collection))
            .cloned()
            .unwrap_or_default())
    }

    async fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
