/// Entity store access layer
///
/// This module provides:
/// - The `EntityStore` trait: the contract every backing store satisfies
/// - `GoogleDatastore`: Google Cloud Datastore REST v1 adapter
/// - `MemoryStore`: in-process store for tests and emulator-free local runs
///
/// All calls are remote for the production adapter and may fail with a
/// `StoreError`, which callers surface unchanged (no retry, no cache).
pub mod datastore;
pub mod memory;

pub use datastore::GoogleDatastore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Entity kind for user records
pub const KIND_USERS: &str = "Users";
/// Entity kind for post records
pub const KIND_POSTS: &str = "Posts";
/// Entity kind for comment records
pub const KIND_COMMENTS: &str = "Comments";

/// Store-level failure, propagated unchanged to the routing layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("datastore rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("entity has an unexpected shape: {0}")]
    InvalidEntity(String),
}

/// A stored record: the store-assigned id plus its named properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub properties: Map<String, Value>,
}

/// Equality filter on a single property.
#[derive(Debug, Clone)]
pub struct PropertyFilter {
    pub property: String,
    pub value: Value,
}

/// A query over one kind, with optional filter, limit, and continuation.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub kind: String,
    pub filter: Option<PropertyFilter>,
    pub limit: Option<i32>,
    pub cursor: Option<String>,
}

impl Query {
    pub fn kind(kind: &str) -> Self {
        Query {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    pub fn filter_eq(mut self, property: &str, value: Value) -> Self {
        self.filter = Some(PropertyFilter {
            property: property.to_string(),
            value,
        });
        self
    }

    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// One page of query results. `end_cursor` is opaque and only meaningful
/// when `more_results` is true; callers echo it back verbatim.
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub entities: Vec<Entity>,
    pub end_cursor: Option<String>,
    pub more_results: bool,
}

/// Contract between the resource services and the backing store.
///
/// `get` on an absent id returns `Ok(None)`, not an error. Ids are
/// assigned by the store at insert time and are immutable thereafter.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Persist a new entity; the store assigns and returns the id.
    async fn insert(&self, kind: &str, properties: Map<String, Value>)
        -> Result<String, StoreError>;

    /// Fetch one entity by id.
    async fn get(&self, kind: &str, id: &str) -> Result<Option<Entity>, StoreError>;

    /// Overwrite the properties of an existing entity.
    async fn update(
        &self,
        kind: &str,
        id: &str,
        properties: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Remove an entity. Deleting an absent id is not an error at this
    /// layer; services check existence first.
    async fn delete(&self, kind: &str, id: &str) -> Result<(), StoreError>;

    /// Run a query and return one page of results.
    async fn run_query(&self, query: Query) -> Result<QueryPage, StoreError>;
}
