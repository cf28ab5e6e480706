/// In-process entity store
///
/// Backs the test suite and emulator-free local runs with the same
/// observable contract as the remote adapter: store-assigned numeric ids,
/// equality filters, limits, and an opaque continuation cursor.
use super::{Entity, EntityStore, Query, QueryPage, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    next_id: u64,
    kinds: HashMap<String, BTreeMap<u64, Map<String, Value>>>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 5000,
                kinds: HashMap::new(),
            }),
        }
    }
}

fn parse_id(id: &str) -> Option<u64> {
    id.parse::<u64>().ok()
}

fn matches(properties: &Map<String, Value>, query: &Query) -> bool {
    match &query.filter {
        Some(filter) => properties.get(&filter.property) == Some(&filter.value),
        None => true,
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn insert(
        &self,
        kind: &str,
        properties: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner
            .kinds
            .entry(kind.to_string())
            .or_default()
            .insert(id, properties);
        Ok(id.to_string())
    }

    async fn get(&self, kind: &str, id: &str) -> Result<Option<Entity>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let entity = parse_id(id)
            .and_then(|id_num| inner.kinds.get(kind)?.get(&id_num))
            .map(|properties| Entity {
                id: id.to_string(),
                properties: properties.clone(),
            });
        Ok(entity)
    }

    async fn update(
        &self,
        kind: &str,
        id: &str,
        properties: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(id_num) = parse_id(id) {
            if let Some(entities) = inner.kinds.get_mut(kind) {
                entities.insert(id_num, properties);
            }
        }
        Ok(())
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(id_num) = parse_id(id) {
            if let Some(entities) = inner.kinds.get_mut(kind) {
                entities.remove(&id_num);
            }
        }
        Ok(())
    }

    async fn run_query(&self, query: Query) -> Result<QueryPage, StoreError> {
        let inner = self.inner.lock().unwrap();

        let matching: Vec<Entity> = inner
            .kinds
            .get(&query.kind)
            .map(|entities| {
                entities
                    .iter()
                    .filter(|(_, properties)| matches(properties, &query))
                    .map(|(id, properties)| Entity {
                        id: id.to_string(),
                        properties: properties.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        // The cursor is an offset into the filtered sequence, carried as an
        // opaque string the way the remote store carries its cursor.
        let offset = query
            .cursor
            .as_deref()
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(0);

        let total = matching.len();
        let page: Vec<Entity> = match query.limit {
            Some(limit) => matching
                .into_iter()
                .skip(offset)
                .take(limit as usize)
                .collect(),
            None => matching.into_iter().skip(offset).collect(),
        };

        let consumed = offset + page.len();
        let more_results = consumed < total;

        Ok(QueryPage {
            entities: page,
            end_cursor: more_results.then(|| consumed.to_string()),
            more_results,
        })
    }
}
