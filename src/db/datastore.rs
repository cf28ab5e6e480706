/// Google Cloud Datastore REST v1 adapter
///
/// Translates domain records to and from the Datastore entity
/// representation and issues `:lookup`, `:commit`, and `:runQuery` calls
/// over HTTP. Failures are surfaced as `StoreError` without retry.
use super::{Entity, EntityStore, Query, QueryPage, StoreError};
use crate::config::DatastoreConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

/// `moreResults` marker meaning the query is exhausted.
const NO_MORE_RESULTS: &str = "NO_MORE_RESULTS";

pub struct GoogleDatastore {
    http: Client,
    base_url: String,
    project_id: String,
    access_token: Option<String>,
}

impl GoogleDatastore {
    pub fn new(config: &DatastoreConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            access_token: config.access_token.clone(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1/projects/{}:{}", self.base_url, self.project_id, method)
    }

    async fn call(&self, method: &str, body: Value) -> Result<Value, StoreError> {
        let mut req = self.http.post(self.endpoint(method)).json(&body);
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))
    }

    fn key(&self, kind: &str, id: Option<&str>) -> Value {
        let mut element = json!({ "kind": kind });
        if let Some(id) = id {
            element["id"] = Value::String(id.to_string());
        }
        json!({ "path": [element] })
    }
}

#[async_trait]
impl EntityStore for GoogleDatastore {
    async fn insert(
        &self,
        kind: &str,
        properties: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let body = json!({
            "mode": "NON_TRANSACTIONAL",
            "mutations": [{
                "insert": {
                    "key": self.key(kind, None),
                    "properties": encode_properties(&properties),
                }
            }],
        });

        let resp = self.call("commit", body).await?;
        let id = resp
            .pointer("/mutationResults/0/key/path/0/id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                StoreError::InvalidEntity("commit response missing assigned id".into())
            })?;

        Ok(id.to_string())
    }

    async fn get(&self, kind: &str, id: &str) -> Result<Option<Entity>, StoreError> {
        let body = json!({ "keys": [self.key(kind, Some(id))] });
        let resp = self.call("lookup", body).await?;

        match resp.pointer("/found/0/entity") {
            Some(entity) => Ok(Some(decode_entity(entity)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        kind: &str,
        id: &str,
        properties: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let body = json!({
            "mode": "NON_TRANSACTIONAL",
            "mutations": [{
                "update": {
                    "key": self.key(kind, Some(id)),
                    "properties": encode_properties(&properties),
                }
            }],
        });

        self.call("commit", body).await.map(|_| ())
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), StoreError> {
        let body = json!({
            "mode": "NON_TRANSACTIONAL",
            "mutations": [{ "delete": self.key(kind, Some(id)) }],
        });

        self.call("commit", body).await.map(|_| ())
    }

    async fn run_query(&self, query: Query) -> Result<QueryPage, StoreError> {
        let mut q = json!({ "kind": [{ "name": query.kind }] });
        if let Some(filter) = &query.filter {
            q["filter"] = json!({
                "propertyFilter": {
                    "property": { "name": filter.property },
                    "op": "EQUAL",
                    "value": encode_value(&filter.value)?,
                }
            });
        }
        if let Some(limit) = query.limit {
            q["limit"] = json!(limit);
        }
        if let Some(cursor) = &query.cursor {
            q["startCursor"] = Value::String(cursor.clone());
        }

        let resp = self.call("runQuery", json!({ "query": q })).await?;
        let batch = resp
            .get("batch")
            .ok_or_else(|| StoreError::InvalidEntity("runQuery response missing batch".into()))?;

        let mut entities = Vec::new();
        if let Some(results) = batch.get("entityResults").and_then(Value::as_array) {
            for result in results {
                let entity = result.get("entity").ok_or_else(|| {
                    StoreError::InvalidEntity("entity result missing entity".into())
                })?;
                entities.push(decode_entity(entity)?);
            }
        }

        let more_results = batch
            .get("moreResults")
            .and_then(Value::as_str)
            .map(|m| m != NO_MORE_RESULTS)
            .unwrap_or(false);

        let end_cursor = batch
            .get("endCursor")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(QueryPage {
            entities,
            end_cursor,
            more_results,
        })
    }
}

/// Encode a flat map of domain properties into Datastore form.
fn encode_properties(properties: &Map<String, Value>) -> Value {
    let mut out = Map::new();
    for (name, value) in properties {
        // Domain records are built from validated request payloads, so
        // every value is encodable.
        if let Ok(encoded) = encode_value(value) {
            out.insert(name.clone(), encoded);
        }
    }
    Value::Object(out)
}

fn encode_value(value: &Value) -> Result<Value, StoreError> {
    match value {
        Value::Null => Ok(json!({ "nullValue": null })),
        Value::Bool(b) => Ok(json!({ "booleanValue": b })),
        Value::String(s) => Ok(json!({ "stringValue": s })),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Datastore carries 64-bit integers as decimal strings.
                Ok(json!({ "integerValue": i.to_string() }))
            } else {
                Ok(json!({ "doubleValue": n.as_f64() }))
            }
        }
        Value::Array(items) => {
            let values = items
                .iter()
                .map(encode_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(json!({ "arrayValue": { "values": values } }))
        }
        Value::Object(_) => Err(StoreError::InvalidEntity(
            "nested objects are not stored".into(),
        )),
    }
}

fn decode_entity(entity: &Value) -> Result<Entity, StoreError> {
    let id = entity
        .pointer("/key/path/0/id")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::InvalidEntity("entity key missing id".into()))?
        .to_string();

    let mut properties = Map::new();
    if let Some(props) = entity.get("properties").and_then(Value::as_object) {
        for (name, value) in props {
            properties.insert(name.clone(), decode_value(value)?);
        }
    }

    Ok(Entity { id, properties })
}

fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let obj = value
        .as_object()
        .ok_or_else(|| StoreError::InvalidEntity("property value is not an object".into()))?;

    if obj.contains_key("nullValue") {
        return Ok(Value::Null);
    }
    if let Some(b) = obj.get("booleanValue") {
        return Ok(b.clone());
    }
    if let Some(s) = obj.get("stringValue") {
        return Ok(s.clone());
    }
    if let Some(i) = obj.get("integerValue") {
        let parsed = match i {
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        return parsed
            .map(|n| json!(n))
            .ok_or_else(|| StoreError::InvalidEntity("bad integerValue".into()));
    }
    if let Some(d) = obj.get("doubleValue") {
        return Ok(d.clone());
    }
    if let Some(arr) = obj.get("arrayValue") {
        let values = match arr.get("values").and_then(Value::as_array) {
            Some(values) => values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        return Ok(Value::Array(values));
    }

    Err(StoreError::InvalidEntity(format!(
        "unsupported value type: {}",
        value
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_scalars_in_datastore_form() {
        assert_eq!(
            encode_value(&json!("hi")).unwrap(),
            json!({ "stringValue": "hi" })
        );
        assert_eq!(
            encode_value(&json!(true)).unwrap(),
            json!({ "booleanValue": true })
        );
        assert_eq!(
            encode_value(&json!(7)).unwrap(),
            json!({ "integerValue": "7" })
        );
        assert_eq!(
            encode_value(&json!([])).unwrap(),
            json!({ "arrayValue": { "values": [] } })
        );
    }

    #[test]
    fn decode_round_trips_encode() {
        let original = json!(["a", 3, true]);
        let decoded = decode_value(&encode_value(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn decodes_entity_with_store_assigned_id() {
        let entity = json!({
            "key": { "path": [{ "kind": "Posts", "id": "5001" }] },
            "properties": {
                "content": { "stringValue": "hi" },
                "upvotes": { "integerValue": "0" },
                "public": { "booleanValue": true },
            }
        });

        let decoded = decode_entity(&entity).unwrap();
        assert_eq!(decoded.id, "5001");
        assert_eq!(decoded.properties["content"], json!("hi"));
        assert_eq!(decoded.properties["upvotes"], json!(0));
        assert_eq!(decoded.properties["public"], json!(true));
    }

    #[test]
    fn missing_id_is_an_invalid_entity() {
        let entity = json!({ "key": { "path": [{ "kind": "Posts" }] }, "properties": {} });
        assert!(matches!(
            decode_entity(&entity),
            Err(StoreError::InvalidEntity(_))
        ));
    }
}
