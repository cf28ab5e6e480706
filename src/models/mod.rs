/// Data models for the Posts service
///
/// This module defines structures for:
/// - User: an authenticated principal, deduplicated by external subject id
/// - Post: user-owned content with a visibility flag
/// - Comment: free-standing comment records (not linked to posts; a known
///   gap in the reference behavior, preserved)
///
/// Each model converts to and from the flat property map held by the
/// entity store. Property names match the wire-format JSON names so the
/// stored representation and the API representation stay aligned.
use crate::db::{Entity, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

fn get_str(entity: &Entity, name: &str) -> Result<String, StoreError> {
    entity
        .properties
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidEntity(format!("missing string property {name}")))
}

fn get_bool(entity: &Entity, name: &str) -> Result<bool, StoreError> {
    entity
        .properties
        .get(name)
        .and_then(Value::as_bool)
        .ok_or_else(|| StoreError::InvalidEntity(format!("missing boolean property {name}")))
}

fn get_i64(entity: &Entity, name: &str) -> Result<i64, StoreError> {
    entity
        .properties
        .get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| StoreError::InvalidEntity(format!("missing integer property {name}")))
}

/// An authenticated principal. `sub` is the external identity key used to
/// deduplicate records on first login.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub sub: String,
}

impl User {
    pub fn from_entity(entity: &Entity) -> Result<Self, StoreError> {
        Ok(User {
            id: entity.id.clone(),
            name: get_str(entity, "name")?,
            sub: get_str(entity, "sub")?,
        })
    }

    pub fn to_properties(name: &str, sub: &str) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert("name".into(), json!(name));
        properties.insert("sub".into(), json!(sub));
        properties
    }
}

/// A post. The owner (`userID`) is set once at creation from the
/// authenticated subject and carried forward by every edit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Post {
    pub id: String,
    pub content: String,
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    pub public: bool,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub comments: Vec<Value>,
    pub upvotes: i64,
    #[serde(rename = "self", skip_serializing_if = "String::is_empty")]
    pub self_link: String,
}

impl Post {
    pub fn from_entity(entity: &Entity) -> Result<Self, StoreError> {
        Ok(Post {
            id: entity.id.clone(),
            content: get_str(entity, "content")?,
            creation_date: get_str(entity, "creationDate")?,
            public: get_bool(entity, "public")?,
            user_id: get_str(entity, "userID")?,
            comments: entity
                .properties
                .get("comments")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            upvotes: get_i64(entity, "upvotes")?,
            self_link: String::new(),
        })
    }

    /// Flatten back to store properties. Immutable fields (`userID`,
    /// `comments`, `upvotes`) travel with the struct, so a full edit
    /// carries them forward.
    pub fn to_properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert("content".into(), json!(self.content));
        properties.insert("creationDate".into(), json!(self.creation_date));
        properties.insert("public".into(), json!(self.public));
        properties.insert("userID".into(), json!(self.user_id));
        properties.insert("comments".into(), Value::Array(self.comments.clone()));
        properties.insert("upvotes".into(), json!(self.upvotes));
        properties
    }

    pub fn with_self_link(mut self, base: &str) -> Self {
        self.self_link = format!("{}/posts/{}", base, self.id);
        self
    }
}

/// Mutable post attributes as they arrive in a request payload. Create
/// and full update require every field; partial update applies only the
/// fields present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostAttributes {
    pub content: Option<String>,
    #[serde(rename = "creationDate")]
    pub creation_date: Option<String>,
    pub public: Option<bool>,
}

impl PostAttributes {
    /// Reject the payload unless every mutable field is present.
    pub fn require_complete(&self) -> Result<(String, String, bool), String> {
        match (&self.content, &self.creation_date, self.public) {
            (Some(content), Some(date), Some(public)) => {
                Ok((content.clone(), date.clone(), public))
            }
            _ => Err(
                "The request object is missing at least one of the required attributes".into(),
            ),
        }
    }

    /// Apply only the present fields onto a freshly fetched record.
    pub fn merge_into(&self, mut post: Post) -> Post {
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(date) = &self.creation_date {
            post.creation_date = date.clone();
        }
        if let Some(public) = self.public {
            post.public = public;
        }
        post
    }
}

/// A comment. Carries no owner and no post reference.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub content: String,
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    pub upvote: bool,
    #[serde(rename = "self", skip_serializing_if = "String::is_empty")]
    pub self_link: String,
}

impl Comment {
    pub fn from_entity(entity: &Entity) -> Result<Self, StoreError> {
        Ok(Comment {
            id: entity.id.clone(),
            content: get_str(entity, "content")?,
            creation_date: get_str(entity, "creationDate")?,
            upvote: get_bool(entity, "upvote")?,
            self_link: String::new(),
        })
    }

    pub fn to_properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert("content".into(), json!(self.content));
        properties.insert("creationDate".into(), json!(self.creation_date));
        properties.insert("upvote".into(), json!(self.upvote));
        properties
    }

    pub fn with_self_link(mut self, base: &str) -> Self {
        self.self_link = format!("{}/comments/{}", base, self.id);
        self
    }
}

/// Mutable comment attributes from a request payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentAttributes {
    pub content: Option<String>,
    #[serde(rename = "creationDate")]
    pub creation_date: Option<String>,
    pub upvote: Option<bool>,
}

impl CommentAttributes {
    pub fn require_complete(&self) -> Result<(String, String, bool), String> {
        match (&self.content, &self.creation_date, self.upvote) {
            (Some(content), Some(date), Some(upvote)) => {
                Ok((content.clone(), date.clone(), upvote))
            }
            _ => Err(
                "The request object is missing at least one of the required attributes".into(),
            ),
        }
    }

    pub fn merge_into(&self, mut comment: Comment) -> Comment {
        if let Some(content) = &self.content {
            comment.content = content.clone();
        }
        if let Some(date) = &self.creation_date {
            comment.creation_date = date.clone();
        }
        if let Some(upvote) = self.upvote {
            comment.upvote = upvote;
        }
        comment
    }
}
