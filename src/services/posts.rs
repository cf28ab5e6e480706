/// Post service - handles post creation, retrieval, listing, and deletion
use crate::db::{EntityStore, Query, KIND_POSTS};
use crate::error::Result;
use crate::models::Post;
use serde_json::json;
use std::sync::Arc;

/// Fixed page size for post listings.
pub const PAGE_SIZE: i32 = 5;

/// One page of a subject's posts. `next_cursor` and `total` are only set
/// when more results remain, matching the observable listing contract.
pub struct PostPage {
    pub posts: Vec<Post>,
    pub next_cursor: Option<String>,
    pub total: Option<i64>,
}

pub struct PostService {
    store: Arc<dyn EntityStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Create a post owned by the authenticated subject. Upvotes start at
    /// zero and the comment list starts empty.
    pub async fn create(
        &self,
        subject: &str,
        content: String,
        creation_date: String,
        public: bool,
    ) -> Result<Post> {
        let mut post = Post {
            id: String::new(),
            content,
            creation_date,
            public,
            user_id: subject.to_string(),
            comments: vec![],
            upvotes: 0,
            self_link: String::new(),
        };

        post.id = self.store.insert(KIND_POSTS, post.to_properties()).await?;
        Ok(post)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Post>> {
        match self.store.get(KIND_POSTS, id).await? {
            Some(entity) => Ok(Some(Post::from_entity(&entity)?)),
            None => Ok(None),
        }
    }

    /// List the subject's own posts, one page at a time. The continuation
    /// cursor is the store's, echoed verbatim. When more pages remain, the
    /// total is computed from an unpaged query run once per request; the
    /// inefficiency is part of the observable contract.
    pub async fn list_for_owner(&self, subject: &str, cursor: Option<String>) -> Result<PostPage> {
        let page = self
            .store
            .run_query(
                Query::kind(KIND_POSTS)
                    .filter_eq("userID", json!(subject))
                    .limit(PAGE_SIZE)
                    .cursor(cursor),
            )
            .await?;

        let posts = page
            .entities
            .iter()
            .map(Post::from_entity)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if !page.more_results {
            return Ok(PostPage {
                posts,
                next_cursor: None,
                total: None,
            });
        }

        let all = self
            .store
            .run_query(Query::kind(KIND_POSTS).filter_eq("userID", json!(subject)))
            .await?;

        Ok(PostPage {
            posts,
            next_cursor: page.end_cursor,
            total: Some(all.entities.len() as i64),
        })
    }

    /// Full replace of the stored record. The caller builds `post` from
    /// the current record so immutable fields are carried forward.
    pub async fn edit(&self, post: &Post) -> Result<()> {
        self.store
            .update(KIND_POSTS, &post.id, post.to_properties())
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(KIND_POSTS, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::PostAttributes;

    fn service() -> PostService {
        PostService::new(Arc::new(MemoryStore::new()))
    }

    #[actix_rt::test]
    async fn create_then_get_round_trips_caller_fields() {
        let service = service();
        let created = service
            .create("sub-1", "hi".into(), "2024-01-01".into(), true)
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.upvotes, 0);
        assert!(created.comments.is_empty());

        let fetched = service.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "hi");
        assert_eq!(fetched.creation_date, "2024-01-01");
        assert!(fetched.public);
        assert_eq!(fetched.user_id, "sub-1");
    }

    #[actix_rt::test]
    async fn listing_pages_at_five_with_total_only_while_more_remain() {
        let service = service();
        for i in 0..7 {
            service
                .create("sub-1", format!("p{i}"), "2024-01-01".into(), true)
                .await
                .unwrap();
        }
        service
            .create("sub-2", "other".into(), "2024-01-01".into(), true)
            .await
            .unwrap();

        let first = service.list_for_owner("sub-1", None).await.unwrap();
        assert_eq!(first.posts.len(), 5);
        assert_eq!(first.total, Some(7));
        let cursor = first.next_cursor.expect("first page has a continuation");

        let second = service
            .list_for_owner("sub-1", Some(cursor))
            .await
            .unwrap();
        assert_eq!(second.posts.len(), 2);
        assert!(second.next_cursor.is_none());
        assert!(second.total.is_none());
    }

    #[actix_rt::test]
    async fn edit_after_merge_preserves_owner_and_counters() {
        let service = service();
        let created = service
            .create("sub-1", "hi".into(), "2024-01-01".into(), false)
            .await
            .unwrap();

        let patch = PostAttributes {
            content: Some("edited".into()),
            ..Default::default()
        };
        let merged = patch.merge_into(created.clone());
        service.edit(&merged).await.unwrap();

        let fetched = service.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "edited");
        assert_eq!(fetched.user_id, "sub-1");
        assert_eq!(fetched.upvotes, 0);
        assert!(!fetched.public);
    }

    #[actix_rt::test]
    async fn delete_removes_the_post() {
        let service = service();
        let created = service
            .create("sub-1", "hi".into(), "2024-01-01".into(), true)
            .await
            .unwrap();
        service.delete(&created.id).await.unwrap();
        assert!(service.get_by_id(&created.id).await.unwrap().is_none());
    }
}
