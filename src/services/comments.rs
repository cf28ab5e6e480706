/// Comment service - free-standing comment records
use crate::db::{EntityStore, Query, KIND_COMMENTS};
use crate::error::Result;
use crate::models::Comment;
use std::sync::Arc;

pub struct CommentService {
    store: Arc<dyn EntityStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        content: String,
        creation_date: String,
        upvote: bool,
    ) -> Result<Comment> {
        let mut comment = Comment {
            id: String::new(),
            content,
            creation_date,
            upvote,
            self_link: String::new(),
        };

        comment.id = self
            .store
            .insert(KIND_COMMENTS, comment.to_properties())
            .await?;
        Ok(comment)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Comment>> {
        match self.store.get(KIND_COMMENTS, id).await? {
            Some(entity) => Ok(Some(Comment::from_entity(&entity)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> Result<Vec<Comment>> {
        let page = self.store.run_query(Query::kind(KIND_COMMENTS)).await?;
        let comments = page
            .entities
            .iter()
            .map(Comment::from_entity)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    /// Full replace of the stored record.
    pub async fn edit(&self, comment: &Comment) -> Result<()> {
        self.store
            .update(KIND_COMMENTS, &comment.id, comment.to_properties())
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(KIND_COMMENTS, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::CommentAttributes;

    fn service() -> CommentService {
        CommentService::new(Arc::new(MemoryStore::new()))
    }

    #[actix_rt::test]
    async fn create_list_and_get_round_trip() {
        let service = service();
        let created = service
            .create("nice".into(), "2024-02-02".into(), true)
            .await
            .unwrap();

        let fetched = service.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "nice");
        assert!(fetched.upvote);

        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn patch_merge_keeps_absent_fields() {
        let service = service();
        let created = service
            .create("nice".into(), "2024-02-02".into(), true)
            .await
            .unwrap();

        let patch = CommentAttributes {
            upvote: Some(false),
            ..Default::default()
        };
        service.edit(&patch.merge_into(created.clone())).await.unwrap();

        let fetched = service.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "nice");
        assert!(!fetched.upvote);
    }

    #[actix_rt::test]
    async fn delete_removes_the_comment() {
        let service = service();
        let created = service
            .create("nice".into(), "2024-02-02".into(), false)
            .await
            .unwrap();
        service.delete(&created.id).await.unwrap();
        assert!(service.get_by_id(&created.id).await.unwrap().is_none());
    }
}
