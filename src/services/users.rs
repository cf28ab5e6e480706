/// User service - first-login user creation and listing
use crate::db::{EntityStore, Query, KIND_USERS};
use crate::error::Result;
use crate::models::User;
use std::sync::Arc;

pub struct UserService {
    store: Arc<dyn EntityStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// List every registered user.
    pub async fn list(&self) -> Result<Vec<User>> {
        let page = self.store.run_query(Query::kind(KIND_USERS)).await?;
        let users = page
            .entities
            .iter()
            .map(User::from_entity)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Return the user for an external subject id, creating the record on
    /// first login. Dedup is a linear scan over the stored users, matching
    /// the reference behavior for small datasets.
    pub async fn find_or_create(&self, sub: &str, name: &str) -> Result<User> {
        let existing = self
            .list()
            .await?
            .into_iter()
            .find(|user| user.sub == sub);

        if let Some(user) = existing {
            return Ok(user);
        }

        let id = self
            .store
            .insert(KIND_USERS, User::to_properties(name, sub))
            .await?;
        tracing::info!(%id, "created user on first login");

        Ok(User {
            id,
            name: name.to_string(),
            sub: sub.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    #[actix_rt::test]
    async fn first_login_creates_then_reuses_the_record() {
        let service = service();

        let created = service.find_or_create("sub-1", "Ada").await.unwrap();
        let again = service.find_or_create("sub-1", "Ada").await.unwrap();
        assert_eq!(created.id, again.id);

        let users = service.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ada");
        assert_eq!(users[0].sub, "sub-1");
    }

    #[actix_rt::test]
    async fn distinct_subjects_get_distinct_records() {
        let service = service();
        service.find_or_create("sub-1", "Ada").await.unwrap();
        service.find_or_create("sub-2", "Grace").await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
