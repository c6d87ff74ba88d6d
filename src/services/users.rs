use std::sync::Arc;

use super::{require_non_empty, ServiceError};
use crate::models::{NewUser, User};
use crate::storage::{Page, StorageError, UserStore};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn get(&self, id: i64) -> Result<User, ServiceError> {
        Ok(self.users.get(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.list().await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, ServiceError> {
        require_non_empty(email, "email")?;
        Ok(self.users.find_by_email(email).await?)
    }

    pub async fn find_by_name(
        &self,
        name: &str,
        page_size: i64,
        page_num: i64,
    ) -> Result<Vec<User>, ServiceError> {
        require_non_empty(name, "name")?;
        let page = Page::new(page_size, page_num)?;
        Ok(self.users.find_by_name(name, page).await?)
    }

    pub async fn create(&self, draft: NewUser) -> Result<User, ServiceError> {
        require_non_empty(&draft.name, "name")?;
        require_non_empty(&draft.email, "email")?;
        if self.users.exists_by_email(&draft.email).await? {
            return Err(StorageError::Duplicate("user").into());
        }
        Ok(self.users.insert(draft).await?)
    }

    pub async fn update(&self, user: &User) -> Result<User, ServiceError> {
        require_non_empty(&user.name, "name")?;
        require_non_empty(&user.email, "email")?;
        let current = self.users.get(user.id).await?;
        if current.email != user.email && self.users.exists_by_email(&user.email).await? {
            return Err(StorageError::Duplicate("user").into());
        }
        Ok(self.users.update(user).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.users.delete(id).await?)
    }
}
