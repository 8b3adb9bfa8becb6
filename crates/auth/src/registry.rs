use super::*;
use folio_core::Failure;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key")]
    Duplicate,
    #[error("store unavailable: {0}")]
    Backend(String),
}

impl From<StoreError> for Failure {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => Failure::DuplicateAccount,
            StoreError::Backend(detail) => Failure::Internal(detail),
        }
    }
}

/// Identity store contract.
///
/// Implementations enforce email uniqueness themselves: two concurrent
/// `create` calls for the same email must not both succeed.
/// Callers pass emails already in [`normalize`]d form.
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, StoreError>;
    async fn create(&self, member: Member, hashword: String) -> Result<Member, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

/// In-process registry. Check and insert happen under one write lock.
#[derive(Default)]
pub struct Memory {
    users: RwLock<HashMap<String, (Member, String)>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait::async_trait]
impl Registry for Memory {
    async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }
    async fn create(&self, member: Member, hashword: String) -> Result<Member, StoreError> {
        let mut users = self.users.write().await;
        match users.contains_key(member.email()) {
            true => Err(StoreError::Duplicate),
            false => {
                users.insert(member.email().to_string(), (member.clone(), hashword));
                Ok(member)
            }
        }
    }
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
