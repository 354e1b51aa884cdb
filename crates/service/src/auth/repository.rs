use async_trait::async_trait;
use uuid::Uuid;

use common::pagination::Pagination;

use super::domain::{AuthUser, Credentials, NewUser, UserListFilter, UserPatch};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<AuthUser>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, new: NewUser) -> Result<AuthUser, AuthError>;
    /// Apply a partial update; `None` when the id does not resolve.
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<AuthUser>, AuthError>;
    /// Remove the record; `false` when the id does not resolve.
    async fn delete_user(&self, id: Uuid) -> Result<bool, AuthError>;
    /// Newest-first listing with total count for pagination.
    async fn list_users(
        &self,
        filter: UserListFilter,
        page: Pagination,
    ) -> Result<(Vec<AuthUser>, u64), AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(
        &self,
        user_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError>;
}
