//! User and API key repository trait definition.

use threadline_types::error::RepositoryError;
use threadline_types::user::{User, UserId};

/// Repository trait for users and the hashed API keys that authenticate them.
///
/// Implementations never see a plaintext key; the identity service hashes
/// before every call.
pub trait UserRepository: Send + Sync {
    /// Insert a user together with their first hashed API key.
    ///
    /// Both rows are committed or neither is. Returns
    /// `RepositoryError::Conflict` when the email is already registered.
    fn create_user_with_key(
        &self,
        user: &User,
        key_hash: &str,
        key_name: &str,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Get a user by id.
    fn get_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Get a user by (already normalized) email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Resolve a key hash to its owning user.
    fn find_user_by_key_hash(
        &self,
        key_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Stamp `last_used_at` on the key with this hash.
    fn touch_api_key(
        &self,
        key_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
